//! Python bindings, built with the `python` feature.

use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::common_types::{Dataset, FeatureVector, LabeledInstance};
use crate::error::CropError;
use crate::recommender::{CropRecommender, RecommenderConfig};
use crate::validation::{CrossValidationConfig, FoldDealing};

impl From<CropError> for PyErr {
    fn from(err: CropError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Reads one training row: `{'features': [...], 'label': '...'}` or `([...], '...')`.
fn extract_instance(item: &Bound<'_, PyAny>) -> PyResult<LabeledInstance> {
    let (values, label): (Vec<f64>, String) = if let Ok(dict) = item.downcast::<PyDict>() {
        let features = dict
            .get_item("features")?
            .ok_or_else(|| PyValueError::new_err("Missing 'features' key"))?;
        let label = dict
            .get_item("label")?
            .ok_or_else(|| PyValueError::new_err("Missing 'label' key"))?;
        (features.extract()?, label.extract()?)
    } else if let Ok(tuple) = item.extract::<(Vec<f64>, String)>() {
        tuple
    } else {
        return Err(PyTypeError::new_err(
            "Training rows must be dictionaries {'features': [...], 'label': '...'} or tuples ([...], '...')",
        ));
    };
    let features = FeatureVector::new(&values)?;
    Ok(LabeledInstance::new(features, label.trim()))
}

#[pyclass(name = "CropRecommender")]
struct PyCropRecommender {
    inner: CropRecommender,
}

#[pymethods]
impl PyCropRecommender {
    #[new]
    #[pyo3(signature = (rows, folds = 5, seed = 1, min_instances = 2, max_depth = None, interleave_folds = false))]
    fn new(
        rows: &Bound<'_, PyList>,
        folds: usize,
        seed: u64,
        min_instances: usize,
        max_depth: Option<usize>,
        interleave_folds: bool,
    ) -> PyResult<Self> {
        let instances = rows.iter().map(|item| extract_instance(&item)).collect::<PyResult<Vec<_>>>()?;
        let mut config = RecommenderConfig::default();
        config.tree.min_instances = min_instances;
        config.tree.max_depth = max_depth;
        let dealing = if interleave_folds { FoldDealing::Interleaved } else { FoldDealing::PerClass };
        config.validation = CrossValidationConfig::new(Some(folds), Some(seed)).with_dealing(dealing);
        let inner = CropRecommender::train(Dataset::new(instances), config)?;
        Ok(PyCropRecommender { inner })
    }

    fn recommend(&self, features: Vec<f64>) -> PyResult<String> {
        Ok(self.inner.recommend(&features)?.to_string())
    }

    /// One dict per fold: `fold` (1-based), `accuracy_pct`, `precision`, `recall`.
    fn cross_validate<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyList>> {
        let report = self.inner.cross_validate()?;
        let out = PyList::empty_bound(py);
        for fold in &report.folds {
            let record = PyDict::new_bound(py);
            record.set_item("fold", fold.fold + 1)?;
            record.set_item("accuracy_pct", fold.accuracy_pct)?;
            record.set_item("precision", fold.precision)?;
            record.set_item("recall", fold.recall)?;
            out.append(record)?;
        }
        Ok(out)
    }

    #[getter]
    fn labels(&self) -> Vec<String> {
        self.inner.labels().to_vec()
    }

    #[getter]
    fn tree_depth(&self) -> usize {
        self.inner.tree().map_or(0, |tree| tree.depth())
    }

    #[getter]
    fn leaf_count(&self) -> usize {
        self.inner.tree().map_or(0, |tree| tree.leaf_count())
    }
}

#[pymodule]
#[pyo3(name = "crop_recommender")]
fn crop_recommender_py(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyCropRecommender>()?;
    Ok(())
}
