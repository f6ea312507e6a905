use ndarray::{Array4, CowArray};
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::Session;

use crate::error::Error;

/// Opaque forward pass: one normalized image tensor in, one raw score per
/// class out. Implementations must be deterministic for fixed weights and
/// must not mutate shared state across calls; serialization of concurrent
/// invocations is the caller's job (see `ClassificationEngine`).
pub trait Classifier {
    fn class_scores(&self, input: &Array4<f32>) -> Result<Vec<f32>, Error>;
}

/// ONNX Runtime backed classifier, loaded once at startup.
pub struct OnnxClassifier {
    session: Session,
}

impl OnnxClassifier {
    /// Load the persisted weights. Failure here is fatal: the process must
    /// not begin serving predictions without a model.
    pub fn load(model_path: &str, cuda: bool) -> Result<Self, Error> {
        let provider = if cuda {
            [CUDAExecutionProvider::default().build().error_on_failure()]
        } else {
            [CPUExecutionProvider::default().build()]
        };
        let session = SessionBuilder::new()
            .and_then(|b| b.with_execution_providers(provider))
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|b| b.commit_from_file(model_path))
            .map_err(|e| Error::ModelUnavailable(e.to_string()))?;
        Ok(Self { session })
    }
}

impl Classifier for OnnxClassifier {
    fn class_scores(&self, input: &Array4<f32>) -> Result<Vec<f32>, Error> {
        let xs = CowArray::from(input.clone().into_dyn());
        let inputs = ort::inputs![xs.view()]
            .map_err(|e| Error::ModelUnavailable(e.to_string()))?;
        let outputs = self
            .session
            .run(inputs)
            .map_err(|e| Error::ModelUnavailable(e.to_string()))?;
        let (_name, value) = outputs
            .iter()
            .next()
            .ok_or_else(|| Error::ModelUnavailable("model produced no outputs".into()))?;
        let scores = value
            .try_extract_tensor::<f32>()
            .map_err(|e| Error::ModelUnavailable(e.to_string()))?;
        Ok(scores.iter().copied().collect())
    }
}
