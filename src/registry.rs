// Model registry: the swappable handle to the active model/tokenizer pair
use std::sync::{Arc, RwLock};

use candle::Device;

use crate::error::{InferError, LoadError};
use crate::models::t5::T5InferenceModel;

/// Seam between the HTTP layer and the model. The real implementation is
/// [`T5InferenceModel`]; tests install stubs.
pub trait SqlGenerator: Send + Sync {
    fn generate_sql(&self, question: &str) -> Result<String, InferError>;
}

/// Holds the active generator. Readers clone the `Arc` at call start and keep
/// using that snapshot even if a load replaces the registry contents
/// mid-inference. A load builds the replacement fully off to the side and
/// publishes it with a single swap, so the model and tokenizer of one load
/// can never be observed paired with those of another.
pub struct ModelRegistry {
    current: RwLock<Option<Arc<dyn SqlGenerator>>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
        }
    }

    /// The current generator, or `None` before any successful load.
    pub fn snapshot(&self) -> Option<Arc<dyn SqlGenerator>> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Publish a fully constructed generator, replacing the previous one
    /// wholesale.
    pub fn install(&self, generator: Arc<dyn SqlGenerator>) {
        *self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(generator);
    }

    /// Resolve `model_name` from the Hugging Face Hub and swap it in. On any
    /// failure the previously installed generator is left untouched.
    pub fn load_from_hub(&self, model_name: &str) -> Result<(), LoadError> {
        let model = T5InferenceModel::load_from_hub(model_name, None, Device::Cpu).map_err(
            |cause| LoadError {
                model: model_name.to_string(),
                cause,
            },
        )?;
        self.install(Arc::new(model));
        Ok(())
    }

    /// Run one inference against the current snapshot.
    pub fn generate(&self, question: &str) -> Result<String, InferError> {
        let generator = self.snapshot().ok_or(InferError::ModelNotLoaded)?;
        generator.generate_sql(question)
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
