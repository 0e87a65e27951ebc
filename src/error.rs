// Error taxonomy and HTTP status mapping
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Resolving or building a model failed. The registry keeps whatever was
/// loaded before.
#[derive(Debug, Error)]
#[error("failed to load model {model}: {cause}")]
pub struct LoadError {
    pub model: String,
    pub cause: anyhow::Error,
}

#[derive(Debug, Error)]
pub enum InferError {
    #[error("no model loaded, call the load endpoint first")]
    ModelNotLoaded,
    #[error("generation failed: {0}")]
    Generation(anyhow::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed line {line} in {path}, expected `key = value`")]
    Malformed { path: String, line: usize },
    #[error("missing required config key {0}")]
    MissingKey(String),
}

/// Handler-level error. Each kind maps to a documented status code and a
/// structured JSON body instead of a bare 500.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Infer(#[from] InferError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Load(_) => StatusCode::BAD_GATEWAY,
            ApiError::Infer(InferError::ModelNotLoaded) => StatusCode::CONFLICT,
            ApiError::Infer(InferError::Generation(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_not_loaded_maps_to_409() {
        let err = ApiError::from(InferError::ModelNotLoaded);
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn generation_failure_maps_to_500() {
        let err = ApiError::from(InferError::Generation(anyhow::anyhow!("boom")));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn load_failure_maps_to_502() {
        let err = ApiError::from(LoadError {
            model: "demo".to_string(),
            cause: anyhow::anyhow!("repo not found"),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert!(err.to_string().contains("demo"));
    }
}
