//! Unified error types for the serving layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Artifact loading errors.
///
/// A missing file is not an error (the slot just stays unset); these cover
/// the cases where a file exists but cannot be turned into an artifact.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Reading the artifact file failed.
    #[error("failed to read artifact {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The artifact file exists but does not deserialize.
    #[error("malformed artifact {path}: {source}")]
    Malformed {
        /// Path that failed to deserialize.
        path: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Categorical encoding errors.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// The submitted label is not in the encoder's fitted vocabulary.
    #[error("unknown label {label:?} for feature {feature}")]
    UnknownLabel {
        /// Feature the label was submitted for.
        feature: String,
        /// The unrecognized label.
        label: String,
    },

    /// No encoder exists for the named feature.
    #[error("no encoder for feature {0}")]
    MissingEncoder(String),
}

/// Model inference errors.
#[derive(Error, Debug)]
pub enum PredictError {
    /// Feature row length does not match the model's expected input width.
    #[error("feature count mismatch: model expects {expected}, got {got}")]
    FeatureMismatch {
        /// Feature count the model was trained on.
        expected: usize,
        /// Feature count actually supplied.
        got: usize,
    },

    /// A tree references a node or feature index that does not exist.
    #[error("malformed tree {tree}: {reason}")]
    MalformedTree {
        /// Index of the offending tree.
        tree: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// The model has no trees to average.
    #[error("model is empty")]
    EmptyModel,
}

/// Handler-boundary error, mapped to a structured JSON response.
///
/// Everything the handlers anticipate is an explicit variant with its own
/// status code; artifact corruption deliberately falls through as a plain 500.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Model artifact file is absent.
    #[error("Model not found. Train the model first.")]
    ModelUnavailable,

    /// Encoder artifact file is absent.
    #[error("Encoders not found. Train the model first.")]
    EncodersUnavailable,

    /// A categorical value was not recognized by its encoder.
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodeError),

    /// Model inference failed.
    #[error("Prediction error: {0}")]
    Prediction(#[from] PredictError),

    /// Artifact deserialization failed; surfaced undifferentiated.
    #[error("artifact error: {0}")]
    Artifact(#[from] ArtifactError),
}

/// JSON error body shared by all failure responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
}

impl ApiError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ModelUnavailable | ApiError::EncodersUnavailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Encoding(_) => StatusCode::BAD_REQUEST,
            ApiError::Prediction(_) | ApiError::Artifact(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
