use thiserror::Error;

use crate::{gvk::GroupVersionKind, runtime_object::RuntimeObject};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The payload decoded, but the result carries no kind. The partially
    /// decoded object rides along so callers can inspect what was recovered
    /// (`None` when decoding into a caller-supplied target, which already
    /// holds the partial state).
    #[error("object has no kind ({gvk})")]
    MissingKind {
        object: Option<Box<RuntimeObject>>,
        gvk: GroupVersionKind,
    },
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to serialize object: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write raw bytes: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("cannot convert {input} into {output}: only dynamic objects are supported")]
    UnsupportedShape {
        input: &'static str,
        output: &'static str,
    },

    #[error("{gvk} is unstructured and is not suitable for converting to {target}")]
    VersionUnresolvable {
        gvk: GroupVersionKind,
        target: String,
    },

    #[error("cannot convert field labels without schema information")]
    FieldLabelsUnsupported,
}
