use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use super::Document;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode record: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("document is not an object")]
    NotAnObject,
    #[error("failed to decode document: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Converts a typed record to and from its [`Document`] form.
///
/// `decode` must accept whatever a patch left behind: extra members are
/// ignored, missing or mistyped fields are a [`CodecError::Decode`]. Anything
/// other than an object is [`CodecError::NotAnObject`].
pub trait DocumentCodec<R>: Send + Sync {
    fn encode(&self, record: &R) -> Result<Document, CodecError>;
    fn decode(&self, document: Document) -> Result<R, CodecError>;
}

/// Codec driven by the record's serde field names.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeCodec;

impl<R> DocumentCodec<R> for SerdeCodec
where
    R: Serialize + DeserializeOwned,
{
    fn encode(&self, record: &R) -> Result<Document, CodecError> {
        let document = serde_json::to_value(record).map_err(CodecError::Encode)?;
        if !document.is_object() {
            return Err(CodecError::NotAnObject);
        }
        Ok(document)
    }

    fn decode(&self, document: Document) -> Result<R, CodecError> {
        // serde fills named fields from an array by position; records are objects only
        if !document.is_object() {
            return Err(CodecError::NotAnObject);
        }
        serde_json::from_value(document).map_err(CodecError::Decode)
    }
}
