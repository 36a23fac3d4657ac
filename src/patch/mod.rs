//! Partial updates: records are encoded into a [`Document`], patched with
//! RFC 6902 operations addressed by RFC 6901 pointers, and decoded back.

pub mod apply;
pub mod codec;
pub mod operation;
pub mod pointer;

pub use apply::{apply_patch, PatchError};
pub use codec::{CodecError, DocumentCodec, SerdeCodec};
pub use operation::{parse_patch, PatchOperation};
pub use pointer::{Pointer, PointerError};

/// Ordered, dynamically typed tree that records are patched in.
pub type Document = serde_json::Value;
