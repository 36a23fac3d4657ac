use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::pointer::Pointer;

/// One JSON Patch (RFC 6902) instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add {
        #[schema(value_type = String, example = "/fullName")]
        path: Pointer,
        #[schema(value_type = Object)]
        value: Value,
    },
    Remove {
        #[schema(value_type = String)]
        path: Pointer,
    },
    Replace {
        #[schema(value_type = String)]
        path: Pointer,
        #[schema(value_type = Object)]
        value: Value,
    },
    Move {
        #[schema(value_type = String)]
        from: Pointer,
        #[schema(value_type = String)]
        path: Pointer,
    },
    Copy {
        #[schema(value_type = String)]
        from: Pointer,
        #[schema(value_type = String)]
        path: Pointer,
    },
    Test {
        #[schema(value_type = String)]
        path: Pointer,
        #[schema(value_type = Object)]
        value: Value,
    },
}

impl PatchOperation {
    pub fn name(&self) -> &'static str {
        match self {
            PatchOperation::Add { .. } => "add",
            PatchOperation::Remove { .. } => "remove",
            PatchOperation::Replace { .. } => "replace",
            PatchOperation::Move { .. } => "move",
            PatchOperation::Copy { .. } => "copy",
            PatchOperation::Test { .. } => "test",
        }
    }

    pub fn path(&self) -> &Pointer {
        match self {
            PatchOperation::Add { path, .. }
            | PatchOperation::Remove { path }
            | PatchOperation::Replace { path, .. }
            | PatchOperation::Move { path, .. }
            | PatchOperation::Copy { path, .. }
            | PatchOperation::Test { path, .. } => path,
        }
    }
}

/// Parses a patch request body: a JSON array of operation objects.
pub fn parse_patch(body: &[u8]) -> Result<Vec<PatchOperation>, serde_json::Error> {
    serde_json::from_slice(body)
}
