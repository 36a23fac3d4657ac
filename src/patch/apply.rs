//! JSON Patch application against a [`Document`].

use serde_json::Value;
use thiserror::Error;

use super::operation::PatchOperation;
use super::pointer::Pointer;
use super::Document;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatchError {
    #[error("path not found: {0}")]
    NotFound(String),
    #[error("array index out of bounds: {0}")]
    IndexOutOfBounds(String),
    #[error("invalid array index: {0}")]
    InvalidIndex(String),
    #[error("cannot address into a scalar value: {0}")]
    InvalidTarget(String),
    #[error("cannot move {from} into its own descendant {path}")]
    MoveIntoDescendant { from: String, path: String },
    #[error("test failed at {0}")]
    TestFailed(String),
    #[error("cannot remove the document root")]
    RemoveRoot,
}

/// Applies `operations` in order to a copy of `document`.
///
/// The input is never touched. If any operation fails the working copy is
/// dropped and the error is returned, so callers see all or nothing.
pub fn apply_patch(document: &Document, operations: &[PatchOperation]) -> Result<Document, PatchError> {
    let mut working = document.clone();
    for (index, operation) in operations.iter().enumerate() {
        if let Err(err) = apply_operation(&mut working, operation) {
            log::debug!(
                "patch aborted at operation #{} ({} {}): {}",
                index,
                operation.name(),
                operation.path(),
                err
            );
            return Err(err);
        }
    }
    Ok(working)
}

pub fn apply_operation(doc: &mut Document, operation: &PatchOperation) -> Result<(), PatchError> {
    match operation {
        PatchOperation::Add { path, value } => add(doc, path, value.clone()),
        PatchOperation::Remove { path } => remove(doc, path).map(|_| ()),
        PatchOperation::Replace { path, value } => replace(doc, path, value.clone()),
        PatchOperation::Move { from, path } => move_value(doc, from, path),
        PatchOperation::Copy { from, path } => {
            let value = get(doc, from)?.clone();
            add(doc, path, value)
        }
        PatchOperation::Test { path, value } => {
            if deep_equal(get(doc, path)?, value) {
                Ok(())
            } else {
                Err(PatchError::TestFailed(path.to_string()))
            }
        }
    }
}

// ── Navigation ────────────────────────────────────────────────────────────

/// Array tokens are decimal without leading zeros. `-` is handled by callers.
fn parse_index(token: &str, pointer: &Pointer) -> Result<usize, PatchError> {
    let well_formed = !token.is_empty()
        && token.bytes().all(|b| b.is_ascii_digit())
        && (token == "0" || !token.starts_with('0'));
    if !well_formed {
        return Err(PatchError::InvalidIndex(pointer.to_string()));
    }
    token
        .parse()
        .map_err(|_| PatchError::InvalidIndex(pointer.to_string()))
}

fn get<'a>(doc: &'a Document, pointer: &Pointer) -> Result<&'a Value, PatchError> {
    let mut current = doc;
    for token in pointer.tokens() {
        current = match current {
            Value::Object(map) => map
                .get(token)
                .ok_or_else(|| PatchError::NotFound(pointer.to_string()))?,
            Value::Array(items) => {
                let idx = parse_index(token, pointer)?;
                items
                    .get(idx)
                    .ok_or_else(|| PatchError::IndexOutOfBounds(pointer.to_string()))?
            }
            _ => return Err(PatchError::InvalidTarget(pointer.to_string())),
        };
    }
    Ok(current)
}

fn get_mut<'a>(doc: &'a mut Document, tokens: &[String], pointer: &Pointer) -> Result<&'a mut Value, PatchError> {
    let mut current = doc;
    for token in tokens {
        current = match current {
            Value::Object(map) => map
                .get_mut(token)
                .ok_or_else(|| PatchError::NotFound(pointer.to_string()))?,
            Value::Array(items) => {
                let idx = parse_index(token, pointer)?;
                items
                    .get_mut(idx)
                    .ok_or_else(|| PatchError::IndexOutOfBounds(pointer.to_string()))?
            }
            _ => return Err(PatchError::InvalidTarget(pointer.to_string())),
        };
    }
    Ok(current)
}

// ── Operations ────────────────────────────────────────────────────────────

fn add(doc: &mut Document, pointer: &Pointer, value: Value) -> Result<(), PatchError> {
    let Some((parent, key)) = pointer.split_last() else {
        *doc = value;
        return Ok(());
    };
    match get_mut(doc, parent, pointer)? {
        Value::Object(map) => {
            map.insert(key.to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            if key == "-" {
                items.push(value);
                return Ok(());
            }
            let idx = parse_index(key, pointer)?;
            if idx > items.len() {
                return Err(PatchError::IndexOutOfBounds(pointer.to_string()));
            }
            items.insert(idx, value);
            Ok(())
        }
        _ => Err(PatchError::InvalidTarget(pointer.to_string())),
    }
}

fn remove(doc: &mut Document, pointer: &Pointer) -> Result<Value, PatchError> {
    let (parent, key) = pointer.split_last().ok_or(PatchError::RemoveRoot)?;
    match get_mut(doc, parent, pointer)? {
        Value::Object(map) => map
            .remove(key)
            .ok_or_else(|| PatchError::NotFound(pointer.to_string())),
        Value::Array(items) => {
            let idx = parse_index(key, pointer)?;
            if idx >= items.len() {
                return Err(PatchError::IndexOutOfBounds(pointer.to_string()));
            }
            Ok(items.remove(idx))
        }
        _ => Err(PatchError::InvalidTarget(pointer.to_string())),
    }
}

fn replace(doc: &mut Document, pointer: &Pointer, value: Value) -> Result<(), PatchError> {
    let Some((parent, key)) = pointer.split_last() else {
        *doc = value;
        return Ok(());
    };
    let slot = match get_mut(doc, parent, pointer)? {
        Value::Object(map) => map
            .get_mut(key)
            .ok_or_else(|| PatchError::NotFound(pointer.to_string()))?,
        Value::Array(items) => {
            let idx = parse_index(key, pointer)?;
            items
                .get_mut(idx)
                .ok_or_else(|| PatchError::IndexOutOfBounds(pointer.to_string()))?
        }
        _ => return Err(PatchError::InvalidTarget(pointer.to_string())),
    };
    *slot = value;
    Ok(())
}

fn move_value(doc: &mut Document, from: &Pointer, path: &Pointer) -> Result<(), PatchError> {
    if from == path {
        return get(doc, from).map(|_| ());
    }
    if from.is_proper_prefix_of(path) {
        return Err(PatchError::MoveIntoDescendant {
            from: from.to_string(),
            path: path.to_string(),
        });
    }
    let value = remove(doc, from)?;
    add(doc, path, value)
}

/// Structural equality: numbers compare by value, object key order is ignored.
pub fn deep_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => {
            if let (Some(l), Some(r)) = (l.as_i64(), r.as_i64()) {
                l == r
            } else if let (Some(l), Some(r)) = (l.as_u64(), r.as_u64()) {
                l == r
            } else {
                l.as_f64() == r.as_f64()
            }
        }
        (Value::Array(l), Value::Array(r)) => {
            l.len() == r.len() && l.iter().zip(r).all(|(a, b)| deep_equal(a, b))
        }
        (Value::Object(l), Value::Object(r)) => {
            l.len() == r.len()
                && l.iter()
                    .all(|(key, a)| r.get(key).is_some_and(|b| deep_equal(a, b)))
        }
        _ => left == right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::operation::parse_patch;
    use serde_json::json;

    fn patch(ops: Value) -> Vec<PatchOperation> {
        parse_patch(ops.to_string().as_bytes()).unwrap()
    }

    fn user_doc() -> Document {
        json!({"id": 1, "email": "a@x.com", "fullName": "John", "password": "p"})
    }

    #[test]
    fn empty_patch_is_identity() {
        let doc = json!({"a": [1, {"b": null}], "c": "d"});
        assert_eq!(apply_patch(&doc, &[]).unwrap(), doc);
    }

    #[test]
    fn replace_field() {
        let ops = patch(json!([{"op": "replace", "path": "/fullName", "value": "Jane Doe"}]));
        let out = apply_patch(&user_doc(), &ops).unwrap();
        assert_eq!(
            out,
            json!({"id": 1, "email": "a@x.com", "fullName": "Jane Doe", "password": "p"})
        );
    }

    #[test]
    fn replace_keeps_key_order() {
        let ops = patch(json!([{"op": "replace", "path": "/email", "value": "b@x.com"}]));
        let out = apply_patch(&user_doc(), &ops).unwrap();
        let keys: Vec<_> = out.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["id", "email", "fullName", "password"]);
    }

    #[test]
    fn replace_missing_field_fails() {
        let ops = patch(json!([{"op": "replace", "path": "/nickname", "value": "J"}]));
        assert_eq!(
            apply_patch(&user_doc(), &ops),
            Err(PatchError::NotFound("/nickname".into()))
        );
    }

    #[test]
    fn add_inserts_or_overwrites_object_members() {
        let ops = patch(json!([
            {"op": "add", "path": "/nickname", "value": "J"},
            {"op": "add", "path": "/email", "value": "b@x.com"}
        ]));
        let out = apply_patch(&user_doc(), &ops).unwrap();
        assert_eq!(out["nickname"], "J");
        assert_eq!(out["email"], "b@x.com");
    }

    #[test]
    fn add_into_arrays() {
        let doc = json!({"tags": ["a", "c"]});
        let ops = patch(json!([
            {"op": "add", "path": "/tags/1", "value": "b"},
            {"op": "add", "path": "/tags/-", "value": "d"},
            {"op": "add", "path": "/tags/4", "value": "e"}
        ]));
        let out = apply_patch(&doc, &ops).unwrap();
        assert_eq!(out, json!({"tags": ["a", "b", "c", "d", "e"]}));
    }

    #[test]
    fn add_past_the_end_fails() {
        let doc = json!({"tags": ["a"]});
        let ops = patch(json!([{"op": "add", "path": "/tags/2", "value": "x"}]));
        assert_eq!(
            apply_patch(&doc, &ops),
            Err(PatchError::IndexOutOfBounds("/tags/2".into()))
        );
    }

    #[test]
    fn add_requires_existing_parent() {
        let ops = patch(json!([{"op": "add", "path": "/profile/age", "value": 3}]));
        assert_eq!(
            apply_patch(&user_doc(), &ops),
            Err(PatchError::NotFound("/profile/age".into()))
        );
    }

    #[test]
    fn add_at_root_replaces_document() {
        let ops = patch(json!([{"op": "add", "path": "", "value": {"x": 1}}]));
        assert_eq!(apply_patch(&user_doc(), &ops).unwrap(), json!({"x": 1}));
    }

    #[test]
    fn remove_missing_field_fails() {
        let ops = patch(json!([{"op": "remove", "path": "/nickname"}]));
        assert_eq!(
            apply_patch(&user_doc(), &ops),
            Err(PatchError::NotFound("/nickname".into()))
        );
    }

    #[test]
    fn remove_from_array_shifts() {
        let doc = json!([1, 2, 3]);
        let ops = patch(json!([{"op": "remove", "path": "/0"}]));
        assert_eq!(apply_patch(&doc, &ops).unwrap(), json!([2, 3]));
    }

    #[test]
    fn remove_rejects_root_and_dash() {
        let doc = json!([1]);
        assert_eq!(
            apply_patch(&doc, &patch(json!([{"op": "remove", "path": ""}]))),
            Err(PatchError::RemoveRoot)
        );
        assert_eq!(
            apply_patch(&doc, &patch(json!([{"op": "remove", "path": "/-"}]))),
            Err(PatchError::InvalidIndex("/-".into()))
        );
    }

    #[test]
    fn leading_zero_index_is_invalid() {
        let doc = json!([1, 2]);
        let ops = patch(json!([{"op": "replace", "path": "/01", "value": 9}]));
        assert_eq!(apply_patch(&doc, &ops), Err(PatchError::InvalidIndex("/01".into())));
    }

    #[test]
    fn addressing_into_scalar_is_type_mismatch() {
        let ops = patch(json!([{"op": "add", "path": "/email/domain", "value": "x"}]));
        assert_eq!(
            apply_patch(&user_doc(), &ops),
            Err(PatchError::InvalidTarget("/email/domain".into()))
        );
    }

    #[test]
    fn move_relocates_value() {
        let ops = patch(json!([{"op": "move", "from": "/fullName", "path": "/name"}]));
        let out = apply_patch(&user_doc(), &ops).unwrap();
        assert_eq!(out["name"], "John");
        assert!(out.get("fullName").is_none());
    }

    #[test]
    fn move_into_own_descendant_fails() {
        let doc = json!({"a": {"b": {}}});
        let ops = patch(json!([{"op": "move", "from": "/a", "path": "/a/b/c"}]));
        assert_eq!(
            apply_patch(&doc, &ops),
            Err(PatchError::MoveIntoDescendant {
                from: "/a".into(),
                path: "/a/b/c".into()
            })
        );
    }

    #[test]
    fn move_to_same_location_is_noop() {
        let ops = patch(json!([{"op": "move", "from": "/email", "path": "/email"}]));
        assert_eq!(apply_patch(&user_doc(), &ops).unwrap(), user_doc());
    }

    #[test]
    fn move_within_array() {
        let doc = json!(["a", "b", "c"]);
        let ops = patch(json!([{"op": "move", "from": "/0", "path": "/-"}]));
        assert_eq!(apply_patch(&doc, &ops).unwrap(), json!(["b", "c", "a"]));
    }

    #[test]
    fn copy_retains_source() {
        let ops = patch(json!([{"op": "copy", "from": "/email", "path": "/backupEmail"}]));
        let out = apply_patch(&user_doc(), &ops).unwrap();
        assert_eq!(out["email"], "a@x.com");
        assert_eq!(out["backupEmail"], "a@x.com");
    }

    #[test]
    fn copy_missing_source_fails() {
        let ops = patch(json!([{"op": "copy", "from": "/nope", "path": "/x"}]));
        assert_eq!(apply_patch(&user_doc(), &ops), Err(PatchError::NotFound("/nope".into())));
    }

    #[test]
    fn test_mismatch_aborts_and_leaves_input_untouched() {
        let doc = user_doc();
        let ops = patch(json!([
            {"op": "replace", "path": "/fullName", "value": "Jane"},
            {"op": "test", "path": "/email", "value": "other@x.com"}
        ]));
        assert_eq!(apply_patch(&doc, &ops), Err(PatchError::TestFailed("/email".into())));
        assert_eq!(doc, user_doc());
    }

    #[test]
    fn test_compares_structurally() {
        let doc = json!({"n": 1, "o": {"a": 1, "b": [true, null]}});
        let ops = patch(json!([
            {"op": "test", "path": "/n", "value": 1.0},
            {"op": "test", "path": "/o", "value": {"b": [true, null], "a": 1}}
        ]));
        assert!(apply_patch(&doc, &ops).is_ok());
    }

    #[test]
    fn deep_equal_distinguishes_types() {
        assert!(!deep_equal(&json!(1), &json!("1")));
        assert!(!deep_equal(&json!([1]), &json!([1, 2])));
        assert!(!deep_equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
        assert!(deep_equal(&json!(null), &json!(null)));
    }

    #[test]
    fn escaped_tokens_address_literal_keys() {
        let doc = json!({"a/b": 1, "m~n": 2});
        let ops = patch(json!([
            {"op": "test", "path": "/a~1b", "value": 1},
            {"op": "remove", "path": "/m~0n"}
        ]));
        assert_eq!(apply_patch(&doc, &ops).unwrap(), json!({"a/b": 1}));
    }
}
