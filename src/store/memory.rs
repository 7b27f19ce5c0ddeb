//! In-memory document store stand-in.
//!
//! Implements every catalog kind against a process-local collection with
//! deliberately simplified semantics: filters match on top-level equality
//! only (operator filters select nothing), updates honour `$set` only, and
//! aggregation evaluates just a leading `$match` stage. Server-removed
//! legacy commands fail, which gives demo runs a realistic mix of outcomes.

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use serde_json::{json, Value};
use uuid::Uuid;

use async_trait::async_trait;

use crate::catalog::OperationKind;
use crate::store::{DocumentStore, StoreError};

const DEFAULT_COLLECTION: &str = "test_collection";

/// Process-local document store backing tests and the demo.
pub struct MemoryStore {
    collections: DashMap<String, Vec<Value>>,
    indexes: Mutex<Vec<String>>,
    active: RwLock<String>,
}

impl MemoryStore {
    /// Create an empty store with the default active collection.
    pub fn new() -> Self {
        Self {
            collections: DashMap::new(),
            indexes: Mutex::new(Vec::new()),
            active: RwLock::new(DEFAULT_COLLECTION.to_string()),
        }
    }

    /// Name of the collection operations currently target.
    pub fn active_collection(&self) -> String {
        self.active.read().clone()
    }

    /// Number of documents in the active collection.
    pub fn document_count(&self) -> usize {
        let name = self.active_collection();
        self.collections.get(&name).map(|c| c.len()).unwrap_or(0)
    }

    /// Index names currently registered, in creation order.
    pub fn index_names(&self) -> Vec<String> {
        self.indexes.lock().clone()
    }

    fn with_docs<R>(&self, f: impl FnOnce(&mut Vec<Value>) -> R) -> R {
        let name = self.active_collection();
        let mut entry = self.collections.entry(name).or_default();
        f(entry.value_mut())
    }

    fn insert_doc(&self, document: &Value) -> String {
        let mut doc = document.clone();
        let id = doc
            .get("_id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        if let Some(obj) = doc.as_object_mut() {
            obj.insert("_id".to_string(), Value::String(id.clone()));
        }
        self.with_docs(|docs| docs.push(doc));
        id
    }

    fn register_index(&self, name: &str) {
        let mut indexes = self.indexes.lock();
        if !indexes.iter().any(|i| i == name) {
            indexes.push(name.to_string());
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn require<'a>(
    kind: OperationKind,
    payload: &'a Value,
    field: &str,
) -> Result<&'a Value, StoreError> {
    payload.get(field).ok_or_else(|| StoreError::InvalidPayload {
        operation: kind.name().to_string(),
        reason: format!("missing field `{}`", field),
    })
}

fn filter_of(payload: &Value) -> Value {
    payload.get("filter").cloned().unwrap_or_else(|| json!({}))
}

/// Top-level equality match. Operator filters (`$or`, `{"$gte": ..}` values)
/// select nothing rather than erroring.
fn matches(doc: &Value, filter: &Value) -> bool {
    let Some(filter) = filter.as_object() else {
        return false;
    };
    filter.iter().all(|(key, expected)| {
        !key.starts_with('$') && !expected.is_object() && doc.get(key) == Some(expected)
    })
}

/// Apply the `$set` portion of an update document. Other operators are
/// ignored by the stand-in.
fn apply_update(doc: &mut Value, update: &Value) {
    if let Some(set) = update.get("$set").and_then(Value::as_object) {
        if let Some(obj) = doc.as_object_mut() {
            for (key, value) in set {
                obj.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Derive an index name from a `[["field", direction], ..]` key list.
fn index_name(kind: OperationKind, keys: &Value) -> Result<String, StoreError> {
    let invalid = |reason: &str| StoreError::InvalidPayload {
        operation: kind.name().to_string(),
        reason: reason.to_string(),
    };
    let pairs = keys.as_array().ok_or_else(|| invalid("`keys` must be an array"))?;
    if pairs.is_empty() {
        return Err(invalid("`keys` must not be empty"));
    }
    let mut parts = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let field = pair
            .get(0)
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("index key must be a [field, direction] pair"))?;
        let direction = pair.get(1).and_then(Value::as_i64).unwrap_or(1);
        parts.push(format!("{}_{}", field, direction));
    }
    Ok(parts.join("_"))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn execute(&self, kind: OperationKind, payload: &Value) -> Result<Value, StoreError> {
        let name = kind.name();
        match kind {
            OperationKind::InsertOne | OperationKind::Insert => {
                let document = require(kind, payload, "document")?;
                let id = self.insert_doc(document);
                Ok(json!({ "operation": name, "inserted_id": id, "acknowledged": true }))
            }
            OperationKind::Save => {
                let document = require(kind, payload, "document")?;
                let id = self.insert_doc(document);
                Ok(json!({ "operation": name, "saved_id": id }))
            }
            OperationKind::InsertMany => {
                let documents = require(kind, payload, "documents")?
                    .as_array()
                    .ok_or_else(|| StoreError::InvalidPayload {
                        operation: name.to_string(),
                        reason: "`documents` must be an array".to_string(),
                    })?
                    .clone();
                let ids: Vec<String> = documents.iter().map(|d| self.insert_doc(d)).collect();
                Ok(json!({
                    "operation": name,
                    "inserted_ids": ids,
                    "inserted_count": ids.len(),
                    "acknowledged": true
                }))
            }
            OperationKind::Find => {
                let filter = filter_of(payload);
                let limit = payload.get("limit").and_then(Value::as_u64).unwrap_or(0) as usize;
                let documents: Vec<Value> = self.with_docs(|docs| {
                    let found = docs.iter().filter(|d| matches(d, &filter)).cloned();
                    if limit > 0 {
                        found.take(limit).collect()
                    } else {
                        found.collect()
                    }
                });
                Ok(json!({ "operation": name, "count": documents.len(), "documents": documents }))
            }
            OperationKind::FindOne => {
                let filter = filter_of(payload);
                let document = self.with_docs(|docs| {
                    docs.iter().find(|d| matches(d, &filter)).cloned()
                });
                Ok(json!({ "operation": name, "document": document }))
            }
            OperationKind::FindOneAndDelete => {
                let filter = filter_of(payload);
                let document = self.with_docs(|docs| {
                    docs.iter()
                        .position(|d| matches(d, &filter))
                        .map(|i| docs.remove(i))
                });
                Ok(json!({ "operation": name, "document": document }))
            }
            OperationKind::FindOneAndReplace => {
                let filter = filter_of(payload);
                let replacement = require(kind, payload, "replacement")?.clone();
                let previous = self.with_docs(|docs| {
                    docs.iter_mut().find(|d| matches(d, &filter)).map(|doc| {
                        let old = doc.clone();
                        let id = old.get("_id").cloned();
                        *doc = replacement;
                        if let (Some(id), Some(obj)) = (id, doc.as_object_mut()) {
                            obj.insert("_id".to_string(), id);
                        }
                        old
                    })
                });
                Ok(json!({ "operation": name, "document": previous }))
            }
            OperationKind::FindOneAndUpdate | OperationKind::FindAndModify => {
                let filter = filter_of(payload);
                let update = require(kind, payload, "update")?.clone();
                let previous = self.with_docs(|docs| {
                    docs.iter_mut().find(|d| matches(d, &filter)).map(|doc| {
                        let old = doc.clone();
                        apply_update(doc, &update);
                        old
                    })
                });
                Ok(json!({ "operation": name, "document": previous }))
            }
            OperationKind::UpdateOne | OperationKind::Update => {
                let filter = filter_of(payload);
                let update = require(kind, payload, "update")?.clone();
                let modified = self.with_docs(|docs| {
                    docs.iter_mut()
                        .find(|d| matches(d, &filter))
                        .map(|doc| apply_update(doc, &update))
                        .is_some()
                });
                let count = u64::from(modified);
                Ok(json!({ "operation": name, "matched_count": count, "modified_count": count }))
            }
            OperationKind::UpdateMany => {
                let filter = filter_of(payload);
                let update = require(kind, payload, "update")?.clone();
                let count = self.with_docs(|docs| {
                    docs.iter_mut()
                        .filter(|d| matches(d, &filter))
                        .map(|doc| apply_update(doc, &update))
                        .count()
                });
                Ok(json!({ "operation": name, "matched_count": count, "modified_count": count }))
            }
            OperationKind::ReplaceOne => {
                let filter = filter_of(payload);
                let replacement = require(kind, payload, "replacement")?.clone();
                let replaced = self.with_docs(|docs| {
                    docs.iter_mut().find(|d| matches(d, &filter)).map(|doc| {
                        let id = doc.get("_id").cloned();
                        *doc = replacement;
                        if let (Some(id), Some(obj)) = (id, doc.as_object_mut()) {
                            obj.insert("_id".to_string(), id);
                        }
                    })
                });
                let count = u64::from(replaced.is_some());
                Ok(json!({ "operation": name, "matched_count": count, "modified_count": count }))
            }
            OperationKind::DeleteOne => {
                let filter = filter_of(payload);
                let deleted = self.with_docs(|docs| {
                    docs.iter()
                        .position(|d| matches(d, &filter))
                        .map(|i| docs.remove(i))
                        .is_some()
                });
                Ok(json!({ "operation": name, "deleted_count": u64::from(deleted) }))
            }
            OperationKind::DeleteMany | OperationKind::Remove => {
                let filter = filter_of(payload);
                let deleted = self.with_docs(|docs| {
                    let before = docs.len();
                    docs.retain(|d| !matches(d, &filter));
                    before - docs.len()
                });
                Ok(json!({ "operation": name, "deleted_count": deleted }))
            }
            OperationKind::CountDocuments | OperationKind::Count => {
                let filter = filter_of(payload);
                let count =
                    self.with_docs(|docs| docs.iter().filter(|d| matches(d, &filter)).count());
                Ok(json!({ "operation": name, "count": count }))
            }
            OperationKind::EstimatedDocumentCount => {
                let count = self.with_docs(|docs| docs.len());
                Ok(json!({ "operation": name, "count": count }))
            }
            OperationKind::Aggregate => {
                let pipeline = require(kind, payload, "pipeline")?
                    .as_array()
                    .cloned()
                    .unwrap_or_default();
                // Only a leading $match stage is evaluated by the stand-in.
                let filter = pipeline
                    .first()
                    .and_then(|stage| stage.get("$match"))
                    .cloned()
                    .unwrap_or_else(|| json!({}));
                let documents: Vec<Value> = self.with_docs(|docs| {
                    docs.iter().filter(|d| matches(d, &filter)).cloned().collect()
                });
                Ok(json!({ "operation": name, "count": documents.len(), "documents": documents }))
            }
            OperationKind::MapReduce | OperationKind::InlineMapReduce => {
                Err(StoreError::Unsupported(format!(
                    "{} was removed from the server; use aggregate instead",
                    name
                )))
            }
            OperationKind::Reindex => Err(StoreError::Unsupported(
                "reIndex is no longer supported by the server".to_string(),
            )),
            OperationKind::CreateIndex | OperationKind::EnsureIndex => {
                let keys = require(kind, payload, "keys")?;
                let index = index_name(kind, keys)?;
                self.register_index(&index);
                Ok(json!({ "operation": name, "index_name": index }))
            }
            OperationKind::CreateIndexes => {
                let specs = require(kind, payload, "indexes")?
                    .as_array()
                    .cloned()
                    .unwrap_or_default();
                let mut created = Vec::with_capacity(specs.len());
                for spec in &specs {
                    let keys = require(kind, spec, "keys")?;
                    let index = index_name(kind, keys)?;
                    self.register_index(&index);
                    created.push(index);
                }
                Ok(json!({ "operation": name, "index_names": created }))
            }
            OperationKind::DropIndex => {
                let index = require(kind, payload, "index_name")?
                    .as_str()
                    .ok_or_else(|| StoreError::InvalidPayload {
                        operation: name.to_string(),
                        reason: "`index_name` must be a string".to_string(),
                    })?
                    .to_string();
                let mut indexes = self.indexes.lock();
                let position = indexes
                    .iter()
                    .position(|i| *i == index)
                    .ok_or_else(|| StoreError::IndexNotFound(index.clone()))?;
                indexes.remove(position);
                Ok(json!({ "operation": name, "dropped": index }))
            }
            OperationKind::DropIndexes => {
                let mut indexes = self.indexes.lock();
                let dropped = indexes.len();
                indexes.clear();
                Ok(json!({ "operation": name, "dropped_count": dropped }))
            }
            OperationKind::Distinct => {
                let key = require(kind, payload, "key")?
                    .as_str()
                    .ok_or_else(|| StoreError::InvalidPayload {
                        operation: name.to_string(),
                        reason: "`key` must be a string".to_string(),
                    })?
                    .to_string();
                let values = self.with_docs(|docs| {
                    let mut distinct: Vec<Value> = Vec::new();
                    for doc in docs.iter() {
                        if let Some(value) = doc.get(&key) {
                            if !distinct.contains(value) {
                                distinct.push(value.clone());
                            }
                        }
                    }
                    distinct
                });
                Ok(json!({ "operation": name, "values": values }))
            }
            OperationKind::Rename => {
                let new_name = require(kind, payload, "new_name")?
                    .as_str()
                    .ok_or_else(|| StoreError::InvalidPayload {
                        operation: name.to_string(),
                        reason: "`new_name` must be a string".to_string(),
                    })?
                    .to_string();
                // Drops any existing target, mirroring rename with dropTarget.
                let old_name = self.active_collection();
                let docs = self
                    .collections
                    .remove(&old_name)
                    .map(|(_, docs)| docs)
                    .unwrap_or_default();
                self.collections.insert(new_name.clone(), docs);
                *self.active.write() = new_name.clone();
                Ok(json!({ "operation": name, "renamed_to": new_name }))
            }
            OperationKind::BulkWrite => {
                let operations = require(kind, payload, "operations")?
                    .as_array()
                    .cloned()
                    .unwrap_or_default();
                let mut inserted = 0u64;
                let mut modified = 0u64;
                let mut deleted = 0u64;
                for op in &operations {
                    let entry = op.as_object().and_then(|o| o.iter().next());
                    match entry {
                        Some((op_name, body)) if op_name == "insert_one" => {
                            let document = require(kind, body, "document")?;
                            self.insert_doc(document);
                            inserted += 1;
                        }
                        Some((op_name, body)) if op_name == "update_one" => {
                            let filter = filter_of(body);
                            let update = require(kind, body, "update")?.clone();
                            let touched = self.with_docs(|docs| {
                                docs.iter_mut()
                                    .find(|d| matches(d, &filter))
                                    .map(|doc| apply_update(doc, &update))
                                    .is_some()
                            });
                            modified += u64::from(touched);
                        }
                        Some((op_name, body)) if op_name == "delete_one" => {
                            let filter = filter_of(body);
                            let removed = self.with_docs(|docs| {
                                docs.iter()
                                    .position(|d| matches(d, &filter))
                                    .map(|i| docs.remove(i))
                                    .is_some()
                            });
                            deleted += u64::from(removed);
                        }
                        Some((op_name, _)) => {
                            return Err(StoreError::InvalidPayload {
                                operation: name.to_string(),
                                reason: format!("unsupported bulk operation `{}`", op_name),
                            });
                        }
                        None => {
                            return Err(StoreError::InvalidPayload {
                                operation: name.to_string(),
                                reason: "bulk entries must be single-key objects".to_string(),
                            });
                        }
                    }
                }
                Ok(json!({
                    "operation": name,
                    "inserted_count": inserted,
                    "modified_count": modified,
                    "deleted_count": deleted
                }))
            }
            OperationKind::Drop => {
                let old_name = self.active_collection();
                self.collections.remove(&old_name);
                // The dashboard recreates the default collection after a drop
                // so the next run starts from a known namespace.
                *self.active.write() = DEFAULT_COLLECTION.to_string();
                Ok(json!({ "operation": name, "dropped": true }))
            }
        }
    }

    async fn clear(&self) -> Result<u64, StoreError> {
        let removed = self.with_docs(|docs| {
            let count = docs.len();
            docs.clear();
            count
        });
        Ok(removed as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_then_find_by_equality() {
        let store = MemoryStore::new();
        store
            .execute(
                OperationKind::InsertOne,
                &json!({ "document": {"name": "Alice", "status": "active"} }),
            )
            .await
            .unwrap();

        let result = store
            .execute(OperationKind::Find, &json!({ "filter": {"name": "Alice"} }))
            .await
            .unwrap();
        assert_eq!(result["count"], 1);

        let miss = store
            .execute(OperationKind::Find, &json!({ "filter": {"name": "Bob"} }))
            .await
            .unwrap();
        assert_eq!(miss["count"], 0);
    }

    #[tokio::test]
    async fn operator_filters_select_nothing() {
        let store = MemoryStore::new();
        store
            .execute(
                OperationKind::InsertOne,
                &json!({ "document": {"salary": 90000} }),
            )
            .await
            .unwrap();

        let result = store
            .execute(
                OperationKind::Find,
                &json!({ "filter": {"salary": {"$gte": 1}} }),
            )
            .await
            .unwrap();
        assert_eq!(result["count"], 0);
    }

    #[tokio::test]
    async fn index_lifecycle() {
        let store = MemoryStore::new();
        store
            .execute(OperationKind::CreateIndex, &json!({ "keys": [["email", 1]] }))
            .await
            .unwrap();
        assert_eq!(store.index_names(), vec!["email_1".to_string()]);

        store
            .execute(OperationKind::DropIndex, &json!({ "index_name": "email_1" }))
            .await
            .unwrap();

        let missing = store
            .execute(OperationKind::DropIndex, &json!({ "index_name": "email_1" }))
            .await;
        assert!(matches!(missing, Err(StoreError::IndexNotFound(_))));
    }

    #[tokio::test]
    async fn drop_resets_active_collection() {
        let store = MemoryStore::new();
        store
            .execute(OperationKind::Rename, &json!({ "new_name": "backup" }))
            .await
            .unwrap();
        assert_eq!(store.active_collection(), "backup");

        store.execute(OperationKind::Drop, &json!({})).await.unwrap();
        assert_eq!(store.active_collection(), "test_collection");
    }

    #[tokio::test]
    async fn removed_server_commands_fail() {
        let store = MemoryStore::new();
        let result = store
            .execute(OperationKind::MapReduce, &json!({ "map": "", "reduce": "" }))
            .await;
        assert!(matches!(result, Err(StoreError::Unsupported(_))));
    }
}
