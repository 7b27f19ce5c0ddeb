//! Operation catalog
//!
//! The fixed, ordered set of document-store operations a batch run executes.
//! Operations form a closed enum rather than a string-keyed map so an unknown
//! name is unrepresentable: every lookup is an exhaustive match. Catalog
//! order is fixed at construction and deterministic across runs: index
//! creation precedes index drops, and the collection-level `rename` and
//! `drop` come last.

mod operations;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Category grouping for display and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationCategory {
    /// Document insertion.
    Insert,
    /// Queries and find-and-modify variants.
    Find,
    /// In-place updates and replacement.
    Update,
    /// Document deletion.
    Delete,
    /// Document counting.
    Count,
    /// Aggregation pipelines and map-reduce.
    Aggregate,
    /// Index management.
    Index,
    /// Collection-level administration.
    Collection,
    /// Bulk write batches.
    Bulk,
}

/// The closed set of document-store operations the dashboard exercises.
///
/// Declaration order is catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum OperationKind {
    InsertOne,
    InsertMany,
    Insert,
    Save,
    Find,
    FindOne,
    FindOneAndDelete,
    FindOneAndReplace,
    FindOneAndUpdate,
    FindAndModify,
    UpdateOne,
    UpdateMany,
    Update,
    ReplaceOne,
    DeleteOne,
    DeleteMany,
    Remove,
    CountDocuments,
    EstimatedDocumentCount,
    Count,
    Aggregate,
    MapReduce,
    InlineMapReduce,
    CreateIndex,
    CreateIndexes,
    EnsureIndex,
    Reindex,
    DropIndex,
    DropIndexes,
    Distinct,
    Rename,
    BulkWrite,
    Drop,
}

impl OperationKind {
    /// Every operation kind, in catalog order.
    pub const ALL: [OperationKind; 33] = [
        OperationKind::InsertOne,
        OperationKind::InsertMany,
        OperationKind::Insert,
        OperationKind::Save,
        OperationKind::Find,
        OperationKind::FindOne,
        OperationKind::FindOneAndDelete,
        OperationKind::FindOneAndReplace,
        OperationKind::FindOneAndUpdate,
        OperationKind::FindAndModify,
        OperationKind::UpdateOne,
        OperationKind::UpdateMany,
        OperationKind::Update,
        OperationKind::ReplaceOne,
        OperationKind::DeleteOne,
        OperationKind::DeleteMany,
        OperationKind::Remove,
        OperationKind::CountDocuments,
        OperationKind::EstimatedDocumentCount,
        OperationKind::Count,
        OperationKind::Aggregate,
        OperationKind::MapReduce,
        OperationKind::InlineMapReduce,
        OperationKind::CreateIndex,
        OperationKind::CreateIndexes,
        OperationKind::EnsureIndex,
        OperationKind::Reindex,
        OperationKind::DropIndex,
        OperationKind::DropIndexes,
        OperationKind::Distinct,
        OperationKind::Rename,
        OperationKind::BulkWrite,
        OperationKind::Drop,
    ];

    /// Stable wire name, unique across the catalog and stable across runs.
    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::InsertOne => "insert_one",
            OperationKind::InsertMany => "insert_many",
            OperationKind::Insert => "insert",
            OperationKind::Save => "save",
            OperationKind::Find => "find",
            OperationKind::FindOne => "find_one",
            OperationKind::FindOneAndDelete => "find_one_and_delete",
            OperationKind::FindOneAndReplace => "find_one_and_replace",
            OperationKind::FindOneAndUpdate => "find_one_and_update",
            OperationKind::FindAndModify => "find_and_modify",
            OperationKind::UpdateOne => "update_one",
            OperationKind::UpdateMany => "update_many",
            OperationKind::Update => "update",
            OperationKind::ReplaceOne => "replace_one",
            OperationKind::DeleteOne => "delete_one",
            OperationKind::DeleteMany => "delete_many",
            OperationKind::Remove => "remove",
            OperationKind::CountDocuments => "count_documents",
            OperationKind::EstimatedDocumentCount => "estimated_document_count",
            OperationKind::Count => "count",
            OperationKind::Aggregate => "aggregate",
            OperationKind::MapReduce => "map_reduce",
            OperationKind::InlineMapReduce => "inline_map_reduce",
            OperationKind::CreateIndex => "create_index",
            OperationKind::CreateIndexes => "create_indexes",
            OperationKind::EnsureIndex => "ensure_index",
            OperationKind::Reindex => "reindex",
            OperationKind::DropIndex => "drop_index",
            OperationKind::DropIndexes => "drop_indexes",
            OperationKind::Distinct => "distinct",
            OperationKind::Rename => "rename",
            OperationKind::BulkWrite => "bulk_write",
            OperationKind::Drop => "drop",
        }
    }

    /// Category this operation belongs to.
    pub fn category(&self) -> OperationCategory {
        match self {
            OperationKind::InsertOne
            | OperationKind::InsertMany
            | OperationKind::Insert
            | OperationKind::Save => OperationCategory::Insert,
            OperationKind::Find
            | OperationKind::FindOne
            | OperationKind::FindOneAndDelete
            | OperationKind::FindOneAndReplace
            | OperationKind::FindOneAndUpdate
            | OperationKind::FindAndModify => OperationCategory::Find,
            OperationKind::UpdateOne
            | OperationKind::UpdateMany
            | OperationKind::Update
            | OperationKind::ReplaceOne => OperationCategory::Update,
            OperationKind::DeleteOne | OperationKind::DeleteMany | OperationKind::Remove => {
                OperationCategory::Delete
            }
            OperationKind::CountDocuments
            | OperationKind::EstimatedDocumentCount
            | OperationKind::Count => OperationCategory::Count,
            OperationKind::Aggregate
            | OperationKind::MapReduce
            | OperationKind::InlineMapReduce => OperationCategory::Aggregate,
            OperationKind::CreateIndex
            | OperationKind::CreateIndexes
            | OperationKind::EnsureIndex
            | OperationKind::Reindex
            | OperationKind::DropIndex
            | OperationKind::DropIndexes => OperationCategory::Index,
            OperationKind::Distinct | OperationKind::Rename | OperationKind::Drop => {
                OperationCategory::Collection
            }
            OperationKind::BulkWrite => OperationCategory::Bulk,
        }
    }

    /// Whether the driver considers this a legacy method.
    ///
    /// Deprecated kinds stay in the catalog: exercising them against modern
    /// servers is part of what the dashboard demonstrates.
    pub fn is_deprecated(&self) -> bool {
        matches!(
            self,
            OperationKind::Insert
                | OperationKind::Save
                | OperationKind::FindAndModify
                | OperationKind::Update
                | OperationKind::Remove
                | OperationKind::Count
                | OperationKind::MapReduce
                | OperationKind::InlineMapReduce
                | OperationKind::EnsureIndex
                | OperationKind::Reindex
        )
    }
}

/// One catalog entry: an operation kind plus its fixed invocation arguments.
///
/// Immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct OperationSpec {
    kind: OperationKind,
    payload: Value,
}

impl OperationSpec {
    /// Create a spec carrying the standard sample arguments for `kind`.
    pub fn new(kind: OperationKind) -> Self {
        Self {
            kind,
            payload: operations::sample_payload(kind),
        }
    }

    /// The operation kind.
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Stable operation name.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Fixed invocation arguments.
    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

/// Ordered, immutable operation catalog for a process.
#[derive(Debug, Clone)]
pub struct Catalog {
    specs: Vec<OperationSpec>,
}

impl Catalog {
    /// The full standard catalog, in the canonical order.
    pub fn standard() -> Self {
        Self::of(&OperationKind::ALL)
    }

    /// A catalog of the given kinds, in the given order.
    pub fn of(kinds: &[OperationKind]) -> Self {
        Self {
            specs: kinds.iter().copied().map(OperationSpec::new).collect(),
        }
    }

    /// Number of catalog entries.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Iterate entries in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &OperationSpec> {
        self.specs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn standard_catalog_covers_all_kinds_in_order() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.len(), OperationKind::ALL.len());
        for (spec, kind) in catalog.iter().zip(OperationKind::ALL) {
            assert_eq!(spec.kind(), kind);
        }
    }

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = OperationKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names.len(), OperationKind::ALL.len());
    }

    #[test]
    fn wire_name_matches_serde_rename() {
        for kind in OperationKind::ALL {
            let serialized = serde_json::to_value(kind).unwrap();
            assert_eq!(serialized, kind.name());
        }
    }

    #[test]
    fn index_drops_follow_index_creation() {
        let order: Vec<_> = OperationKind::ALL.to_vec();
        let create = order
            .iter()
            .position(|k| *k == OperationKind::CreateIndex)
            .unwrap();
        let drop = order
            .iter()
            .position(|k| *k == OperationKind::DropIndex)
            .unwrap();
        assert!(create < drop);
        assert_eq!(*order.last().unwrap(), OperationKind::Drop);
    }

    #[test]
    fn every_kind_has_a_payload() {
        for kind in OperationKind::ALL {
            let spec = OperationSpec::new(kind);
            assert!(spec.payload().is_object(), "{} payload", spec.name());
        }
    }
}
