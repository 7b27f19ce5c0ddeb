//! Fixed sample arguments for each catalog entry.
//!
//! The demo dataset is a small employee collection; payloads are chosen so a
//! run over a fresh collection exercises every operation meaningfully
//! (inserts seed the documents later queries and updates touch).

use serde_json::{json, Value};

use super::OperationKind;

pub(crate) fn sample_payload(kind: OperationKind) -> Value {
    match kind {
        OperationKind::InsertOne => json!({
            "document": {
                "name": "Alice Johnson", "age": 30, "email": "alice@example.com",
                "status": "active", "department": "Engineering", "salary": 85000,
                "tags": ["rust", "mongodb"]
            }
        }),
        OperationKind::InsertMany => json!({
            "documents": [
                {"name": "Bob Smith", "age": 25, "email": "bob@example.com", "status": "active", "department": "Marketing", "salary": 65000},
                {"name": "Charlie Brown", "age": 35, "email": "charlie@example.com", "status": "inactive", "department": "Engineering", "salary": 95000},
                {"name": "Diana Ross", "age": 28, "email": "diana@example.com", "status": "active", "department": "Sales", "salary": 72000},
                {"name": "Edward Chen", "age": 42, "email": "edward@example.com", "status": "active", "department": "Engineering", "salary": 120000},
                {"name": "Fiona Garcia", "age": 31, "email": "fiona@example.com", "status": "active", "department": "HR", "salary": 68000}
            ]
        }),
        OperationKind::Insert => json!({
            "document": {"name": "George Wilson", "age": 45, "department": "Finance", "salary": 110000}
        }),
        OperationKind::Save => json!({
            "document": {"name": "Hannah Lee", "age": 33, "department": "Engineering", "salary": 92000}
        }),
        OperationKind::Find => json!({
            "filter": {"status": "active"},
            "limit": 50
        }),
        OperationKind::FindOne => json!({
            "filter": {"name": "Edward Chen"}
        }),
        OperationKind::FindOneAndDelete => json!({
            "filter": {"status": "inactive"}
        }),
        OperationKind::FindOneAndReplace => json!({
            "filter": {"email": "diana@example.com"},
            "replacement": {
                "name": "Diana Ross-Smith", "age": 29, "email": "diana@example.com",
                "status": "active", "department": "Sales", "salary": 82000
            }
        }),
        OperationKind::FindOneAndUpdate => json!({
            "filter": {"department": "Sales"},
            "update": {"$set": {"last_activity": "2024-12-09"}}
        }),
        OperationKind::FindAndModify => json!({
            "filter": {"department": "Finance"},
            "update": {"$set": {"high_earner": true}}
        }),
        OperationKind::UpdateOne => json!({
            "filter": {"name": "Alice Johnson"},
            "update": {"$set": {"status": "senior"}}
        }),
        OperationKind::UpdateMany => json!({
            "filter": {"department": "Engineering"},
            "update": {"$set": {"review_pending": true}}
        }),
        OperationKind::Update => json!({
            "filter": {"name": "Bob Smith"},
            "update": {"$set": {"address": "San Francisco"}}
        }),
        OperationKind::ReplaceOne => json!({
            "filter": {"name": "Fiona Garcia"},
            "replacement": {
                "name": "Fiona Garcia", "age": 32, "department": "HR",
                "salary": 75000, "promoted": true
            }
        }),
        OperationKind::DeleteOne => json!({
            "filter": {"status": "temporary"}
        }),
        OperationKind::DeleteMany => json!({
            "filter": {"department": "Intern"}
        }),
        OperationKind::Remove => json!({
            "filter": {"name": "NonExistent User"}
        }),
        OperationKind::CountDocuments => json!({
            "filter": {"department": "Engineering"}
        }),
        OperationKind::EstimatedDocumentCount => json!({}),
        OperationKind::Count => json!({
            "filter": {"status": "active"}
        }),
        OperationKind::Aggregate => json!({
            "pipeline": [
                {"$match": {"status": "active"}},
                {"$group": {"_id": "$department", "avg_salary": {"$avg": "$salary"}, "count": {"$sum": 1}}},
                {"$sort": {"avg_salary": -1}}
            ]
        }),
        OperationKind::MapReduce => json!({
            "map": "function() { emit(this.department, this.salary); }",
            "reduce": "function(key, values) { return Array.sum(values); }",
            "out": "salary_by_dept"
        }),
        OperationKind::InlineMapReduce => json!({
            "map": "function() { emit(this.department, 1); }",
            "reduce": "function(key, values) { return Array.sum(values); }"
        }),
        OperationKind::CreateIndex => json!({
            "keys": [["email", 1]]
        }),
        OperationKind::CreateIndexes => json!({
            "indexes": [
                {"keys": [["department", 1], ["salary", -1]]},
                {"keys": [["status", 1]]}
            ]
        }),
        OperationKind::EnsureIndex => json!({
            "keys": [["age", 1]]
        }),
        OperationKind::Reindex => json!({}),
        OperationKind::DropIndex => json!({
            "index_name": "email_1"
        }),
        OperationKind::DropIndexes => json!({}),
        OperationKind::Distinct => json!({
            "key": "department"
        }),
        OperationKind::Rename => json!({
            "new_name": "test_collection_backup"
        }),
        OperationKind::BulkWrite => json!({
            "operations": [
                {"insert_one": {"document": {"name": "Bulk User 1", "age": 25, "department": "Temp"}}},
                {"update_one": {"filter": {"name": "Bulk User 1"}, "update": {"$set": {"bulk_tested": true}}}},
                {"delete_one": {"filter": {"name": "Bulk User 1"}}}
            ]
        }),
        OperationKind::Drop => json!({}),
    }
}
