//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::BoxFuture;
use querygate::compiler::Predicate;
use querygate::registry::{TableDescriptor, TableRegistry};
use querygate::store::{DataStore, MemoryStore, OrderBy, Row, StoreError, StoreResult};
use querygate::SearchResult;
use serde_json::json;

/// One call observed by [`RecordingStore`]
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub table: String,
    pub predicate: Predicate,
    pub select: Vec<String>,
    pub order_by: OrderBy,
}

/// Delegates to a [`MemoryStore`] and records every call
pub struct RecordingStore {
    inner: MemoryStore,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl DataStore for RecordingStore {
    fn find_matching<'a>(
        &'a self,
        table: &'a str,
        predicate: &'a Predicate,
        select: &'a [String],
        order_by: &'a OrderBy,
    ) -> BoxFuture<'a, StoreResult<Vec<Row>>> {
        self.calls.lock().unwrap().push(RecordedCall {
            table: table.to_string(),
            predicate: predicate.clone(),
            select: select.to_vec(),
            order_by: order_by.clone(),
        });
        self.inner.find_matching(table, predicate, select, order_by)
    }
}

/// Fails every call against one table, serves the rest from memory
pub struct FailingTableStore {
    pub inner: MemoryStore,
    pub failing_table: &'static str,
}

impl DataStore for FailingTableStore {
    fn find_matching<'a>(
        &'a self,
        table: &'a str,
        predicate: &'a Predicate,
        select: &'a [String],
        order_by: &'a OrderBy,
    ) -> BoxFuture<'a, StoreResult<Vec<Row>>> {
        if table == self.failing_table {
            return Box::pin(async { Err(StoreError::Backend("relation is locked".into())) });
        }
        self.inner.find_matching(table, predicate, select, order_by)
    }
}

/// Never answers within any reasonable deadline
pub struct StalledStore;

impl DataStore for StalledStore {
    fn find_matching<'a>(
        &'a self,
        _table: &'a str,
        _predicate: &'a Predicate,
        _select: &'a [String],
        _order_by: &'a OrderBy,
    ) -> BoxFuture<'a, StoreResult<Vec<Row>>> {
        Box::pin(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Vec::new())
        })
    }
}

pub fn registry() -> Arc<TableRegistry> {
    Arc::new(
        TableRegistry::builder()
            .table(
                "profiles",
                TableDescriptor::new("id")
                    .with_text_field("username")
                    .with_text_field("bio"),
            )
            .table(
                "packs",
                TableDescriptor::new("id")
                    .with_text_field("name")
                    .with_text_field("owner_id")
                    .with_text_field("weight")
                    .with_enumerated_field("content_type"),
            )
            .table(
                "posts",
                TableDescriptor::new("post_id")
                    .with_created_field("published_at")
                    .with_text_field("body")
                    .with_text_field("author_id"),
            )
            .build()
            .unwrap(),
    )
}

pub fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();

    for row in [
        json!({"id": "u1", "username": "foxglove", "bio": "alpine hiker", "created_at": "2024-01-01"}),
        json!({"id": "u2", "username": "marten", "bio": "Fox photographer", "created_at": "2024-02-01"}),
        json!({"id": "u3", "username": "heron", "bio": "river walks", "created_at": "2024-03-01"}),
    ] {
        store.insert("profiles", row).unwrap();
    }

    for row in [
        json!({"id": "k1", "name": "Fox base kit", "owner_id": "u1", "weight": 10, "content_type": "pack", "created_at": "2024-01-05"}),
        json!({"id": "k2", "name": "Day hike", "owner_id": "u2", "weight": 20, "content_type": "pack", "created_at": "2024-01-06"}),
        json!({"id": "k3", "name": "Winter", "owner_id": "u3", "weight": 30, "content_type": "template", "created_at": "2024-01-07"}),
        json!({"id": "k4", "name": "Overnight", "owner_id": "u3", "weight": 40, "content_type": "pack", "created_at": "2024-01-08"}),
    ] {
        store.insert("packs", row).unwrap();
    }

    for row in [
        json!({"post_id": 100, "body": "trip report", "author_id": "u1", "published_at": 5}),
        json!({"post_id": 101, "body": "gear list", "author_id": "u3", "published_at": 9}),
    ] {
        store.insert("posts", row).unwrap();
    }

    store
}

pub fn ids(results: &[SearchResult]) -> Vec<&str> {
    results.iter().map(|r| r.id.as_str()).collect()
}
