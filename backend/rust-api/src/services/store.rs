use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, Bson};
use mongodb::Database;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::errors::DataAccessError;
use crate::metrics::track_db_operation;

/// A stored record: a flat JSON object. The key is kept outside the document.
pub type Document = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Equality filters, sort keys in priority order and an optional limit.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub filters: Vec<(String, Value)>,
    pub order_by: Vec<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push((field.to_string(), value.into()));
        self
    }

    /// Appends a sort key. Later keys break ties left by earlier ones.
    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by.push((field.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, document: &Document) -> bool {
        self.filters
            .iter()
            .all(|(field, value)| document.get(field) == Some(value))
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, DataAccessError>;

    /// Create or replace.
    async fn put(&self, collection: &str, key: &str, document: Document)
        -> Result<(), DataAccessError>;

    /// Shallow merge of `partial` into an existing document.
    async fn update(
        &self,
        collection: &str,
        key: &str,
        partial: Document,
    ) -> Result<(), DataAccessError>;

    async fn delete(&self, collection: &str, key: &str) -> Result<(), DataAccessError>;

    async fn query(&self, collection: &str, query: &Query)
        -> Result<Vec<Document>, DataAccessError>;

    async fn ping(&self) -> Result<(), DataAccessError>;
}

pub fn to_document<T: Serialize>(value: &T) -> Result<Document, DataAccessError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(DataAccessError::Backend(format!(
            "expected an object, got {}",
            other
        ))),
    }
}

pub fn from_document<T: DeserializeOwned>(document: Document) -> Result<T, DataAccessError> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

pub async fn load<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    key: &str,
) -> Result<Option<T>, DataAccessError> {
    store
        .get(collection, key)
        .await?
        .map(from_document)
        .transpose()
}

pub async fn save<T: Serialize + Sync>(
    store: &dyn DocumentStore,
    collection: &str,
    key: &str,
    value: &T,
) -> Result<(), DataAccessError> {
    let document = to_document(value)?;
    store.put(collection, key, document).await
}

pub async fn load_all<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    query: &Query,
) -> Result<Vec<T>, DataAccessError> {
    store
        .query(collection, query)
        .await?
        .into_iter()
        .map(from_document)
        .collect()
}

/// Process-local store for tests and the `memory` backend.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Document>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, DataAccessError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(key))
            .cloned())
    }

    async fn put(
        &self,
        collection: &str,
        key: &str,
        document: Document,
    ) -> Result<(), DataAccessError> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), document);
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        key: &str,
        partial: Document,
    ) -> Result<(), DataAccessError> {
        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(key))
            .ok_or_else(|| DataAccessError::NotFound {
                collection: collection.to_string(),
                key: key.to_string(),
            })?;
        existing.extend(partial);
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), DataAccessError> {
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(key);
        }
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        query: &Query,
    ) -> Result<Vec<Document>, DataAccessError> {
        let collections = self.collections.read().await;
        let mut rows: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| query.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if !query.order_by.is_empty() {
            rows.sort_by(|a, b| {
                query
                    .order_by
                    .iter()
                    .map(|(field, direction)| {
                        let ordering = compare_values(a.get(field), b.get(field));
                        match direction {
                            Direction::Ascending => ordering,
                            Direction::Descending => ordering.reverse(),
                        }
                    })
                    .find(|ordering| *ordering != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn ping(&self) -> Result<(), DataAccessError> {
        Ok(())
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// MongoDB-backed store. The key lives in `_id`.
pub struct MongoDocumentStore {
    mongo: Database,
}

impl MongoDocumentStore {
    pub fn new(mongo: Database) -> Self {
        Self { mongo }
    }

    fn collection(&self, name: &str) -> mongodb::Collection<bson::Document> {
        self.mongo.collection::<bson::Document>(name)
    }
}

fn to_bson_document(document: Document) -> Result<bson::Document, DataAccessError> {
    bson::to_document(&Value::Object(document))
        .map_err(|err| DataAccessError::Backend(format!("bson encoding failed: {}", err)))
}

fn from_bson_document(mut document: bson::Document) -> Document {
    document.remove("_id");
    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, DataAccessError> {
        let found = track_db_operation("find_one", collection, async {
            self.collection(collection)
                .find_one(doc! { "_id": key })
                .await
                .map_err(DataAccessError::from)
        })
        .await?;
        Ok(found.map(from_bson_document))
    }

    async fn put(
        &self,
        collection: &str,
        key: &str,
        document: Document,
    ) -> Result<(), DataAccessError> {
        let replacement = to_bson_document(document)?;
        track_db_operation("replace_one", collection, async {
            self.collection(collection)
                .replace_one(doc! { "_id": key }, replacement)
                .upsert(true)
                .await
                .map_err(DataAccessError::from)
        })
        .await?;
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        key: &str,
        partial: Document,
    ) -> Result<(), DataAccessError> {
        let fields = to_bson_document(partial)?;
        let result = track_db_operation("update_one", collection, async {
            self.collection(collection)
                .update_one(doc! { "_id": key }, doc! { "$set": fields })
                .await
                .map_err(DataAccessError::from)
        })
        .await?;

        if result.matched_count == 0 {
            return Err(DataAccessError::NotFound {
                collection: collection.to_string(),
                key: key.to_string(),
            });
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), DataAccessError> {
        track_db_operation("delete_one", collection, async {
            self.collection(collection)
                .delete_one(doc! { "_id": key })
                .await
                .map_err(DataAccessError::from)
        })
        .await?;
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        query: &Query,
    ) -> Result<Vec<Document>, DataAccessError> {
        let mut filter = bson::Document::new();
        for (field, value) in &query.filters {
            let value = bson::to_bson(value)
                .map_err(|err| DataAccessError::Backend(format!("bson encoding failed: {}", err)))?;
            filter.insert(field.clone(), value);
        }

        let rows = track_db_operation("find", collection, async {
            let coll = self.collection(collection);
            let mut find = coll.find(filter);
            if !query.order_by.is_empty() {
                let mut sort = bson::Document::new();
                for (field, direction) in &query.order_by {
                    let order = match direction {
                        Direction::Ascending => 1,
                        Direction::Descending => -1,
                    };
                    sort.insert(field.clone(), order);
                }
                find = find.sort(sort);
            }
            if let Some(limit) = query.limit {
                find = find.limit(limit as i64);
            }

            let cursor = find.await.map_err(DataAccessError::from)?;
            cursor
                .try_collect::<Vec<_>>()
                .await
                .map_err(DataAccessError::from)
        })
        .await?;

        Ok(rows.into_iter().map(from_bson_document).collect())
    }

    async fn ping(&self) -> Result<(), DataAccessError> {
        tokio::time::timeout(
            std::time::Duration::from_secs(1),
            self.mongo.run_command(doc! { "ping": 1 }),
        )
        .await
        .map_err(|_| DataAccessError::Backend("MongoDB timeout after 1s".to_string()))??;
        Ok(())
    }
}
