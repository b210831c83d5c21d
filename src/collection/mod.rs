//! Named document collections
//!
//! A collection keeps its live documents in memory, keyed by [`ObjectId`],
//! and mirrors every write to the storage log. Opening a collection replays
//! the log so the latest version of each document wins.
//!
//! Each operation takes the collection lock for its whole duration, so single
//! inserts and updates are atomic and concurrent updates are last-writer-wins.

mod errors;

pub use errors::{CollectionError, CollectionResult};

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};

use crate::aggregation::Pipeline;
use crate::document::{ObjectId, ID_FIELD};
use crate::query::{Cursor, Filter, FindOptions};
use crate::storage::{DocumentRecord, StorageError, StorageWriter};

/// Outcome of an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
}

struct CollectionState {
    documents: BTreeMap<ObjectId, Value>,
    writer: Option<StorageWriter>,
}

impl CollectionState {
    fn persist(&mut self, collection: &str, id: ObjectId, document: &Value) -> CollectionResult<()> {
        if let Some(writer) = self.writer.as_mut() {
            let body = serde_json::to_vec(document)?;
            writer.write(&DocumentRecord::new(collection, id.to_hex(), body))?;
        }
        Ok(())
    }
}

/// A named collection of JSON documents
pub struct Collection {
    name: String,
    state: Mutex<CollectionState>,
}

impl Collection {
    /// Opens a collection backed by the storage log under `data_dir`.
    ///
    /// Fails if any record in the log is corrupted.
    pub fn open(data_dir: &Path, name: impl Into<String>) -> CollectionResult<Self> {
        let name = name.into();
        let mut documents = BTreeMap::new();

        let writer = StorageWriter::open_with_replay(data_dir, |record| {
            if record.collection_id != name {
                return Ok(());
            }
            let id = ObjectId::parse_str(&record.document_id).map_err(|e| {
                StorageError::corruption_for_document(&record.document_id, e.to_string())
            })?;
            let document: Value = serde_json::from_slice(&record.document_body).map_err(|e| {
                StorageError::corruption_for_document(&record.document_id, e.to_string())
            })?;
            documents.insert(id, document);
            Ok(())
        })?;

        tracing::info!(
            collection = %name,
            documents = documents.len(),
            path = %writer.path().display(),
            "collection opened"
        );

        Ok(Self {
            name,
            state: Mutex::new(CollectionState {
                documents,
                writer: Some(writer),
            }),
        })
    }

    /// Creates a collection that is never written to disk
    pub fn in_memory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(CollectionState {
                documents: BTreeMap::new(),
                writer: None,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn lock(&self) -> MutexGuard<'_, CollectionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn count(&self) -> usize {
        self.lock().documents.len()
    }

    /// Inserts a document and returns its new identifier.
    ///
    /// Any `_id` in the input is replaced. Nothing is kept in memory if the
    /// log write fails.
    pub fn insert_one(&self, document: Value) -> CollectionResult<ObjectId> {
        let Value::Object(mut fields) = document else {
            return Err(CollectionError::NotAnObject);
        };

        let id = ObjectId::new();
        fields.insert(ID_FIELD.to_string(), Value::String(id.to_hex()));
        let document = Value::Object(fields);

        let mut state = self.lock();
        state.persist(&self.name, id, &document)?;
        state.documents.insert(id, document);

        tracing::debug!(collection = %self.name, id = %id, "document inserted");
        Ok(id)
    }

    pub fn find_by_id(&self, id: ObjectId) -> Option<Value> {
        self.lock().documents.get(&id).cloned()
    }

    /// First document matching the filter, in identifier order
    pub fn find_one(&self, filter: &Filter) -> Option<Value> {
        self.lock()
            .documents
            .values()
            .find(|d| filter.matches(d))
            .cloned()
    }

    /// Documents matching the filter, shaped by `options`
    pub fn find(&self, filter: &Filter, options: &FindOptions) -> Cursor {
        let matched: Vec<Value> = self
            .lock()
            .documents
            .values()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect();

        Cursor::new(options.apply(matched))
    }

    /// Sets `fields` on the first document matching `filter`.
    ///
    /// `_id` cannot be changed. No match is not an error. A document whose
    /// fields already hold the given values is not rewritten.
    pub fn update_one(&self, filter: &Filter, fields: Map<String, Value>) -> CollectionResult<UpdateResult> {
        let mut state = self.lock();

        let Some((id, current)) = state
            .documents
            .iter()
            .find(|(_, d)| filter.matches(d))
            .map(|(id, d)| (*id, d.clone()))
        else {
            return Ok(UpdateResult {
                matched_count: 0,
                modified_count: 0,
            });
        };

        let mut updated = current.clone();
        if let Some(object) = updated.as_object_mut() {
            for (key, value) in fields {
                if key != ID_FIELD {
                    object.insert(key, value);
                }
            }
        }

        if updated == current {
            return Ok(UpdateResult {
                matched_count: 1,
                modified_count: 0,
            });
        }

        state.persist(&self.name, id, &updated)?;
        state.documents.insert(id, updated);

        tracing::debug!(collection = %self.name, id = %id, "document updated");
        Ok(UpdateResult {
            matched_count: 1,
            modified_count: 1,
        })
    }

    /// Runs a pipeline over a snapshot of every document.
    pub fn aggregate(&self, pipeline: &Pipeline) -> CollectionResult<Cursor> {
        let snapshot: Vec<Value> = self.lock().documents.values().cloned().collect();

        tracing::debug!(
            collection = %self.name,
            stages = ?pipeline.stage_names(),
            input = snapshot.len(),
            "running aggregation"
        );

        Ok(Cursor::new(pipeline.run(snapshot)?))
    }
}
