// 💾 File Storage - identity map + JSON persistence
//
// Owns every live model, keyed by `<Class>.<id>`. The whole map is written
// to one JSON document on every save; reload resolves each record's
// `__class__` tag through the ClassRegistry and fails loudly on anything
// it cannot rebuild.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{composite_key, ClassRegistry, Model, ModelError, ModelKind, CLASS_FIELD};

/// Backing file used when nothing else is configured
pub const DEFAULT_FILE_PATH: &str = "file.json";

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not valid JSON: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} must hold a JSON object keyed by <Class>.<id>", .path.display())]
    NotAnObject { path: PathBuf },

    #[error("record {key:?} is not a JSON object")]
    RecordNotObject { key: String },

    #[error("record {key:?} has no __class__ tag")]
    MissingClass { key: String },

    #[error("record {key:?} has unknown class {class:?}")]
    UnknownClass { key: String, class: String },

    #[error("records {first:?} and {second:?} both resolve to {key:?}")]
    DuplicateKey { key: String, first: String, second: String },

    #[error("record {key:?} cannot be rebuilt: {source}")]
    Record {
        key: String,
        #[source]
        source: ModelError,
    },

    #[error("cannot serialize storage: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ============================================================================
// FILE STORAGE
// ============================================================================

/// FileStorage - the single storage context of a console session
///
/// Construct once, call `reload` once, then hand it to the console.
/// Nothing here is shared across threads.
pub struct FileStorage {
    path: PathBuf,
    objects: BTreeMap<String, Model>,
    registry: ClassRegistry,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStorage {
            path: path.into(),
            objects: BTreeMap::new(),
            registry: ClassRegistry::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    // ========================================================================
    // IDENTITY MAP
    // ========================================================================

    /// The live identity map
    pub fn all(&self) -> &BTreeMap<String, Model> {
        &self.objects
    }

    /// Models of one class, in key order
    pub fn all_of(&self, kind: ModelKind) -> impl Iterator<Item = &Model> + '_ {
        self.objects.values().filter(move |m| m.kind() == kind)
    }

    /// Insert or overwrite a model at `<Class>.<id>`
    ///
    /// # Panics
    /// If the model has no id. That is a programming error, not user input.
    pub fn register(&mut self, model: Model) {
        assert!(!model.id().is_empty(), "cannot register a model without an id");
        self.objects.insert(model.key(), model);
    }

    pub fn get(&self, kind: ModelKind, id: &str) -> Option<&Model> {
        self.objects.get(&composite_key(kind, id))
    }

    pub fn get_mut(&mut self, kind: ModelKind, id: &str) -> Option<&mut Model> {
        self.objects.get_mut(&composite_key(kind, id))
    }

    pub fn remove(&mut self, kind: ModelKind, id: &str) -> Option<Model> {
        self.objects.remove(&composite_key(kind, id))
    }

    /// Number of models of one class
    pub fn count(&self, kind: ModelKind) -> usize {
        self.all_of(kind).count()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    /// Rewrite the backing file with the full identity map
    ///
    /// Writes a sibling `.tmp` file first and renames it over the target,
    /// so a crash mid-write never leaves a truncated document behind.
    pub fn save(&self) -> Result<(), StorageError> {
        let document: Map<String, Value> = self
            .objects
            .iter()
            .map(|(key, model)| (key.clone(), Value::Object(model.to_record())))
            .collect();
        let text = serde_json::to_string(&Value::Object(document))?;

        let tmp = self.tmp_path();
        let write_err = |source: io::Error| StorageError::Write {
            path: self.path.clone(),
            source,
        };

        let mut file = fs::File::create(&tmp).map_err(write_err)?;
        file.write_all(text.as_bytes()).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;
        drop(file);
        fs::rename(&tmp, &self.path).map_err(write_err)?;

        debug!(path = %self.path.display(), objects = self.objects.len(), "storage saved");
        Ok(())
    }

    /// Load the backing file into the identity map
    ///
    /// A missing file is not an error: the map stays as it is and `0` is
    /// returned. Every record is rebuilt before any is registered, so a
    /// failure leaves the map untouched.
    pub fn reload(&mut self) -> Result<usize, StorageError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no storage file yet");
                return Ok(0);
            }
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let document: Value = serde_json::from_str(&text).map_err(|source| StorageError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        let Value::Object(records) = document else {
            return Err(StorageError::NotAnObject {
                path: self.path.clone(),
            });
        };

        // derived key -> stored key it came from
        let mut seen: HashMap<String, &str> = HashMap::with_capacity(records.len());
        let mut staged = Vec::with_capacity(records.len());
        for (key, record) in &records {
            let model = self.rebuild(key, record)?;
            if let Some(first) = seen.insert(model.key(), key) {
                return Err(StorageError::DuplicateKey {
                    key: model.key(),
                    first: first.to_string(),
                    second: key.clone(),
                });
            }
            staged.push(model);
        }

        let loaded = staged.len();
        for model in staged {
            self.register(model);
        }

        info!(path = %self.path.display(), loaded, "storage reloaded");
        Ok(loaded)
    }

    fn rebuild(&self, key: &str, record: &Value) -> Result<Model, StorageError> {
        let Value::Object(fields) = record else {
            return Err(StorageError::RecordNotObject { key: key.to_string() });
        };

        let class = fields
            .get(CLASS_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| StorageError::MissingClass { key: key.to_string() })?;

        let entry = self
            .registry
            .resolve(class)
            .ok_or_else(|| StorageError::UnknownClass {
                key: key.to_string(),
                class: class.to_string(),
            })?;

        let model = entry.construct(Some(fields)).map_err(|source| StorageError::Record {
            key: key.to_string(),
            source,
        })?;

        if model.key() != key {
            warn!(stored = key, derived = %model.key(), "record key does not match its class and id");
        }
        Ok(model)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

// ============================================================================
// TESTS
// ============================================================================
