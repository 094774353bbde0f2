//! Key-path document store clients.

use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sitecontent_core::paths;

use crate::StoreError;

/// A remote key-path document store.
///
/// Single-key reads are atomic snapshots; nothing is ordered across keys.
/// `Ok(None)` means nothing is stored at the path.
#[async_trait]
pub trait DocumentClient: Send + Sync {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the value at `path`. Writing `null` removes it.
    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError>;
}

/// Read the value at `path` inside a document tree.
///
/// Array nodes are indexed by numeric segments. `null` reads as absent.
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut node = root;
    for segment in paths::segments(path) {
        node = match node {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    (!node.is_null()).then_some(node)
}

/// Write `value` at `path`, creating intermediate objects. Scalars in the
/// way are replaced. Writing `null` removes the key.
pub fn insert(root: &mut Value, path: &str, value: Value) {
    let segments: Vec<&str> = paths::segments(path).collect();
    let Some((last, parents)) = segments.split_last() else {
        *root = value;
        return;
    };

    let mut node = root;
    for segment in parents {
        node = child_mut(node, segment);
    }

    if let Some(index) = last.parse::<usize>().ok()
        && let Some(items) = node.as_array_mut()
        && index < items.len()
    {
        items[index] = value;
        return;
    }

    let map = as_object(node);
    if value.is_null() {
        map.remove(*last);
    } else {
        map.insert(last.to_string(), value);
    }
}

fn child_mut<'a>(node: &'a mut Value, segment: &str) -> &'a mut Value {
    if let Some(index) = segment.parse::<usize>().ok()
        && node.as_array().is_some_and(|items| index < items.len())
    {
        return &mut node[index];
    }
    as_object(node)
        .entry(segment.to_string())
        .or_insert_with(|| Value::Object(Map::new()))
}

fn as_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just replaced with an object"),
    }
}

/// In-memory document tree. Used for tests, seeding dry runs, and as the
/// backing tree of [`JsonFileClient`](crate::JsonFileClient).
#[derive(Debug, Default)]
pub struct MemoryDocumentClient {
    root: RwLock<Value>,
}

impl MemoryDocumentClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: Value) -> Self {
        Self {
            root: RwLock::new(root),
        }
    }

    /// Copy of the whole tree.
    pub fn snapshot(&self) -> Value {
        self.root
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl DocumentClient for MemoryDocumentClient {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let root = self.root.read().unwrap_or_else(|e| e.into_inner());
        Ok(lookup(&root, path).cloned())
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        let mut root = self.root.write().unwrap_or_else(|e| e.into_inner());
        insert(&mut root, path, value);
        Ok(())
    }
}
