//! Admin-only writes: seeding the content tree and saving edited records.
//!
//! Sign-in happens elsewhere. This module only asks an [`AccessGate`]
//! whether the current caller may write, and keeps the [`QueryCache`]
//! coherent with what it wrote.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::{Map, Value};
use sitecontent_core::form::{self, FormSchema, FormValues};
use sitecontent_core::paths;
use tracing::{info, warn};

use crate::{DocumentClient, EditError, QueryCache};

/// The authentication collaborator, reduced to what the admin surface needs.
pub trait AccessGate: Send + Sync {
    fn current_user(&self) -> Option<&str>;
    fn is_authorized(&self) -> bool;
}

/// A fixed session: a signed-in user checked against an admin allow-list.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    user: Option<String>,
    admins: BTreeSet<String>,
}

impl StaticSession {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            admins: BTreeSet::new(),
        }
    }

    pub fn with_admins<I, S>(mut self, admins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.admins = admins.into_iter().map(Into::into).collect();
        self
    }
}

impl AccessGate for StaticSession {
    fn current_user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    fn is_authorized(&self) -> bool {
        self.user
            .as_ref()
            .is_some_and(|user| self.admins.contains(user))
    }
}

pub struct ContentEditor {
    cache: QueryCache,
    gate: Arc<dyn AccessGate>,
}

impl ContentEditor {
    /// Writes go through the cache's own client so invalidation targets
    /// the same store.
    pub fn new(cache: QueryCache, gate: Arc<dyn AccessGate>) -> Self {
        Self { cache, gate }
    }

    fn client(&self) -> &Arc<dyn DocumentClient> {
        self.cache.client()
    }

    fn authorize(&self, action: &str) -> Result<&str, EditError> {
        match self.gate.current_user() {
            Some(user) if self.gate.is_authorized() => Ok(user),
            user => {
                warn!(user = user.unwrap_or("anonymous"), action, "unauthorized edit refused");
                Err(EditError::Unauthorized)
            }
        }
    }

    /// Write each top-level subtree of `tree` under `siteContent/`.
    ///
    /// `tree` may be the content object itself or wrapped in a
    /// `siteContent` key. Returns the number of subtrees written.
    pub async fn seed(&self, tree: &Value) -> Result<usize, EditError> {
        let user = self.authorize("seed")?.to_string();
        let empty = Map::new();
        let content = tree
            .get(paths::ROOT)
            .unwrap_or(tree)
            .as_object()
            .unwrap_or(&empty);

        let mut written = 0usize;
        for (subtree, value) in content {
            if let Err(e) = self.client().set(&paths::content(subtree), value.clone()).await {
                // Earlier subtrees may already be stored.
                self.cache.invalidate_prefix(paths::ROOT);
                warn!(user = %user, subtree = %subtree, written, error = %e, "seed stopped");
                return Err(e.into());
            }
            written += 1;
        }
        self.cache.invalidate_prefix(paths::ROOT);
        info!(user = %user, subtrees = content.len(), "seeded content");
        Ok(content.len())
    }

    /// Write one value and drop its cached read, along with any cached
    /// parent or child path.
    pub async fn save(&self, path: &str, value: Value) -> Result<(), EditError> {
        let user = self.authorize("save")?.to_string();
        let path = path.trim_matches('/');
        if !path
            .strip_prefix(paths::ROOT)
            .is_some_and(|rest| rest.starts_with('/'))
        {
            return Err(EditError::OutsideNamespace(path.to_string()));
        }

        self.client().set(path, value).await?;
        self.cache.invalidate_prefix(path);
        for (i, _) in path.match_indices('/') {
            self.cache.invalidate(&path[..i]);
        }
        info!(user = %user, path = %path, "saved content");
        Ok(())
    }

    /// Validate `values` against `schema`, then save them merged over the
    /// fields already stored at `path`.
    pub async fn save_validated(
        &self,
        path: &str,
        values: &FormValues,
        schema: &FormSchema,
    ) -> Result<(), EditError> {
        self.authorize("save")?;
        let errors = form::compute_errors(values, schema);
        if !errors.is_empty() {
            return Err(EditError::Invalid {
                path: path.to_string(),
                fields: errors
                    .iter()
                    .map(|(field, error)| format!("{field}: {error}"))
                    .collect(),
            });
        }

        let mut record = match self.client().get(path).await? {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        for (field, value) in values {
            record.insert(field.clone(), Value::String(value.clone()));
        }
        self.save(path, Value::Object(record)).await
    }
}
