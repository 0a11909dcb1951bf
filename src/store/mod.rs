//! # Template Lifecycle / Persistence
//!
//! Draft → official lifecycle, soft delete, version snapshots, and the
//! best-effort dual write: every save tries the remote store first and
//! degrades to the local file cache on any failure, so editing never
//! blocks on the network and never loses work. Persistence failures are
//! logged, not raised. The only errors this module returns are lifecycle
//! rule violations (publishing an unknown template, deleting the last
//! one).
//!
//! Saves are correlated by template id plus the editor's sequence number:
//! a save that was superseded while in flight is discarded instead of
//! clobbering newer edits (last writer wins).

pub mod cache;
pub mod remote;

pub use cache::TemplateCache;
pub use remote::{HttpRemote, RemoteStore, TemplateRow, TemplateVersion};

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::editor::SaveRequest;
use crate::error::GafeteError;
use crate::template::{Template, TemplateStatus, Violation, validate};

/// Store configuration: remote endpoint (omit for offline mode), cache
/// directory, and the actor recorded in audit columns.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub base_url: Option<String>,
    pub cache_dir: PathBuf,
    pub actor: Option<String>,
}

/// Where a save ended up.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// Written to the remote store (and mirrored to the cache).
    Remote,
    /// Remote unreachable; written to the local cache only.
    Cached,
    /// A newer save for the same template id won; this one was dropped.
    Superseded,
    /// The template failed validation and was not persisted.
    Invalid(Vec<Violation>),
}

/// The persistence front door. Shared state follows the usual
/// `Arc<RwLock<...>>` shape so saves issued from different tasks agree on
/// the newest sequence number per template.
pub struct TemplateStore {
    remote: Option<Arc<dyn RemoteStore>>,
    cache: TemplateCache,
    actor: Option<String>,
    latest_seq: Arc<RwLock<HashMap<String, u64>>>,
}

impl TemplateStore {
    pub fn new(config: StoreConfig) -> Result<Self, GafeteError> {
        let remote: Option<Arc<dyn RemoteStore>> = match &config.base_url {
            Some(url) => Some(Arc::new(HttpRemote::new(url.clone())?)),
            None => None,
        };
        Ok(Self {
            remote,
            cache: TemplateCache::new(config.cache_dir),
            actor: config.actor,
            latest_seq: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Cache-only store: every save lands locally.
    pub fn offline(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            remote: None,
            cache: TemplateCache::new(cache_dir),
            actor: None,
            latest_seq: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Store over a specific remote implementation (used by tests).
    pub fn with_remote(remote: Arc<dyn RemoteStore>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            remote: Some(remote),
            cache: TemplateCache::new(cache_dir),
            actor: None,
            latest_seq: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// All rows for an event, remote first, cache on failure. Never
    /// fails; an unreachable remote plus an empty cache is an empty set.
    async fn fetch_rows(&self, event_id: &str) -> Vec<TemplateRow> {
        if let Some(remote) = &self.remote {
            match remote.list(event_id).await {
                Ok(rows) => {
                    if let Err(e) = self.cache.write(event_id, &rows) {
                        eprintln!("[store] cache mirror failed for {}: {}", event_id, e);
                    }
                    return rows;
                }
                Err(e) => {
                    eprintln!(
                        "[store] remote list failed for {}: {} (falling back to cache)",
                        event_id, e
                    );
                }
            }
        }
        self.cache.read(event_id).unwrap_or_else(|e| {
            eprintln!("[store] cache read failed for {}: {}", event_id, e);
            Vec::new()
        })
    }

    /// Live (non-deleted) templates for an event. When neither the remote
    /// nor the cache has anything, synthesizes the default badge so the
    /// editor is never empty.
    pub async fn load(&self, event_id: &str) -> Vec<TemplateRow> {
        let rows = self.fetch_rows(event_id).await;
        let live: Vec<TemplateRow> = rows
            .into_iter()
            .filter(|r| r.deleted_at.is_none())
            .collect();
        if !live.is_empty() {
            return live;
        }

        let row = TemplateRow::from_template(&Template::default_badge(event_id));
        if let Err(e) = self.cache.upsert(event_id, &row) {
            eprintln!("[store] default template cache failed for {}: {}", event_id, e);
        }
        vec![row]
    }

    /// Best-effort save. Create-if-no-remote-id, else update; any remote
    /// failure degrades to the cache. Returns where the row landed,
    /// never an error.
    pub async fn save(&self, request: &SaveRequest) -> SaveOutcome {
        let template_id = request.template.id.clone();

        {
            let mut latest = self.latest_seq.write().await;
            let entry = latest.entry(template_id.clone()).or_insert(0);
            if request.seq < *entry {
                return SaveOutcome::Superseded;
            }
            *entry = request.seq;
        }

        let violations = validate(&request.template);
        if !violations.is_empty() {
            return SaveOutcome::Invalid(violations);
        }

        let row = self.row_for(&request.template);
        let event_id = row.event_id.clone();

        let pushed = match &self.remote {
            Some(remote) => {
                if row.remote_id.is_some() {
                    remote.update(&row).await
                } else {
                    remote.create(&row).await
                }
            }
            None => Err(GafeteError::Store("no remote configured".into())),
        };

        // A newer save was issued while this one was in flight: its
        // writer wins, this response is dropped.
        {
            let latest = self.latest_seq.read().await;
            if latest.get(&template_id).copied().unwrap_or(0) > request.seq {
                return SaveOutcome::Superseded;
            }
        }

        match pushed {
            Ok(saved) => {
                if let Err(e) = self.cache.upsert(&event_id, &saved) {
                    eprintln!("[store] cache mirror failed for {}: {}", template_id, e);
                }
                SaveOutcome::Remote
            }
            Err(e) => {
                eprintln!(
                    "[store] save failed for template {}: {} (cached locally)",
                    template_id, e
                );
                if let Err(e) = self.cache.upsert(&event_id, &row) {
                    eprintln!("[store] cache write failed for {}: {}", template_id, e);
                }
                SaveOutcome::Cached
            }
        }
    }

    /// Publish: freeze the draft as the event's official template and
    /// snapshot it into the version history. Exactly one official
    /// template per event: the previous one is demoted back to draft.
    pub async fn publish(
        &self,
        event_id: &str,
        template_id: &str,
    ) -> Result<TemplateRow, GafeteError> {
        let mut rows = self.fetch_rows(event_id).await;
        let target = rows
            .iter()
            .find(|r| r.id == template_id && r.deleted_at.is_none())
            .ok_or_else(|| GafeteError::NotFound(template_id.to_string()))?;

        let template = target.template()?;
        let violations = validate(&template);
        if !violations.is_empty() {
            let joined = violations
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(GafeteError::InvalidTemplate(joined));
        }

        let now = Utc::now();
        let mut published = None;
        for row in rows.iter_mut() {
            if row.id == template_id {
                let version = row.versions.last().map(|v| v.version + 1).unwrap_or(1);
                row.status = TemplateStatus::Official;
                if let Ok(mut t) = row.template() {
                    t.status = TemplateStatus::Official;
                    t.version = version;
                    if let Ok(blob) = serde_json::to_value(&t) {
                        row.template_json = blob;
                    }
                }
                row.versions.push(TemplateVersion {
                    version,
                    template_json: row.template_json.clone(),
                    published_at: now,
                });
                row.updated_at = now;
                row.updated_by = self.actor.clone();
                published = Some(row.id.clone());
            } else if row.status == TemplateStatus::Official && row.deleted_at.is_none() {
                row.status = TemplateStatus::Draft;
                row.updated_at = now;
            }
        }

        self.persist_rows(event_id, &mut rows).await;
        let id = published.expect("target row vanished during publish");
        Ok(rows.into_iter().find(|r| r.id == id).unwrap())
    }

    /// Soft delete. The last live template of an event cannot be
    /// deleted.
    pub async fn delete(&self, event_id: &str, template_id: &str) -> Result<(), GafeteError> {
        let mut rows = self.fetch_rows(event_id).await;
        let live = rows.iter().filter(|r| r.deleted_at.is_none()).count();

        let target = rows
            .iter_mut()
            .find(|r| r.id == template_id && r.deleted_at.is_none())
            .ok_or_else(|| GafeteError::NotFound(template_id.to_string()))?;
        if live <= 1 {
            return Err(GafeteError::LastTemplate(event_id.to_string()));
        }
        target.deleted_at = Some(Utc::now());
        target.updated_by = self.actor.clone();

        self.persist_rows(event_id, &mut rows).await;
        Ok(())
    }

    /// The immutable version snapshots taken at each publish.
    pub async fn versions(
        &self,
        event_id: &str,
        template_id: &str,
    ) -> Result<Vec<TemplateVersion>, GafeteError> {
        self.fetch_rows(event_id)
            .await
            .into_iter()
            .find(|r| r.id == template_id)
            .map(|r| r.versions)
            .ok_or_else(|| GafeteError::NotFound(template_id.to_string()))
    }

    /// Merge the template into its existing row (preserving audit
    /// columns, remote id, and version history) or start a fresh one.
    fn row_for(&self, template: &Template) -> TemplateRow {
        let existing = self
            .cache
            .read(&template.event_id)
            .ok()
            .and_then(|rows| rows.into_iter().find(|r| r.id == template.id));

        let mut row = match existing {
            Some(mut r) => {
                r.template_json = serde_json::to_value(template).unwrap_or(r.template_json);
                r.name = template.name.clone();
                r.status = template.status;
                r.updated_at = Utc::now();
                r
            }
            None => {
                let mut r = TemplateRow::from_template(template);
                r.created_by = self.actor.clone();
                r
            }
        };
        row.updated_by = self.actor.clone();
        row
    }

    /// Push every row to the remote (best effort) and rewrite the cache.
    async fn persist_rows(&self, event_id: &str, rows: &mut [TemplateRow]) {
        if let Some(remote) = &self.remote {
            for row in rows.iter_mut() {
                let result = if row.remote_id.is_some() {
                    remote.update(row).await
                } else {
                    remote.create(row).await
                };
                match result {
                    Ok(saved) => *row = saved,
                    Err(e) => {
                        eprintln!(
                            "[store] remote write failed for template {}: {} (cache only)",
                            row.id, e
                        );
                    }
                }
            }
        }
        if let Err(e) = self.cache.write(event_id, rows) {
            eprintln!("[store] cache write failed for event {}: {}", event_id, e);
        }
    }
}
