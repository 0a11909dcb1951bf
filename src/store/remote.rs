//! Remote template store: the wire rows and the HTTP client.
//!
//! The trait seam exists so the lifecycle logic in [`super::TemplateStore`]
//! can be exercised against an in-memory or failing remote in tests; the
//! production implementation is a thin `reqwest` client.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GafeteError;
use crate::template::{Template, TemplateStatus, template_from_blob};

/// One immutable version snapshot, taken when a template is published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateVersion {
    pub version: u32,
    pub template_json: serde_json::Value,
    pub published_at: DateTime<Utc>,
}

/// A stored template row: the template blob plus storage metadata.
///
/// `template_json` holds the Template document; historical rows may store
/// either the full object or the bare element array, and
/// [`TemplateRow::template`] accepts both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRow {
    /// Client-generated id, stable across remote and cache.
    pub id: String,
    /// Id assigned by the remote store on create; `None` until the first
    /// successful create (the create-vs-update discriminator).
    #[serde(default)]
    pub remote_id: Option<String>,
    pub event_id: String,
    pub name: String,
    pub template_json: serde_json::Value,
    #[serde(default)]
    pub status: TemplateStatus,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker; deleted rows stay recoverable.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub versions: Vec<TemplateVersion>,
}

impl TemplateRow {
    /// Wrap a template into a fresh row.
    pub fn from_template(template: &Template) -> Self {
        let now = Utc::now();
        Self {
            id: template.id.clone(),
            remote_id: None,
            event_id: template.event_id.clone(),
            name: template.name.clone(),
            template_json: serde_json::to_value(template).unwrap_or_default(),
            status: template.status,
            created_by: None,
            updated_by: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            versions: Vec::new(),
        }
    }

    /// Decode the stored blob, tolerating both historical shapes.
    pub fn template(&self) -> Result<Template, GafeteError> {
        let mut t = template_from_blob(&self.event_id, &self.template_json)?;
        t.id = self.id.clone();
        t.status = self.status;
        Ok(t)
    }
}

/// Remote CRUD surface for template rows.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// All rows for an event, including soft-deleted ones.
    async fn list(&self, event_id: &str) -> Result<Vec<TemplateRow>, GafeteError>;

    /// Create a row; the returned row carries the assigned `remote_id`.
    async fn create(&self, row: &TemplateRow) -> Result<TemplateRow, GafeteError>;

    /// Update an existing row (must have a `remote_id`).
    async fn update(&self, row: &TemplateRow) -> Result<TemplateRow, GafeteError>;
}

/// HTTP implementation speaking the registration backend's JSON API.
pub struct HttpRemote {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemote {
    pub fn new(base_url: impl Into<String>) -> Result<Self, GafeteError> {
        let client = reqwest::Client::builder()
            .user_agent("gafete/0.1")
            .build()
            .map_err(|e| GafeteError::Store(format!("HTTP client error: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn collection_url(&self, event_id: &str) -> String {
        format!("{}/events/{}/badge-templates", self.base_url, event_id)
    }
}

#[async_trait]
impl RemoteStore for HttpRemote {
    async fn list(&self, event_id: &str) -> Result<Vec<TemplateRow>, GafeteError> {
        let response = self
            .client
            .get(self.collection_url(event_id))
            .send()
            .await
            .map_err(|e| GafeteError::Store(format!("list failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(GafeteError::Store(format!(
                "list failed: HTTP {}",
                response.status()
            )));
        }
        response
            .json()
            .await
            .map_err(|e| GafeteError::Store(format!("list decode failed: {}", e)))
    }

    async fn create(&self, row: &TemplateRow) -> Result<TemplateRow, GafeteError> {
        let response = self
            .client
            .post(self.collection_url(&row.event_id))
            .json(row)
            .send()
            .await
            .map_err(|e| GafeteError::Store(format!("create failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(GafeteError::Store(format!(
                "create failed: HTTP {}",
                response.status()
            )));
        }
        response
            .json()
            .await
            .map_err(|e| GafeteError::Store(format!("create decode failed: {}", e)))
    }

    async fn update(&self, row: &TemplateRow) -> Result<TemplateRow, GafeteError> {
        let remote_id = row
            .remote_id
            .as_deref()
            .ok_or_else(|| GafeteError::Store("update without remote_id".into()))?;
        let url = format!("{}/{}", self.collection_url(&row.event_id), remote_id);
        let response = self
            .client
            .put(url)
            .json(row)
            .send()
            .await
            .map_err(|e| GafeteError::Store(format!("update failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(GafeteError::Store(format!(
                "update failed: HTTP {}",
                response.status()
            )));
        }
        response
            .json()
            .await
            .map_err(|e| GafeteError::Store(format!("update decode failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_round_trips_template() {
        let template = Template::default_badge("evt-9");
        let row = TemplateRow::from_template(&template);
        let back = row.template().unwrap();
        assert_eq!(back.id, template.id);
        assert_eq!(back.elements, template.elements);
    }

    #[test]
    fn test_row_accepts_bare_array_blob() {
        let template = Template::default_badge("evt-9");
        let mut row = TemplateRow::from_template(&template);
        row.template_json = serde_json::to_value(&template.elements).unwrap();
        let back = row.template().unwrap();
        assert_eq!(back.elements.len(), 4);
        assert_eq!(back.event_id, "evt-9");
    }
}
