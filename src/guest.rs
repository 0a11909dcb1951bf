//! Guest record shapes consumed at badge-issue time.
//!
//! These types mirror what the registration backend hands over. The crate
//! never mutates them; the binder and renderer only read. Field names are
//! tolerant of the backend's historical spellings (`jobtitle`, `jobTitle`,
//! `guest_type`, `guestType`).

use serde::{Deserialize, Serialize};

/// One registration row: the numeric id drives the confirmation code,
/// the nested [`Guest`] carries the printable attributes.
///
/// `guest` being absent is the single invalid-input case in the whole
/// pipeline; the renderer emits a placeholder badge for it instead of
/// fabricating an identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: i64,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub guest: Option<Guest>,
}

/// Printable guest attributes. Everything except `name` is optional;
/// missing values resolve to empty strings, never to an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Guest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default, rename = "jobtitle", alias = "jobTitle", alias = "job_title")]
    pub job_title: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, alias = "guestType")]
    pub guest_type: Option<GuestType>,
    #[serde(default, alias = "profilePicture")]
    pub profile_picture: Option<String>,
}

/// Guest type as the backend sends it: a plain string, a full
/// `{id, name}` object, or an object with only an `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GuestType {
    Plain(String),
    Object {
        #[serde(default)]
        id: Option<i64>,
        #[serde(default)]
        name: Option<String>,
    },
}

impl GuestType {
    /// Normalize the three wire shapes to one display string,
    /// preferring `name` over `id`.
    pub fn display(&self) -> String {
        match self {
            GuestType::Plain(s) => s.clone(),
            GuestType::Object { name: Some(n), .. } => n.clone(),
            GuestType::Object { id: Some(id), .. } => id.to_string(),
            GuestType::Object { .. } => String::new(),
        }
    }
}

impl Registration {
    /// Fixed sample registration used for editor previews. The editor
    /// always renders against this record so the designer sees realistic
    /// text lengths while working.
    pub fn sample() -> Self {
        Self {
            id: 1,
            uuid: Some("00000000-0000-0000-0000-000000000001".into()),
            guest: Some(Guest {
                name: "Alex Morgan".into(),
                company: Some("Acme Corp".into()),
                job_title: Some("Operations Lead".into()),
                email: Some("alex@example.com".into()),
                phone: Some("+1 555 0100".into()),
                guest_type: Some(GuestType::Plain("Attendee".into())),
                profile_picture: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_type_prefers_name_over_id() {
        let gt: GuestType = serde_json::from_str(r#"{"id": 3, "name": "VIP"}"#).unwrap();
        assert_eq!(gt.display(), "VIP");

        let gt: GuestType = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert_eq!(gt.display(), "3");

        let gt: GuestType = serde_json::from_str(r#""Speaker""#).unwrap();
        assert_eq!(gt.display(), "Speaker");
    }

    #[test]
    fn test_job_title_spellings() {
        let a: Guest = serde_json::from_str(r#"{"name": "A", "jobtitle": "Dev"}"#).unwrap();
        let b: Guest = serde_json::from_str(r#"{"name": "A", "jobTitle": "Dev"}"#).unwrap();
        assert_eq!(a.job_title.as_deref(), Some("Dev"));
        assert_eq!(b.job_title.as_deref(), Some("Dev"));
    }

    #[test]
    fn test_registration_without_guest() {
        let reg: Registration = serde_json::from_str(r#"{"id": 9}"#).unwrap();
        assert!(reg.guest.is_none());
    }
}
