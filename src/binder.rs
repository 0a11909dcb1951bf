//! Field binder: resolves placeholder tokens and guest-field references
//! against a [`Registration`].
//!
//! Two resolution modes exist. Literal text content goes through
//! [`resolve_tokens`], which substitutes the fixed `{token}` vocabulary.
//! `guest_field` elements go through [`resolve_field`], a structural lookup
//! by field key that also synthesizes the QR confirmation code.
//!
//! Everything in here is pure: no network, no randomness, no clock. The
//! same registration always resolves to the same strings, so the bulk
//! export path and the editor preview agree byte-for-byte.

use crate::guest::Registration;
use crate::template::GuestFieldKey;

/// Prefix of the confirmation code carried by every badge QR.
///
/// `REG-` + numeric registration id zero-padded to 8 digits is a wire
/// contract with the check-in scanner. Do not change without coordinating
/// with that consumer.
pub const CONFIRMATION_PREFIX: &str = "REG-";

/// Build the scannable confirmation code for a registration id.
pub fn confirmation_code(id: i64) -> String {
    format!("{}{:08}", CONFIRMATION_PREFIX, id)
}

/// Split a full name on the first space: `"Ada Lovelace"` → `("Ada", "Lovelace")`.
/// A name without a space has an empty last name.
fn split_name(full: &str) -> (&str, &str) {
    match full.split_once(' ') {
        Some((first, last)) => (first, last),
        None => (full, ""),
    }
}

/// Replace every fixed placeholder token in `content` with the matching
/// guest attribute. Missing attributes become empty strings.
pub fn resolve_tokens(content: &str, reg: &Registration) -> String {
    if !content.contains('{') {
        return content.to_string();
    }

    let guest = reg.guest.as_ref();
    let name = guest.map(|g| g.name.as_str()).unwrap_or("");
    let (first, last) = split_name(name);

    let opt = |v: Option<&String>| v.map(String::as_str).unwrap_or("").to_string();

    let pairs: [(&str, String); 10] = [
        ("{fullName}", name.to_string()),
        ("{firstName}", first.to_string()),
        ("{lastName}", last.to_string()),
        ("{company}", opt(guest.and_then(|g| g.company.as_ref()))),
        ("{jobTitle}", opt(guest.and_then(|g| g.job_title.as_ref()))),
        ("{email}", opt(guest.and_then(|g| g.email.as_ref()))),
        ("{phone}", opt(guest.and_then(|g| g.phone.as_ref()))),
        (
            "{guestType}",
            guest
                .and_then(|g| g.guest_type.as_ref())
                .map(|gt| gt.display())
                .unwrap_or_default(),
        ),
        ("{uuid}", opt(reg.uuid.as_ref())),
        (
            "{profilePicture}",
            opt(guest.and_then(|g| g.profile_picture.as_ref())),
        ),
    ];

    let mut out = content.to_string();
    for (token, value) in &pairs {
        if out.contains(token) {
            out = out.replace(token, value);
        }
    }
    out
}

/// Structural lookup for `guest_field` elements.
///
/// Unlike token substitution this never parses the content string; the
/// field key names the attribute directly. `QrCode` yields the
/// confirmation code derived from the registration's numeric id.
pub fn resolve_field(field: GuestFieldKey, reg: &Registration) -> String {
    let guest = reg.guest.as_ref();
    let opt = |v: Option<&String>| v.map(String::as_str).unwrap_or("").to_string();

    match field {
        GuestFieldKey::Name => guest.map(|g| g.name.clone()).unwrap_or_default(),
        GuestFieldKey::Company => opt(guest.and_then(|g| g.company.as_ref())),
        GuestFieldKey::JobTitle => opt(guest.and_then(|g| g.job_title.as_ref())),
        GuestFieldKey::Email => opt(guest.and_then(|g| g.email.as_ref())),
        GuestFieldKey::Phone => opt(guest.and_then(|g| g.phone.as_ref())),
        GuestFieldKey::GuestType => guest
            .and_then(|g| g.guest_type.as_ref())
            .map(|gt| gt.display())
            .unwrap_or_default(),
        GuestFieldKey::QrCode => confirmation_code(reg.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guest::{Guest, GuestType};

    fn reg(name: &str) -> Registration {
        Registration {
            id: 42,
            uuid: Some("u-42".into()),
            guest: Some(Guest {
                name: name.into(),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_full_name_round_trip() {
        let r = reg("Ada Lovelace");
        assert_eq!(resolve_tokens("{firstName} {lastName}", &r), "Ada Lovelace");
        assert_eq!(resolve_tokens("{fullName}", &r), "Ada Lovelace");
    }

    #[test]
    fn test_single_word_name() {
        let r = reg("Ada");
        assert_eq!(resolve_tokens("{firstName}", &r), "Ada");
        assert_eq!(resolve_tokens("{lastName}", &r), "");
    }

    #[test]
    fn test_missing_fields_resolve_empty() {
        let r = reg("Ada");
        assert_eq!(resolve_tokens("{company}|{email}|{phone}", &r), "||");
    }

    #[test]
    fn test_literal_text_untouched() {
        let r = reg("Ada");
        assert_eq!(resolve_tokens("Welcome!", &r), "Welcome!");
    }

    #[test]
    fn test_guest_type_token() {
        let mut r = reg("Ada");
        r.guest.as_mut().unwrap().guest_type = Some(GuestType::Object {
            id: Some(1),
            name: Some("Press".into()),
        });
        assert_eq!(resolve_tokens("{guestType}", &r), "Press");
    }

    #[test]
    fn test_confirmation_code_format() {
        assert_eq!(confirmation_code(7), "REG-00000007");
        assert_eq!(confirmation_code(12345678), "REG-12345678");
    }

    #[test]
    fn test_confirmation_code_idempotent() {
        let r = reg("Ada");
        let a = resolve_field(GuestFieldKey::QrCode, &r);
        let b = resolve_field(GuestFieldKey::QrCode, &r);
        assert_eq!(a, b);
        assert_eq!(a, "REG-00000042");
    }

    #[test]
    fn test_structural_lookup() {
        let mut r = reg("Ada Lovelace");
        r.guest.as_mut().unwrap().company = Some("Analytical Engines".into());
        assert_eq!(resolve_field(GuestFieldKey::Name, &r), "Ada Lovelace");
        assert_eq!(
            resolve_field(GuestFieldKey::Company, &r),
            "Analytical Engines"
        );
        assert_eq!(resolve_field(GuestFieldKey::Email, &r), "");
    }
}
