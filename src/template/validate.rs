//! Pre-persistence validation.
//!
//! Editing tolerates invalid intermediate states (a width dragged through
//! zero, an element pushed off-canvas). Violations are only collected here,
//! at the save/publish boundary, and reported as structured values: never
//! panics, never mid-edit errors.

use thiserror::Error;

use super::Template;

/// One structured validation violation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("template name is blank")]
    BlankName,

    #[error("element at index {index} has an empty id")]
    EmptyId { index: usize },

    #[error("duplicate element id {id}")]
    DuplicateId { id: String },

    #[error("element {id} has negative size {width}x{height}")]
    NegativeSize { id: String, width: f32, height: f32 },

    #[error("element {id} has non-finite geometry")]
    NonFiniteGeometry { id: String },

    #[error("element {id} rotation {rotation} outside [0, 360)")]
    RotationOutOfRange { id: String, rotation: f32 },
}

/// Collect every violation in a template. An empty result means the
/// template may be persisted.
pub fn validate(template: &Template) -> Vec<Violation> {
    let mut violations = Vec::new();

    if template.name.trim().is_empty() {
        violations.push(Violation::BlankName);
    }

    let mut seen = std::collections::HashSet::new();
    for (index, el) in template.elements.iter().enumerate() {
        if el.id.is_empty() {
            violations.push(Violation::EmptyId { index });
        } else if !seen.insert(el.id.as_str()) {
            violations.push(Violation::DuplicateId { id: el.id.clone() });
        }

        let finite = [el.x, el.y, el.width, el.height, el.rotation]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            violations.push(Violation::NonFiniteGeometry { id: el.id.clone() });
            continue;
        }

        if el.width < 0.0 || el.height < 0.0 {
            violations.push(Violation::NegativeSize {
                id: el.id.clone(),
                width: el.width,
                height: el.height,
            });
        }

        if !(0.0..360.0).contains(&el.rotation) {
            violations.push(Violation::RotationOutOfRange {
                id: el.id.clone(),
                rotation: el.rotation,
            });
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{Element, ElementKind, Qr, Template};

    fn qr(id: &str) -> Element {
        let mut el = Element::with_defaults(ElementKind::Qr(Qr::default()));
        el.id = id.to_string();
        el
    }

    #[test]
    fn test_valid_template_has_no_violations() {
        let t = Template::default_badge("evt");
        assert!(validate(&t).is_empty());
    }

    #[test]
    fn test_duplicate_ids() {
        let mut t = Template::new("e", "t");
        t.elements.push(qr("a"));
        t.elements.push(qr("a"));
        assert_eq!(
            validate(&t),
            vec![Violation::DuplicateId { id: "a".into() }]
        );
    }

    #[test]
    fn test_negative_size_and_rotation() {
        let mut t = Template::new("e", "t");
        let mut el = qr("a");
        el.width = -5.0;
        el.rotation = 400.0;
        t.elements.push(el);
        let v = validate(&t);
        assert!(v.contains(&Violation::NegativeSize {
            id: "a".into(),
            width: -5.0,
            height: 100.0
        }));
        assert!(v.contains(&Violation::RotationOutOfRange {
            id: "a".into(),
            rotation: 400.0
        }));
    }

    #[test]
    fn test_blank_name() {
        let t = Template::new("e", "  ");
        assert_eq!(validate(&t), vec![Violation::BlankName]);
    }

    #[test]
    fn test_zero_size_is_allowed() {
        // Width 0 happens mid-drag; persistence tolerates it too.
        let mut t = Template::new("e", "t");
        let mut el = qr("a");
        el.width = 0.0;
        t.elements.push(el);
        assert!(validate(&t).is_empty());
    }
}
