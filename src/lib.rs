//! # Gafete - Badge Template Library
//!
//! Gafete is a Rust library for composing fixed-size identity badges and
//! rendering them, unmodified, against thousands of guest registrations.
//! It provides:
//!
//! - **Template model**: a closed element set with absolute positioning
//! - **Field binder**: placeholder tokens and guest-field resolution
//! - **Layout renderer**: a pure, deterministic scene-graph builder
//! - **Editor engine**: selection, transforms, bounded undo/redo
//! - **Persistence**: draft/official lifecycle with a local-cache fallback
//!
//! ## Quick Start
//!
//! ```no_run
//! use gafete::guest::Registration;
//! use gafete::render;
//! use gafete::template::Template;
//!
//! // The default badge layout for an event
//! let template = Template::default_badge("evt-1");
//!
//! // A registration handed over at check-in
//! let reg: Registration = serde_json::from_str(
//!     r#"{"id": 7, "guest": {"name": "Ada Lovelace"}}"#,
//! )?;
//!
//! // One pure call produces the paintable scene
//! let scene = render::render(&template, &reg);
//! assert_eq!(scene.width, 400.0);
//!
//! # Ok::<(), serde_json::Error>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`template`] | Badge document model and validation |
//! | [`binder`] | Placeholder and guest-field resolution |
//! | [`render`] | Scene-graph renderer with dynamic font sizing |
//! | [`editor`] | Interactive editing state machine and history |
//! | [`store`] | Remote persistence with cache fallback |
//! | [`guest`] | Consumed registration shapes |
//! | [`error`] | Error types |
//!
//! ## Determinism
//!
//! `render` is pure and re-entrant: the interactive preview, the bulk
//! print path, and the export path all call the same function and get
//! byte-identical scenes for the same (template, registration) pair.

pub mod binder;
pub mod editor;
pub mod error;
pub mod guest;
pub mod render;
pub mod store;
pub mod template;

// Re-exports for convenience
pub use editor::Editor;
pub use error::GafeteError;
pub use guest::Registration;
pub use render::SceneGraph;
pub use store::TemplateStore;
pub use template::Template;
