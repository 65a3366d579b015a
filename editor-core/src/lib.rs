//! # Editor Core
//!
//! Core logic for the in-browser design editor: the element model, the
//! scene graph, the bounded undo/redo history, layer ordering, and the
//! owned session state machine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               editor-core                   │
//! ├─────────────────────────────────────────────┤
//! │  Element Model   │  History Engine          │
//! │  - text/image/   │  - bounded snapshots     │
//! │    shape union   │  - linear undo/redo      │
//! ├─────────────────────────────────────────────┤
//! │  Scene Graph     │  Editor Session          │
//! │  - paint order   │  - mutation API          │
//! │  - canvas size   │  - layer ordering        │
//! │                  │  - template replacement  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Rendering and export live in the companion `editor-export` crate.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod element;
pub mod error;
pub mod history;
pub mod scene;
pub mod session;
pub mod template;

pub use element::{
    Element, ElementId, ElementKind, ObjectFit, Shadow, ShapeKind, StrokeStyle, TextAlign,
    TextTransform, Transform,
};
pub use error::{CoreResult, EditorError};
pub use history::{History, Snapshot, HISTORY_CAPACITY};
pub use scene::Scene;
pub use session::{EditorSession, ReplaceToken, TemplateLoad};
pub use template::Template;

/// Editor core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
