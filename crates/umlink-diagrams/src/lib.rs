//! Diagram blocks rendered by a PlantUML server.
//!
//! This crate turns `plantuml`, `ditaa` and `graphviz` blocks into image blocks
//! whose address points at a PlantUML server:
//! - [`register`] adds a [`DiagramProcessor`] per language to an
//!   [`ExtensionRegistry`](umlink_renderer::ExtensionRegistry)
//! - [`encode`] / [`decode`] implement PlantUML's text encoding
//! - Blocks that cannot be rendered (unsupported format, no server) are shown
//!   as source in a `plantuml-error` block
//!
//! # Architecture
//!
//! - [`language`]: diagram languages and output formats
//! - [`encoding`]: deflate + PlantUML base64 payloads
//! - [`source`]: directive wrapping and PlantUML config injection
//! - [`processor`]: [`DiagramProcessor`] implementing `BlockProcessor`
//! - [`registrar`]: registration with an extension registry
//!
//! # Example
//!
//! ```
//! use umlink_diagrams::{DiagramSettings, register_with};
//! use umlink_renderer::{DocumentRenderer, ExtensionRegistry};
//!
//! let mut registry = ExtensionRegistry::new();
//! register_with(&mut registry, DiagramSettings::new().server_url("http://localhost:8080"));
//!
//! let result = DocumentRenderer::new(registry)
//!     .render("[plantuml]\n----\nalice -> bob\n----\n");
//! assert!(result.html.contains(r#"<img src="http://localhost:8080/png/"#));
//! ```

mod consts;
mod encoding;
mod error;
mod language;
mod processor;
mod registrar;
mod request;
mod source;

pub use encoding::{decode, encode};
pub use error::{DecodeError, DiagramError, EncodeError};
pub use language::{DiagramFormat, DiagramLanguage};
pub use processor::{DiagramProcessor, DiagramSettings};
pub use registrar::{register, register_with};
pub use request::RenderRequest;
pub use source::{is_wrapped, prepare_source, wrap_source};
