//! AsciiDoc block renderer with pluggable block processors.
//!
//! This crate provides a [`DocumentRenderer`] that turns the block-level
//! subset of AsciiDoc into Asciidoctor-compatible HTML5, and an
//! [`ExtensionRegistry`] through which [`BlockProcessor`] implementations take
//! over delimited blocks of a given style.
//!
//! # Architecture
//!
//! - [`BlockAttributes`] / [`DocumentAttributes`]: attribute lists above blocks
//!   and `:name: value` document entries
//! - [`BlockContext`]: the `listing` (`----`) and `literal` (`....`) contexts
//! - [`BlockProcessor`]: trait for processors; returns a [`SubstituteBlock`]
//!   or passes the block through
//! - [`DocumentRenderer`]: line scanner, dispatch and HTML output
//!
//! # Example
//!
//! ```
//! use umlink_renderer::{DocumentRenderer, ExtensionRegistry};
//!
//! let renderer = DocumentRenderer::new(ExtensionRegistry::new());
//! let result = renderer.render("[source,rust]\n----\nfn main() {}\n----\n");
//! assert!(result.html.contains("language-rust"));
//! ```

mod attributes;
mod context;
mod html;
mod processor;
mod renderer;

pub use attributes::{BlockAttributes, DocumentAttributes};
pub use context::BlockContext;
pub use html::escape_html;
pub use processor::{
    Block, BlockProcessor, ExtensionRegistry, ImageBlock, ProcessResult, SubstituteBlock,
    VerbatimBlock,
};
pub use renderer::{DocumentRenderer, RenderResult};
