//! Block processor trait and extension registry.
//!
//! Processors are registered for a block style in one or more contexts. When
//! the renderer meets a delimited block whose style is registered for the
//! block's context, the processor decides what replaces the block.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use umlink_renderer::{
//!     Block, BlockContext, BlockProcessor, DocumentAttributes, ExtensionRegistry,
//!     ProcessResult, SubstituteBlock, VerbatimBlock,
//! };
//!
//! struct Shout;
//!
//! impl BlockProcessor for Shout {
//!     fn process(
//!         &self,
//!         block: &Block,
//!         _document: &DocumentAttributes,
//!         _warnings: &mut Vec<String>,
//!     ) -> ProcessResult {
//!         let mut verbatim = VerbatimBlock::from_block(block);
//!         verbatim.source = block.source.to_uppercase();
//!         ProcessResult::Substitute(SubstituteBlock::Verbatim(verbatim))
//!     }
//! }
//!
//! let mut registry = ExtensionRegistry::new();
//! registry.register_block("shout", &BlockContext::ALL, Arc::new(Shout));
//! assert!(registry.registered_for_block("shout", BlockContext::Literal).is_some());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::attributes::{BlockAttributes, DocumentAttributes};
use crate::context::BlockContext;

/// A delimited block handed to a processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Context given by the block delimiter.
    pub context: BlockContext,
    /// Attributes from the `[...]` and `.Title` lines above the block.
    pub attributes: BlockAttributes,
    /// Raw block content between the delimiters, without trailing newline.
    pub source: String,
    /// One-based line number of the opening delimiter.
    pub line: usize,
}

/// Image block produced in place of a source block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageBlock {
    /// Block id.
    pub id: Option<String>,
    /// Class list of the wrapper element, in order.
    pub classes: Vec<String>,
    /// Block title.
    pub title: Option<String>,
    /// Image address.
    pub src: String,
    /// Alternative text.
    pub alt: String,
    /// Image width attribute.
    pub width: Option<String>,
    /// Image height attribute.
    pub height: Option<String>,
}

/// Preformatted block rendered verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbatimBlock {
    /// Listing or literal wrapper.
    pub context: BlockContext,
    /// Block id.
    pub id: Option<String>,
    /// Roles appended after the context class.
    pub roles: Vec<String>,
    /// Block title.
    pub title: Option<String>,
    /// Source language for highlighted listings.
    pub language: Option<String>,
    /// Content, shown exactly as given.
    pub source: String,
}

impl VerbatimBlock {
    /// Verbatim rendering of a block, keeping its id, roles and title.
    #[must_use]
    pub fn from_block(block: &Block) -> Self {
        Self {
            context: block.context,
            id: block.attributes.id().map(str::to_owned),
            roles: block.attributes.roles().to_vec(),
            title: block.attributes.title().map(str::to_owned),
            language: None,
            source: block.source.clone(),
        }
    }
}

/// Description of what replaces a processed block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubstituteBlock {
    /// `imageblock` wrapping an `<img>`.
    Image(ImageBlock),
    /// `listingblock` or `literalblock` wrapping a `<pre>`.
    Verbatim(VerbatimBlock),
}

/// Result of processing a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessResult {
    /// Replace the block with the given substitute.
    Substitute(SubstituteBlock),
    /// Render the block as if no processor were registered.
    PassThrough,
}

/// Trait for processing styled delimited blocks.
///
/// Processors take `&self` and must not keep per-block state, so one instance
/// can serve any number of documents, in any order, from any thread.
pub trait BlockProcessor: Send + Sync {
    /// Process a block and return what replaces it.
    ///
    /// # Arguments
    ///
    /// * `block` - The block, its attributes and raw content
    /// * `document` - Document attributes in effect at the block
    /// * `warnings` - Collector for user-visible warnings
    fn process(
        &self,
        block: &Block,
        document: &DocumentAttributes,
        warnings: &mut Vec<String>,
    ) -> ProcessResult;
}

/// Registry of block processors keyed by `(style, context)`.
#[derive(Clone, Default)]
pub struct ExtensionRegistry {
    block_processors: HashMap<(String, BlockContext), Arc<dyn BlockProcessor>>,
}

impl ExtensionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `processor` for `style` in each of `contexts`.
    ///
    /// Registering the same `(style, context)` pair again replaces the previous
    /// processor; other registrations are left untouched.
    pub fn register_block(
        &mut self,
        style: &str,
        contexts: &[BlockContext],
        processor: Arc<dyn BlockProcessor>,
    ) -> &mut Self {
        for &context in contexts {
            self.block_processors
                .insert((style.to_owned(), context), Arc::clone(&processor));
        }
        self
    }

    /// Processor registered for `style` in `context`, if any.
    #[must_use]
    pub fn registered_for_block(
        &self,
        style: &str,
        context: BlockContext,
    ) -> Option<&dyn BlockProcessor> {
        self.block_processors
            .get(&(style.to_owned(), context))
            .map(AsRef::as_ref)
    }

    /// Number of `(style, context)` registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.block_processors.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.block_processors.is_empty()
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self
            .block_processors
            .keys()
            .map(|(style, context)| format!("{style}@{context}"))
            .collect();
        keys.sort();
        f.debug_struct("ExtensionRegistry")
            .field("block_processors", &keys)
            .finish()
    }
}
