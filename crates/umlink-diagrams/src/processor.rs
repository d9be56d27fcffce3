//! Block processor for diagram languages.
//!
//! This module provides [`DiagramProcessor`], which implements the
//! [`BlockProcessor`] trait and replaces diagram blocks with image blocks
//! pointing at a PlantUML server.

use std::sync::Arc;

use umlink_renderer::{
    Block, BlockProcessor, DocumentAttributes, ImageBlock, ProcessResult, SubstituteBlock,
    VerbatimBlock,
};

use crate::consts::{DEFAULT_ALT, DEFAULT_FORMAT_ATTRIBUTE, ERROR_ROLE, SERVER_URL_ATTRIBUTE};
use crate::encoding::encode;
use crate::error::DiagramError;
use crate::language::{DiagramFormat, DiagramLanguage};
use crate::request::RenderRequest;
use crate::source::prepare_source;

/// Process-wide defaults, used when neither the block nor the document says
/// otherwise.
///
/// # Example
///
/// ```
/// use umlink_diagrams::{DiagramFormat, DiagramSettings};
///
/// let settings = DiagramSettings::new()
///     .server_url("http://localhost:8080")
///     .default_format(DiagramFormat::Svg);
/// assert_eq!(settings.get_server_url(), Some("http://localhost:8080"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagramSettings {
    server_url: Option<String>,
    default_format: DiagramFormat,
    plantuml_config: Option<String>,
}

impl DiagramSettings {
    /// Settings with no server and `png` output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default PlantUML server.
    #[must_use]
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set the default output format.
    #[must_use]
    pub fn default_format(mut self, format: DiagramFormat) -> Self {
        self.default_format = format;
        self
    }

    /// Set PlantUML settings injected after `@startuml`.
    #[must_use]
    pub fn plantuml_config(mut self, config: impl Into<String>) -> Self {
        self.plantuml_config = Some(config.into());
        self
    }

    /// Default server, if configured.
    #[must_use]
    pub fn get_server_url(&self) -> Option<&str> {
        self.server_url.as_deref()
    }

    /// Default output format.
    #[must_use]
    pub fn get_default_format(&self) -> DiagramFormat {
        self.default_format
    }
}

/// Block processor for one diagram language.
///
/// Holds only shared immutable settings, so a single instance serves every
/// block of its language.
#[derive(Debug, Clone)]
pub struct DiagramProcessor {
    language: DiagramLanguage,
    settings: Arc<DiagramSettings>,
}

impl DiagramProcessor {
    /// Create a processor for `language`.
    #[must_use]
    pub fn new(language: DiagramLanguage, settings: Arc<DiagramSettings>) -> Self {
        Self { language, settings }
    }

    /// Language handled by this processor.
    #[must_use]
    pub fn language(&self) -> DiagramLanguage {
        self.language
    }

    /// Replace a diagram block with an image block, or with an error block
    /// showing the source when the block cannot be rendered.
    ///
    /// Errors are recorded in `warnings` and logged, never returned.
    pub fn transform(
        &self,
        block: &Block,
        document: &DocumentAttributes,
        warnings: &mut Vec<String>,
    ) -> SubstituteBlock {
        match self.image_block(block, document) {
            Ok(image) => SubstituteBlock::Image(image),
            Err(e) => {
                tracing::warn!(
                    diagram = %self.language,
                    line = block.line,
                    error = %e,
                    "Rendering diagram block as source"
                );
                warnings.push(format!("line {}: {} block: {e}", block.line, self.language));
                SubstituteBlock::Verbatim(error_block(block))
            }
        }
    }

    /// Resolve format, server and payload for a block.
    ///
    /// Format precedence: named `format`, positional slot 3, document
    /// `plantuml-default-format`, process default. Server precedence: block
    /// `plantuml-server-url`, document attribute, process default. Empty values
    /// count as absent.
    pub fn request(
        &self,
        block: &Block,
        document: &DocumentAttributes,
    ) -> Result<RenderRequest, DiagramError> {
        let format = self.resolve_format(block, document)?;
        let server_url = self.resolve_server_url(block, document)?;
        let source = prepare_source(
            &block.source,
            self.language,
            self.settings.plantuml_config.as_deref(),
        );
        let payload = encode(&source)?;
        Ok(RenderRequest::new(server_url, format, payload))
    }

    fn image_block(
        &self,
        block: &Block,
        document: &DocumentAttributes,
    ) -> Result<ImageBlock, DiagramError> {
        let request = self.request(block, document)?;
        let attrs = &block.attributes;

        let mut classes = Vec::with_capacity(attrs.roles().len() + 2);
        classes.push("imageblock".to_owned());
        classes.extend(attrs.roles().iter().cloned());
        classes.push(self.language.name().to_owned());

        let alt = non_empty(attrs.get("target"))
            .or_else(|| non_empty(attrs.positional(2)))
            .unwrap_or(DEFAULT_ALT);

        Ok(ImageBlock {
            id: attrs.id().map(str::to_owned),
            classes,
            title: attrs.title().map(str::to_owned),
            src: request.url(),
            alt: alt.to_owned(),
            width: non_empty(attrs.get("width")).map(str::to_owned),
            height: non_empty(attrs.get("height")).map(str::to_owned),
        })
    }

    fn resolve_format(
        &self,
        block: &Block,
        document: &DocumentAttributes,
    ) -> Result<DiagramFormat, DiagramError> {
        let requested = non_empty(block.attributes.get("format"))
            .or_else(|| non_empty(block.attributes.positional(3)))
            .or_else(|| non_empty(document.get(DEFAULT_FORMAT_ATTRIBUTE)));

        match requested {
            Some(value) => DiagramFormat::parse(value)
                .ok_or_else(|| DiagramError::UnsupportedFormat(value.to_owned())),
            None => Ok(self.settings.default_format),
        }
    }

    fn resolve_server_url<'a>(
        &'a self,
        block: &'a Block,
        document: &'a DocumentAttributes,
    ) -> Result<&'a str, DiagramError> {
        non_empty(block.attributes.get(SERVER_URL_ATTRIBUTE))
            .or_else(|| non_empty(document.get(SERVER_URL_ATTRIBUTE)))
            .or_else(|| non_empty(self.settings.server_url.as_deref()))
            .ok_or(DiagramError::ServerUrlMissing)
    }
}

impl BlockProcessor for DiagramProcessor {
    fn process(
        &self,
        block: &Block,
        document: &DocumentAttributes,
        warnings: &mut Vec<String>,
    ) -> ProcessResult {
        ProcessResult::Substitute(self.transform(block, document, warnings))
    }
}

/// Block in the input's context showing the raw source, tagged `plantuml-error`.
fn error_block(block: &Block) -> VerbatimBlock {
    VerbatimBlock {
        roles: vec![ERROR_ROLE.to_owned()],
        ..VerbatimBlock::from_block(block)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
