//! Line-oriented AsciiDoc renderer.
//!
//! Handles the block-level subset needed around diagram blocks: document title,
//! attribute entries, sections, paragraphs, block titles, attribute lines and
//! delimited listing/literal blocks. Delimited blocks whose style is registered
//! in the [`ExtensionRegistry`] are handed to their processor.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::attributes::{BlockAttributes, DocumentAttributes};
use crate::context::Delimiter;
use crate::html;
use crate::processor::{Block, ExtensionRegistry, ProcessResult, VerbatimBlock};

/// `:name: value`, `:name!:` and `:!name:` attribute entries.
static ATTRIBUTE_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^:(!?)([A-Za-z0-9_][A-Za-z0-9_-]*)(!?):(?:[ \t]+(.*))?$").unwrap()
});

/// `= Title` through `====== Title`.
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(={1,6})[ \t]+(\S.*)$").unwrap());

/// Result of rendering a document.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RenderResult {
    /// Rendered HTML body fragment.
    pub html: String,
    /// Document title from the `= Title` header line.
    pub title: Option<String>,
    /// Document attributes after the last entry was applied.
    pub attributes: DocumentAttributes,
    /// Warnings from the renderer and block processors.
    pub warnings: Vec<String>,
}

/// AsciiDoc renderer with pluggable block processors.
///
/// # Example
///
/// ```
/// use umlink_renderer::{DocumentRenderer, ExtensionRegistry};
///
/// let renderer = DocumentRenderer::new(ExtensionRegistry::new());
/// let result = renderer.render("= Guide\n\n== Setup\n\nRun it.\n");
///
/// assert_eq!(result.title.as_deref(), Some("Guide"));
/// assert!(result.html.contains(r#"<h2 id="_setup">Setup</h2>"#));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentRenderer {
    registry: ExtensionRegistry,
    attributes: DocumentAttributes,
}

impl DocumentRenderer {
    /// Create a renderer dispatching to the processors in `registry`.
    #[must_use]
    pub fn new(registry: ExtensionRegistry) -> Self {
        Self {
            registry,
            attributes: DocumentAttributes::new(),
        }
    }

    /// Set attributes every document starts with; entries in the document override them.
    #[must_use]
    pub fn with_attributes(mut self, attributes: DocumentAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Render a document to an HTML fragment.
    #[must_use]
    pub fn render(&self, input: &str) -> RenderResult {
        let mut state = RenderState::new(self.attributes.clone());
        let lines: Vec<&str> = input.lines().collect();

        let mut idx = 0;
        while idx < lines.len() {
            idx = self.render_line(&mut state, &lines, idx);
        }

        state.finish()
    }

    /// Handle the line at `idx` and return the index of the next unhandled line.
    fn render_line<'a>(
        &self,
        state: &mut RenderState<'a>,
        lines: &[&'a str],
        idx: usize,
    ) -> usize {
        let line = lines[idx].trim_end();

        if line.is_empty() {
            state.flush_paragraph();
            return idx + 1;
        }

        if let Some(delimiter) = Delimiter::detect(line) {
            state.flush_paragraph();
            return self.render_delimited(state, lines, idx, delimiter);
        }

        if !state.paragraph.is_empty() {
            state.paragraph.push(line);
            return idx + 1;
        }

        if line.starts_with("//") {
            return idx + 1;
        }

        if let Some(caps) = ATTRIBUTE_ENTRY.captures(line) {
            let name = &caps[2];
            if caps[1].is_empty() && caps[3].is_empty() {
                let value = caps.get(4).map_or("", |m| m.as_str());
                state.attributes.set(name, value);
            } else {
                state.attributes.unset(name);
            }
            return idx + 1;
        }

        if let Some(caps) = HEADING.captures(line) {
            let level = caps[1].len() - 1;
            let title = caps[2].trim();
            if level == 0 {
                if state.title.is_none() && !state.has_content {
                    state.title = Some(title.to_owned());
                } else {
                    state
                        .warnings
                        .push(format!("line {}: level 0 section ignored", idx + 1));
                }
                state.take_pending();
            } else {
                state.start_section(level, title);
            }
            return idx + 1;
        }

        if let Some(title) = block_title(line) {
            state.pending_title = Some(title.to_owned());
            return idx + 1;
        }

        if let Some(list) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let parsed = BlockAttributes::parse(list);
            match &mut state.pending_attributes {
                Some(pending) => pending.merge(parsed),
                None => state.pending_attributes = Some(parsed),
            }
            return idx + 1;
        }

        state.paragraph.push(line);
        idx + 1
    }

    /// Collect a delimited block and render or dispatch it.
    fn render_delimited(
        &self,
        state: &mut RenderState<'_>,
        lines: &[&str],
        idx: usize,
        delimiter: Delimiter,
    ) -> usize {
        let start = idx + 1;
        let end = lines[start..]
            .iter()
            .position(|l| delimiter.is_closed_by(l))
            .map(|offset| start + offset);

        let content_end = end.unwrap_or_else(|| {
            state.warnings.push(format!(
                "line {}: unterminated {} block",
                idx + 1,
                delimiter.context
            ));
            lines.len()
        });

        let block = Block {
            context: delimiter.context,
            attributes: state.take_pending(),
            source: lines[start..content_end].join("\n"),
            line: idx + 1,
        };
        self.render_block(state, &block);

        end.map_or(lines.len(), |e| e + 1)
    }

    fn render_block(&self, state: &mut RenderState<'_>, block: &Block) {
        state.has_content = true;

        if let Some(style) = block.attributes.style()
            && let Some(processor) = self.registry.registered_for_block(style, block.context)
        {
            tracing::debug!(
                style,
                context = %block.context,
                line = block.line,
                "Dispatching block"
            );
            match processor.process(block, &state.attributes, &mut state.warnings) {
                ProcessResult::Substitute(substitute) => {
                    html::substitute_block(&substitute, &mut state.html);
                    return;
                }
                ProcessResult::PassThrough => {}
            }
        }

        let mut verbatim = VerbatimBlock::from_block(block);
        if block.attributes.style() == Some("source") {
            verbatim.language = block
                .attributes
                .positional(2)
                .filter(|l| !l.is_empty())
                .or_else(|| state.attributes.get("source-language"))
                .map(str::to_owned);
        }
        html::verbatim_block(&verbatim, &mut state.html);
    }
}

/// `.Title` lines: a dot followed by a non-space, non-dot character.
fn block_title(line: &str) -> Option<&str> {
    let title = line.strip_prefix('.')?;
    let first = title.chars().next()?;
    (first != '.' && !first.is_whitespace()).then_some(title)
}

/// Mutable state while rendering one document.
struct RenderState<'a> {
    html: String,
    title: Option<String>,
    attributes: DocumentAttributes,
    warnings: Vec<String>,
    paragraph: Vec<&'a str>,
    pending_attributes: Option<BlockAttributes>,
    pending_title: Option<String>,
    /// Levels of currently open sections, outermost first.
    open_sections: Vec<usize>,
    /// Counter for generating unique section ids.
    id_counts: HashMap<String, usize>,
    /// Whether any block has been emitted (the header title must come first).
    has_content: bool,
}

impl<'a> RenderState<'a> {
    fn new(attributes: DocumentAttributes) -> Self {
        Self {
            html: String::new(),
            title: None,
            attributes,
            warnings: Vec::new(),
            paragraph: Vec::new(),
            pending_attributes: None,
            pending_title: None,
            open_sections: Vec::new(),
            id_counts: HashMap::new(),
            has_content: false,
        }
    }

    /// Take the attribute and title lines collected for the next block.
    fn take_pending(&mut self) -> BlockAttributes {
        let mut attributes = self.pending_attributes.take().unwrap_or_default();
        if let Some(title) = self.pending_title.take() {
            attributes.set_title(title);
        }
        attributes
    }

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let text = self.paragraph.join("\n");
        self.paragraph.clear();

        let attributes = self.take_pending();
        html::paragraph(
            attributes.id(),
            attributes.roles(),
            attributes.title(),
            &text,
            &mut self.html,
        );
        self.has_content = true;
    }

    fn start_section(&mut self, level: usize, title: &str) {
        self.close_sections(level);

        let attributes = self.take_pending();
        let id = attributes
            .id()
            .map_or_else(|| self.generate_id(title), str::to_owned);

        html::section_start(level, &id, title, &mut self.html);
        self.open_sections.push(level);
        self.has_content = true;
    }

    /// Close open sections at `level` or deeper.
    fn close_sections(&mut self, level: usize) {
        while let Some(&open) = self.open_sections.last() {
            if open < level {
                break;
            }
            html::section_end(open, &mut self.html);
            self.open_sections.pop();
        }
    }

    /// Asciidoctor-style section id: `_` prefix, lowercase words joined by `_`.
    fn generate_id(&mut self, title: &str) -> String {
        let mut base = String::from("_");
        let mut last_was_sep = true;
        for c in title.chars() {
            if c.is_alphanumeric() {
                base.extend(c.to_lowercase());
                last_was_sep = false;
            } else if !last_was_sep {
                base.push('_');
                last_was_sep = true;
            }
        }
        if base.len() > 1 && base.ends_with('_') {
            base.pop();
        }

        let count = self.id_counts.entry(base.clone()).or_default();
        *count += 1;
        match *count {
            1 => base,
            n => format!("{base}_{n}"),
        }
    }

    fn finish(mut self) -> RenderResult {
        self.flush_paragraph();
        self.close_sections(1);

        if self.pending_attributes.is_some() || self.pending_title.is_some() {
            self.warnings
                .push("block attributes at end of document ignored".to_owned());
        }

        RenderResult {
            html: self.html,
            title: self.title,
            attributes: self.attributes,
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::context::BlockContext;
    use crate::processor::{BlockProcessor, ImageBlock, SubstituteBlock};
    use pretty_assertions::assert_eq;

    /// Replaces `[shape]` blocks with an image named after the block content.
    struct ShapeProcessor;

    impl BlockProcessor for ShapeProcessor {
        fn process(
            &self,
            block: &Block,
            document: &DocumentAttributes,
            warnings: &mut Vec<String>,
        ) -> ProcessResult {
            if block.source == "pass" {
                warnings.push("passing".to_owned());
                return ProcessResult::PassThrough;
            }
            let base = document.get("shape-base").unwrap_or("/shapes");
            ProcessResult::Substitute(SubstituteBlock::Image(ImageBlock {
                id: block.attributes.id().map(str::to_owned),
                classes: vec!["imageblock".to_owned(), "shape".to_owned()],
                title: block.attributes.title().map(str::to_owned),
                src: format!("{base}/{}", block.source),
                alt: block.context.as_str().to_owned(),
                ..ImageBlock::default()
            }))
        }
    }

    fn renderer() -> DocumentRenderer {
        let mut registry = ExtensionRegistry::new();
        registry.register_block("shape", &[BlockContext::Listing], Arc::new(ShapeProcessor));
        DocumentRenderer::new(registry)
    }

    #[test]
    fn test_plain_listing_block() {
        let result = renderer().render("----\nline 1\nline 2\n----\n");
        assert_eq!(
            result.html,
            "<div class=\"listingblock\">\n<div class=\"content\">\n<pre>line 1\nline 2</pre>\n</div>\n</div>\n"
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_registered_style_is_dispatched() {
        let result = renderer().render("[shape#sq]\n.Square\n----\nsquare\n----\n");
        assert_eq!(
            result.html,
            "<div id=\"sq\" class=\"imageblock shape\">\n<div class=\"content\">\n\
             <img src=\"/shapes/square\" alt=\"listing\">\n</div>\n\
             <div class=\"title\">Square</div>\n</div>\n"
        );
    }

    #[test]
    fn test_processor_sees_document_attributes_in_order() {
        let result = renderer().render(
            "[shape]\n----\na\n----\n\n:shape-base: /img\n\n[shape]\n----\nb\n----\n",
        );
        assert!(result.html.contains(r#"src="/shapes/a""#));
        assert!(result.html.contains(r#"src="/img/b""#));
        assert_eq!(result.attributes.get("shape-base"), Some("/img"));
    }

    #[test]
    fn test_unregistered_context_renders_verbatim() {
        let result = renderer().render("[shape]\n....\nsquare\n....\n");
        assert!(result.html.starts_with("<div class=\"literalblock\">"));
        assert!(result.html.contains("<pre>square</pre>"));
    }

    #[test]
    fn test_pass_through_renders_verbatim_and_keeps_warnings() {
        let result = renderer().render("[shape]\n----\npass\n----\n");
        assert!(result.html.contains("<pre>pass</pre>"));
        assert_eq!(result.warnings, ["passing"]);
    }

    #[test]
    fn test_source_block_language() {
        let result = renderer().render("[source,rust]\n----\nfn main() {}\n----\n");
        assert!(result.html.contains(r#"<code class="language-rust" data-lang="rust">"#));
    }

    #[test]
    fn test_source_block_default_language() {
        let result = renderer().render(":source-language: toml\n\n[source]\n----\na = 1\n----\n");
        assert!(result.html.contains(r#"class="language-toml""#));
    }

    #[test]
    fn test_delimiter_length_must_match() {
        let result = renderer().render("------\n----\ninside\n------\nafter\n");
        assert!(result.html.contains("<pre>----\ninside</pre>"));
        assert!(result.html.contains("<p>after</p>"));
    }

    #[test]
    fn test_unterminated_block_warns() {
        let result = renderer().render("intro\n\n....\nnever closed\n");
        assert!(result.html.contains("<pre>never closed</pre>"));
        assert_eq!(result.warnings, ["line 3: unterminated literal block"]);
    }

    #[test]
    fn test_header_title_and_attributes() {
        let result = renderer().render(
            "= My Doc\n:plantuml-server-url: http://localhost:8080\n:toc:\n\nHello.\n",
        );
        assert_eq!(result.title.as_deref(), Some("My Doc"));
        assert_eq!(
            result.attributes.get("plantuml-server-url"),
            Some("http://localhost:8080")
        );
        assert_eq!(result.attributes.get("toc"), Some(""));
        assert_eq!(result.html, "<div class=\"paragraph\">\n<p>Hello.</p>\n</div>\n");
    }

    #[test]
    fn test_attribute_unset() {
        let renderer = renderer()
            .with_attributes([("shape-base", "/x")].into_iter().collect());
        let result = renderer.render(":shape-base!:\n\n[shape]\n----\nq\n----\n");
        assert!(result.html.contains(r#"src="/shapes/q""#));
        assert!(!result.attributes.contains("shape-base"));
    }

    #[test]
    fn test_sections_nest_and_close() {
        let result = renderer().render("== One\n\n=== Deep\n\ntext\n\n== Two\n");
        assert_eq!(
            result.html,
            "<div class=\"sect1\">\n<h2 id=\"_one\">One</h2>\n<div class=\"sectionbody\">\n\
             <div class=\"sect2\">\n<h3 id=\"_deep\">Deep</h3>\n\
             <div class=\"paragraph\">\n<p>text</p>\n</div>\n\
             </div>\n</div>\n</div>\n\
             <div class=\"sect1\">\n<h2 id=\"_two\">Two</h2>\n<div class=\"sectionbody\">\n\
             </div>\n</div>\n"
        );
    }

    #[test]
    fn test_duplicate_section_ids() {
        let result = renderer().render("== Usage\n\n== Usage\n");
        assert!(result.html.contains(r#"id="_usage""#));
        assert!(result.html.contains(r#"id="_usage_2""#));
    }

    #[test]
    fn test_paragraph_attributes_and_comments() {
        let result = renderer().render("// hidden\n[#lead.intro]\n.Summary\nFirst line\nsecond line\n");
        assert_eq!(
            result.html,
            "<div id=\"lead\" class=\"paragraph intro\">\n<div class=\"title\">Summary</div>\n\
             <p>First line\nsecond line</p>\n</div>\n"
        );
    }

    #[test]
    fn test_block_title_requires_text() {
        assert_eq!(block_title(".Title"), Some("Title"));
        assert_eq!(block_title(". not a title"), None);
        assert_eq!(block_title("..."), None);
        assert_eq!(block_title("."), None);
    }

    #[test]
    fn test_trailing_attributes_warn() {
        let result = renderer().render("text\n\n[shape]\n");
        assert_eq!(result.warnings, ["block attributes at end of document ignored"]);
    }

    #[test]
    fn test_renderer_is_reusable() {
        let renderer = renderer();
        let first = renderer.render(":shape-base: /one\n\n[shape]\n----\na\n----\n");
        let second = renderer.render("[shape]\n----\na\n----\n");
        assert!(first.html.contains("/one/a"));
        assert!(second.html.contains("/shapes/a"));
    }
}
