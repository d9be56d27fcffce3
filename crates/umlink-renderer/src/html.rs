//! HTML output for AsciiDoc blocks.
//!
//! Produces the html5 structure Asciidoctor emits for the block types we
//! support, so existing stylesheets apply unchanged.

use std::fmt::Write;

use crate::context::BlockContext;
use crate::processor::{ImageBlock, SubstituteBlock, VerbatimBlock};

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Write a processor's substitute block.
pub(crate) fn substitute_block(block: &SubstituteBlock, out: &mut String) {
    match block {
        SubstituteBlock::Image(image) => image_block(image, out),
        SubstituteBlock::Verbatim(verbatim) => verbatim_block(verbatim, out),
    }
}

/// `<div id=".." class="..">` opening tag.
fn open_div(id: Option<&str>, classes: &[&str], out: &mut String) {
    out.push_str("<div");
    if let Some(id) = id {
        write!(out, r#" id="{}""#, escape_html(id)).unwrap();
    }
    writeln!(out, r#" class="{}">"#, escape_html(&classes.join(" "))).unwrap();
}

fn title_div(title: Option<&str>, out: &mut String) {
    if let Some(title) = title {
        writeln!(out, r#"<div class="title">{}</div>"#, escape_html(title)).unwrap();
    }
}

/// Write an image block: content first, title below the image.
pub(crate) fn image_block(image: &ImageBlock, out: &mut String) {
    let classes: Vec<&str> = image.classes.iter().map(String::as_str).collect();
    open_div(image.id.as_deref(), &classes, out);
    out.push_str("<div class=\"content\">\n");

    write!(
        out,
        r#"<img src="{}" alt="{}""#,
        escape_html(&image.src),
        escape_html(&image.alt)
    )
    .unwrap();
    if let Some(width) = &image.width {
        write!(out, r#" width="{}""#, escape_html(width)).unwrap();
    }
    if let Some(height) = &image.height {
        write!(out, r#" height="{}""#, escape_html(height)).unwrap();
    }
    out.push_str(">\n</div>\n");

    title_div(image.title.as_deref(), out);
    out.push_str("</div>\n");
}

/// Write a listing or literal block: title above the content.
pub(crate) fn verbatim_block(block: &VerbatimBlock, out: &mut String) {
    let mut classes = vec![block.context.block_class()];
    classes.extend(block.roles.iter().map(String::as_str));
    open_div(block.id.as_deref(), &classes, out);
    title_div(block.title.as_deref(), out);
    out.push_str("<div class=\"content\">\n");

    let source = escape_html(&block.source);
    match (&block.language, block.context) {
        (Some(language), BlockContext::Listing) => {
            let language = escape_html(language);
            writeln!(
                out,
                r#"<pre class="highlight"><code class="language-{language}" data-lang="{language}">{source}</code></pre>"#
            )
            .unwrap();
        }
        _ => writeln!(out, "<pre>{source}</pre>").unwrap(),
    }

    out.push_str("</div>\n</div>\n");
}

/// Write a paragraph. Lines are kept as-is, separated by newlines.
pub(crate) fn paragraph(
    id: Option<&str>,
    roles: &[String],
    title: Option<&str>,
    text: &str,
    out: &mut String,
) {
    let mut classes = vec!["paragraph"];
    classes.extend(roles.iter().map(String::as_str));
    open_div(id, &classes, out);
    title_div(title, out);
    writeln!(out, "<p>{}</p>", escape_html(text)).unwrap();
    out.push_str("</div>\n");
}

/// Open a section of the given level (1 = `==`).
pub(crate) fn section_start(level: usize, id: &str, title: &str, out: &mut String) {
    writeln!(out, r#"<div class="sect{level}">"#).unwrap();
    writeln!(
        out,
        r#"<h{tag} id="{}">{}</h{tag}>"#,
        escape_html(id),
        escape_html(title),
        tag = level + 1
    )
    .unwrap();
    if level == 1 {
        out.push_str("<div class=\"sectionbody\">\n");
    }
}

/// Close a section opened with [`section_start`].
pub(crate) fn section_end(level: usize, out: &mut String) {
    if level == 1 {
        out.push_str("</div>\n");
    }
    out.push_str("</div>\n");
}
