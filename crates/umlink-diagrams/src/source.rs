//! Diagram source preparation.
//!
//! Sources without a matching `@start`/`@end` directive pair are wrapped in
//! the pair of the block's language before encoding, and configured PlantUML
//! settings are injected after the start directive.

use std::borrow::Cow;

use crate::language::DiagramLanguage;

/// Prepare a block's source for encoding.
///
/// # Arguments
/// * `source` - Raw block content
/// * `language` - Language of the block
/// * `config` - PlantUML settings to inject, ignored for other languages
#[must_use]
pub fn prepare_source(source: &str, language: DiagramLanguage, config: Option<&str>) -> String {
    let wrapped = wrap_source(source, language);
    match config {
        Some(config) if language.accepts_plantuml_config() && !config.trim().is_empty() => {
            inject_config(&wrapped, config)
        }
        _ => wrapped.into_owned(),
    }
}

/// Wrap `source` in the language's directive pair unless it already has one.
#[must_use]
pub fn wrap_source(source: &str, language: DiagramLanguage) -> Cow<'_, str> {
    if is_wrapped(source) {
        return Cow::Borrowed(source);
    }
    let directive = language.directive();
    Cow::Owned(format!("@start{directive}\n{source}\n@end{directive}"))
}

/// Whether the first non-blank line is `@start<name>` and the last non-blank
/// line is `@end<name>` for the same name.
///
/// Any diagram kind counts, so a `plantuml` block holding `@startmindmap` is
/// left as written. `@start`/`@end` text elsewhere in the source is ignored.
#[must_use]
pub fn is_wrapped(source: &str) -> bool {
    let mut lines = source.lines().map(str::trim).filter(|line| !line.is_empty());
    let Some(first) = lines.next() else {
        return false;
    };
    let Some(last) = lines.next_back() else {
        return false;
    };

    let Some(name) = directive_name(first, "@start") else {
        return false;
    };
    directive_name(last, "@end") == Some(name)
}

/// Diagram kind named by a `@start`/`@end` line, ignoring any trailing
/// arguments such as a diagram name.
fn directive_name<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(prefix)?;
    let name = rest.split_whitespace().next().unwrap_or("");
    let is_name = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric());
    is_name.then_some(name)
}

/// Insert `config` on the line after the first `@start` directive.
fn inject_config(source: &str, config: &str) -> String {
    let config = config.trim_end_matches('\n');
    let mut result = String::with_capacity(source.len() + config.len() + 1);
    let mut injected = false;

    for line in source.split_inclusive('\n') {
        result.push_str(line);
        if !injected && line.trim_start().starts_with("@start") {
            if !line.ends_with('\n') {
                result.push('\n');
            }
            result.push_str(config);
            result.push('\n');
            injected = true;
        }
    }

    if !injected {
        return format!("{config}\n{source}");
    }
    result
}
