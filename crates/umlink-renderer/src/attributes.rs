//! Block attribute lists and document attributes.
//!
//! Parses the `[style#id.role%option,positional,name=value]` syntax that
//! precedes a block, and holds the `:name: value` entries of a document.

use std::collections::{BTreeMap, HashMap};

/// Attributes attached to a block by one or more `[...]` lines.
///
/// Positional attributes are 1-based: slot 1 holds the block style with its
/// shorthand modifiers stripped, so `[plantuml,diagram-name,svg]` has
/// `positional(2) == Some("diagram-name")` and `positional(3) == Some("svg")`.
///
/// # Example
///
/// ```
/// use umlink_renderer::BlockAttributes;
///
/// let attrs = BlockAttributes::parse("plantuml#flow.sequence,flow,svg,width=400");
/// assert_eq!(attrs.style(), Some("plantuml"));
/// assert_eq!(attrs.id(), Some("flow"));
/// assert_eq!(attrs.roles(), ["sequence"]);
/// assert_eq!(attrs.positional(3), Some("svg"));
/// assert_eq!(attrs.get("width"), Some("400"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockAttributes {
    style: Option<String>,
    id: Option<String>,
    roles: Vec<String>,
    options: Vec<String>,
    title: Option<String>,
    positional: Vec<String>,
    named: HashMap<String, String>,
}

impl BlockAttributes {
    /// Parse the contents of an attribute line (without the brackets).
    #[must_use]
    pub fn parse(list: &str) -> Self {
        let mut attrs = Self::default();

        for (index, entry) in split_entries(list).into_iter().enumerate() {
            let entry = entry.trim();

            if let Some((name, value)) = split_named(entry) {
                attrs.set_named(name, unquote(value).0);
                continue;
            }

            let (value, quoted) = unquote(entry);
            if index == 0 && !quoted {
                let style = attrs.apply_shorthand(value);
                attrs.positional.push(style);
            } else {
                attrs.positional.push(value.to_owned());
            }
        }

        attrs
    }

    /// Merge a later attribute line into this one.
    ///
    /// Values from `other` win; roles and options accumulate.
    pub fn merge(&mut self, other: Self) {
        if other.style.is_some() {
            self.style = other.style;
        }
        if other.id.is_some() {
            self.id = other.id;
        }
        if other.title.is_some() {
            self.title = other.title;
        }
        self.roles.extend(other.roles);
        self.options.extend(other.options);

        for (slot, value) in other.positional.into_iter().enumerate() {
            if slot < self.positional.len() {
                if !value.is_empty() {
                    self.positional[slot] = value;
                }
            } else {
                self.positional.push(value);
            }
        }
        self.named.extend(other.named);
    }

    /// Block style (`plantuml`, `source`, ...), if any.
    #[must_use]
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    /// Block id from `id=` or the `#id` shorthand.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Roles from `role=` or the `.role` shorthand, in declaration order.
    ///
    /// A named `role=` replaces roles given by the shorthand in the same list.
    #[must_use]
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Options from `options=` or the `%option` shorthand.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Whether the named option is set.
    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Block title from a `.Title` line or `title=`.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Set the block title (from a `.Title` line).
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Positional attribute by 1-based slot.
    #[must_use]
    pub fn positional(&self, slot: usize) -> Option<&str> {
        slot.checked_sub(1)
            .and_then(|i| self.positional.get(i))
            .map(String::as_str)
    }

    /// Named attribute by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.named.get(key).map(String::as_str)
    }

    fn set_named(&mut self, name: &str, value: &str) {
        match name {
            "id" => self.id = Some(value.to_owned()),
            "role" => self.roles = value.split_whitespace().map(str::to_owned).collect(),
            "options" | "opts" => self.options.extend(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_owned),
            ),
            "title" => self.title = Some(value.to_owned()),
            _ => {}
        }
        self.named.insert(name.to_owned(), value.to_owned());
    }

    /// Apply `style#id.role%option` shorthand and return the bare style.
    fn apply_shorthand(&mut self, value: &str) -> String {
        let is_marker = |c: char| matches!(c, '#' | '.' | '%');
        let style_end = value.find(is_marker).unwrap_or(value.len());
        let style = &value[..style_end];
        if !style.is_empty() {
            self.style = Some(style.to_owned());
        }

        let mut remaining = &value[style_end..];
        while let Some(marker) = remaining.chars().next() {
            let body = &remaining[1..];
            let end = body.find(is_marker).unwrap_or(body.len());
            let segment = &body[..end];
            if !segment.is_empty() {
                match marker {
                    '#' => self.id = Some(segment.to_owned()),
                    '.' => self.roles.push(segment.to_owned()),
                    _ => self.options.push(segment.to_owned()),
                }
            }
            remaining = &body[end..];
        }

        style.to_owned()
    }
}

/// Split an attribute list on commas that are outside quoted values.
///
/// A quote only opens a quoted value at the start of an entry or right after
/// `=`, so apostrophes inside plain values (`don't`) are kept as text.
fn split_entries(list: &str) -> Vec<&str> {
    if list.trim().is_empty() {
        return Vec::new();
    }

    let mut entries = Vec::new();
    let mut quote: Option<char> = None;
    let mut at_value_start = true;
    let mut start = 0;

    for (i, c) in list.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            ',' => {
                entries.push(&list[start..i]);
                start = i + 1;
                at_value_start = true;
            }
            '"' | '\'' if at_value_start => {
                quote = Some(c);
                at_value_start = false;
            }
            '=' => at_value_start = true,
            c if c.is_whitespace() => {}
            _ => at_value_start = false,
        }
    }
    entries.push(&list[start..]);

    entries
}

/// Split `name=value` when `name` is a valid attribute name.
fn split_named(entry: &str) -> Option<(&str, &str)> {
    let (name, value) = entry.split_once('=')?;
    let name = name.trim();
    is_attribute_name(name).then_some((name, value.trim()))
}

/// Attribute names: word characters and hyphens, not starting with a hyphen.
pub(crate) fn is_attribute_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Strip matching single or double quotes. Returns whether quotes were removed.
fn unquote(value: &str) -> (&str, bool) {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return (&value[1..value.len() - 1], true);
        }
    }
    (value, false)
}

/// Document-level attributes (`:name: value` entries and predefined values).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentAttributes {
    values: BTreeMap<String, String>,
}

impl DocumentAttributes {
    /// Create an empty attribute set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an attribute value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Whether the attribute is set (possibly to an empty value).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Set an attribute, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Unset an attribute (`:name!:`).
    pub fn unset(&mut self, name: &str) {
        self.values.remove(name);
    }

    /// Iterate attributes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DocumentAttributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_list() {
        let attrs = BlockAttributes::parse("");
        assert_eq!(attrs, BlockAttributes::default());
        assert_eq!(attrs.positional(1), None);
    }

    #[test]
    fn test_style_only() {
        let attrs = BlockAttributes::parse("plantuml");
        assert_eq!(attrs.style(), Some("plantuml"));
        assert_eq!(attrs.positional(1), Some("plantuml"));
        assert!(attrs.roles().is_empty());
        assert_eq!(attrs.id(), None);
    }

    #[test]
    fn test_shorthand_id_role_option() {
        let attrs = BlockAttributes::parse("plantuml#myId.sequence.wide%interactive");
        assert_eq!(attrs.style(), Some("plantuml"));
        assert_eq!(attrs.id(), Some("myId"));
        assert_eq!(attrs.roles(), ["sequence", "wide"]);
        assert!(attrs.has_option("interactive"));
    }

    #[test]
    fn test_shorthand_without_style() {
        let attrs = BlockAttributes::parse("#intro.lead");
        assert_eq!(attrs.style(), None);
        assert_eq!(attrs.id(), Some("intro"));
        assert_eq!(attrs.roles(), ["lead"]);
    }

    #[test]
    fn test_named_id_and_role() {
        let attrs = BlockAttributes::parse("plantuml,id=myId,role=sequence");
        assert_eq!(attrs.id(), Some("myId"));
        assert_eq!(attrs.roles(), ["sequence"]);
        assert_eq!(attrs.get("role"), Some("sequence"));
    }

    #[test]
    fn test_named_role_replaces_shorthand_roles() {
        let attrs = BlockAttributes::parse("plantuml.a,role=b");
        assert_eq!(attrs.roles(), ["b"]);
        assert_eq!(attrs.style(), Some("plantuml"));
    }

    #[test]
    fn test_named_role_multiple_values() {
        let attrs = BlockAttributes::parse(r#"plantuml,role="left thumb""#);
        assert_eq!(attrs.roles(), ["left", "thumb"]);
    }

    #[test]
    fn test_positional_slots() {
        let attrs = BlockAttributes::parse("plantuml,myFile,svg");
        assert_eq!(attrs.positional(1), Some("plantuml"));
        assert_eq!(attrs.positional(2), Some("myFile"));
        assert_eq!(attrs.positional(3), Some("svg"));
        assert_eq!(attrs.positional(4), None);
        assert_eq!(attrs.positional(0), None);
    }

    #[test]
    fn test_quoted_empty_positional() {
        let attrs = BlockAttributes::parse("plantuml,'',svg");
        assert_eq!(attrs.positional(2), Some(""));
        assert_eq!(attrs.positional(3), Some("svg"));
    }

    #[test]
    fn test_quoted_values_keep_commas() {
        let attrs = BlockAttributes::parse(r#"plantuml,"a, b",title="One, two""#);
        assert_eq!(attrs.positional(2), Some("a, b"));
        assert_eq!(attrs.title(), Some("One, two"));
    }

    #[test]
    fn test_apostrophe_inside_plain_value() {
        let attrs = BlockAttributes::parse("plantuml,don't,svg");
        assert_eq!(attrs.positional(2), Some("don't"));
        assert_eq!(attrs.positional(3), Some("svg"));
    }

    #[test]
    fn test_named_format_and_url() {
        let attrs =
            BlockAttributes::parse("plantuml, format=svg, plantuml-server-url=http://localhost:8080");
        assert_eq!(attrs.get("format"), Some("svg"));
        assert_eq!(
            attrs.get("plantuml-server-url"),
            Some("http://localhost:8080")
        );
        assert_eq!(attrs.positional(2), None);
    }

    #[test]
    fn test_quoted_first_positional_is_not_shorthand() {
        let attrs = BlockAttributes::parse("\"#not-an-id\"");
        assert_eq!(attrs.id(), None);
        assert_eq!(attrs.style(), None);
        assert_eq!(attrs.positional(1), Some("#not-an-id"));
    }

    #[test]
    fn test_merge_later_line_wins() {
        let mut attrs = BlockAttributes::parse("plantuml#first,a");
        attrs.merge(BlockAttributes::parse("#second.extra,format=svg"));

        assert_eq!(attrs.style(), Some("plantuml"));
        assert_eq!(attrs.id(), Some("second"));
        assert_eq!(attrs.roles(), ["extra"]);
        assert_eq!(attrs.get("format"), Some("svg"));
        assert_eq!(attrs.positional(2), Some("a"));
    }

    #[test]
    fn test_attribute_names() {
        assert!(is_attribute_name("plantuml-server-url"));
        assert!(is_attribute_name("format"));
        assert!(!is_attribute_name("-format"));
        assert!(!is_attribute_name(""));
        assert!(!is_attribute_name("a b"));
    }

    #[test]
    fn test_document_attributes() {
        let mut attrs: DocumentAttributes =
            [("plantuml-server-url", "http://localhost:8080")].into_iter().collect();
        assert_eq!(attrs.get("plantuml-server-url"), Some("http://localhost:8080"));

        attrs.set("toc", "");
        assert!(attrs.contains("toc"));
        attrs.unset("toc");
        assert!(!attrs.contains("toc"));

        let names: Vec<_> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["plantuml-server-url"]);
    }
}
