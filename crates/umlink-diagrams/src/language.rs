//! Diagram languages and output formats.
//!
//! Every language is rendered by a PlantUML server; the language only decides
//! the block style it answers to and the directive pair wrapped around bare
//! sources.

use std::fmt;

/// Supported diagram languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramLanguage {
    PlantUml,
    Ditaa,
    GraphViz,
}

impl DiagramLanguage {
    /// All languages, in registration order.
    pub const ALL: [Self; 3] = [Self::PlantUml, Self::Ditaa, Self::GraphViz];

    /// Parse a language from a block style.
    ///
    /// Returns None if the style is not a supported diagram language.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "plantuml" => Some(Self::PlantUml),
            "ditaa" => Some(Self::Ditaa),
            "graphviz" => Some(Self::GraphViz),
            _ => None,
        }
    }

    /// Block style and CSS class for this language.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::PlantUml => "plantuml",
            Self::Ditaa => "ditaa",
            Self::GraphViz => "graphviz",
        }
    }

    /// Directive suffix: `@start{directive}` / `@end{directive}`.
    #[must_use]
    pub fn directive(self) -> &'static str {
        match self {
            Self::PlantUml => "uml",
            Self::Ditaa => "ditaa",
            Self::GraphViz => "dot",
        }
    }

    /// Whether configured PlantUML settings apply to this language.
    #[must_use]
    pub fn accepts_plantuml_config(self) -> bool {
        matches!(self, Self::PlantUml)
    }
}

impl fmt::Display for DiagramLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Image format requested from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagramFormat {
    #[default]
    Png,
    Svg,
}

impl DiagramFormat {
    /// Parse format from attribute value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    /// Return format as string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

impl fmt::Display for DiagramFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
