//! Internal constants for diagram blocks.

/// Attribute naming the PlantUML server, on a block or in the document.
pub const SERVER_URL_ATTRIBUTE: &str = "plantuml-server-url";

/// Document attribute overriding the default output format.
pub const DEFAULT_FORMAT_ATTRIBUTE: &str = "plantuml-default-format";

/// Role given to blocks that could not be turned into an image.
pub const ERROR_ROLE: &str = "plantuml-error";

/// Alternative text used when a block has no target.
pub const DEFAULT_ALT: &str = "diagram";
