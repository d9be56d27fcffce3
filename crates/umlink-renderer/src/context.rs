//! Delimited block contexts and delimiter tracking.

use std::fmt;

/// Context of a delimited verbatim block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockContext {
    /// `----` delimited block.
    Listing,
    /// `....` delimited block.
    Literal,
}

impl BlockContext {
    /// Both verbatim contexts, in registration order.
    pub const ALL: [Self; 2] = [Self::Listing, Self::Literal];

    /// Context name as used in class lists (`listing`, `literal`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Listing => "listing",
            Self::Literal => "literal",
        }
    }

    /// Character repeated to form this context's delimiter line.
    #[must_use]
    pub fn delimiter_char(self) -> char {
        match self {
            Self::Listing => '-',
            Self::Literal => '.',
        }
    }

    /// Wrapper class of the rendered block (`listingblock`, `literalblock`).
    #[must_use]
    pub fn block_class(self) -> &'static str {
        match self {
            Self::Listing => "listingblock",
            Self::Literal => "literalblock",
        }
    }

    fn from_delimiter_char(c: char) -> Option<Self> {
        match c {
            '-' => Some(Self::Listing),
            '.' => Some(Self::Literal),
            _ => None,
        }
    }
}

impl fmt::Display for BlockContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum delimiter length for listing and literal blocks.
const MIN_DELIMITER_LEN: usize = 4;

/// An opening delimiter line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Delimiter {
    pub(crate) context: BlockContext,
    len: usize,
}

impl Delimiter {
    /// Detect a delimiter line (`----`, `.....`, trailing whitespace allowed).
    pub(crate) fn detect(line: &str) -> Option<Self> {
        let trimmed = line.trim_end();
        let first = trimmed.chars().next()?;
        let context = BlockContext::from_delimiter_char(first)?;

        let len = trimmed.chars().count();
        if len < MIN_DELIMITER_LEN || !trimmed.chars().all(|c| c == first) {
            return None;
        }

        Some(Self { context, len })
    }

    /// Whether `line` closes a block opened by this delimiter.
    ///
    /// The closing line must repeat the opening character exactly as many times.
    pub(crate) fn is_closed_by(self, line: &str) -> bool {
        Self::detect(line) == Some(self)
    }
}
