use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, Clone)]
pub struct AlignmentInput {
    pub text: String,
    /// Any media file the configured transcoder can decode.
    pub media_path: PathBuf,
}

/// Fragment produced by segmentation, not yet validated per character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One dictionary surface form per source character, in order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedWord {
    pub units: Vec<String>,
}

impl ResolvedWord {
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhonemeDuration {
    /// Reading of the unit once reconstruction finishes; the aligner's own
    /// model label before relabelling.
    pub unit: String,
    /// Seconds from the start of the audio; `begin <= end`.
    pub begin: f64,
    pub end: f64,
}
