use thiserror::Error;

use crate::config::PRETRAINED_SAMPLE_RATES_HZ;

#[derive(Debug, Error)]
pub enum AlignmentError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("WAV error while {context}: {source}")]
    Wav {
        context: &'static str,
        #[source]
        source: hound::Error,
    },
    #[error("no pronunciation for '{character}' in '{word}': not in the dictionary and no entry shares its reading")]
    UnresolvedPronunciation { character: char, word: String },
    #[error("aligner output desynchronized from the reference transcript: expected {expected} segments, got {actual}")]
    AlignmentCountMismatch { expected: usize, actual: usize },
    #[error("unsupported sample rate {rate_hz} Hz; pretrained models exist for {:?} Hz", PRETRAINED_SAMPLE_RATES_HZ)]
    UnsupportedSampleRate { rate_hz: u32 },
    #[error("malformed aligner output at line {line_number} ({line:?}): {reason}")]
    MalformedAlignment {
        line_number: usize,
        line: String,
        reason: String,
    },
    #[error("external tool `{tool}` failed: {message}")]
    ExternalTool { tool: String, message: String },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl AlignmentError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn wav(context: &'static str, source: hound::Error) -> Self {
        Self::Wav { context, source }
    }

    pub(crate) fn external_tool(tool: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::ExternalTool {
            tool: tool.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn malformed(line_number: usize, line: &str, reason: impl Into<String>) -> Self {
        Self::MalformedAlignment {
            line_number,
            line: line.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
