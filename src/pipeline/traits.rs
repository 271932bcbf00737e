use std::path::{Path, PathBuf};

use crate::config::{AcousticModel, ModelLayout};
use crate::error::AlignmentError;

/// General-purpose word breaking over raw text; not dictionary-aware.
pub trait WordBreaker: Send + Sync {
    fn cut<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedFeatures {
    pub feature_path: PathBuf,
    /// Rate the features were extracted at; selects the acoustic model.
    pub sample_rate_hz: u32,
}

/// Turns a media file into acoustic features inside `workdir`.
pub trait MediaPreparer: Send + Sync {
    fn prepare(
        &self,
        media_path: &Path,
        workdir: &Path,
        model: &ModelLayout,
        auto_resample_rate_hz: u32,
    ) -> Result<PreparedFeatures, AlignmentError>;
}

pub struct AcousticRequest<'a> {
    pub workdir: &'a Path,
    pub feature_path: &'a Path,
    pub transcript_path: &'a Path,
    pub acoustic: &'a AcousticModel,
    pub model: &'a ModelLayout,
}

/// Forced alignment of features against a reference transcript; returns
/// the raw state-level output, one entry per line.
pub trait AcousticAligner: Send + Sync {
    fn align(&self, request: &AcousticRequest<'_>) -> Result<Vec<String>, AlignmentError>;
}
