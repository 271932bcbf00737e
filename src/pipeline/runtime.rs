use std::path::Path;

use crate::alignment::dictionary::{Dictionary, Lexicon, PunctuationSet};
use crate::alignment::reconstruction::{reconstruct, PhonemeDurations};
use crate::alignment::resolution::resolve_all;
use crate::alignment::segmentation::segment;
use crate::alignment::transcript::{write_reference, ReferenceTranscript};
use crate::config::ModelLayout;
use crate::error::AlignmentError;
use crate::pipeline::traits::{AcousticAligner, AcousticRequest, MediaPreparer, WordBreaker};
use crate::types::{AlignmentInput, ResolvedWord, Token};

/// Label stem of references built without any audio.
const UTTERANCE_STEM: &str = "utterance";

pub struct ForcedAligner {
    layout: ModelLayout,
    lexicon: Lexicon,
    auto_resample_rate_hz: u32,
    word_breaker: Box<dyn WordBreaker>,
    media_preparer: Box<dyn MediaPreparer>,
    acoustic_aligner: Box<dyn AcousticAligner>,
}

pub(crate) struct ForcedAlignerParts {
    pub layout: ModelLayout,
    pub lexicon: Lexicon,
    pub auto_resample_rate_hz: u32,
    pub word_breaker: Box<dyn WordBreaker>,
    pub media_preparer: Box<dyn MediaPreparer>,
    pub acoustic_aligner: Box<dyn AcousticAligner>,
}

impl ForcedAligner {
    pub(crate) fn from_parts(parts: ForcedAlignerParts) -> Self {
        Self {
            layout: parts.layout,
            lexicon: parts.lexicon,
            auto_resample_rate_hz: parts.auto_resample_rate_hz,
            word_breaker: parts.word_breaker,
            media_preparer: parts.media_preparer,
            acoustic_aligner: parts.acoustic_aligner,
        }
    }

    pub fn layout(&self) -> &ModelLayout {
        &self.layout
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn auto_resample_rate_hz(&self) -> u32 {
        self.auto_resample_rate_hz
    }

    pub fn set_dictionary(&mut self, dictionary: Dictionary) {
        self.lexicon.set_dictionary(dictionary);
    }

    pub fn extend_dictionary<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lexicon.extend_dictionary(entries);
    }

    pub fn set_punctuation(&mut self, punctuation: PunctuationSet) {
        self.lexicon.set_punctuation(punctuation);
    }

    pub fn extend_punctuation<I, S>(&mut self, symbols: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lexicon.extend_punctuation(symbols);
    }

    pub fn segment(&self, text: &str) -> Vec<Token> {
        segment(text, self.word_breaker.as_ref(), &self.lexicon)
    }

    /// Reference transcript for `text`, without touching any audio.
    pub fn reference_for(&self, text: &str) -> Result<ReferenceTranscript, AlignmentError> {
        Ok(write_reference(&self.resolve_text(text)?, UTTERANCE_STEM))
    }

    fn resolve_text(&self, text: &str) -> Result<Vec<ResolvedWord>, AlignmentError> {
        resolve_all(&self.segment(text), &self.lexicon)
    }

    /// Align `input.text` against `input.media_path`.
    ///
    /// The text is resolved first, so an unpronounceable character fails
    /// before any external tool runs. Every intermediate file lives in a
    /// temporary directory removed when this call returns.
    pub fn align(&self, input: &AlignmentInput) -> Result<PhonemeDurations, AlignmentError> {
        let words = self.resolve_text(&input.text)?;
        if words.iter().all(ResolvedWord::is_empty) {
            tracing::warn!("text has no alignable units; skipping alignment");
            return Ok(PhonemeDurations::empty());
        }

        let workdir = tempfile::Builder::new()
            .prefix("phoneme-align-")
            .tempdir()
            .map_err(|e| AlignmentError::io("create request directory", e))?;

        let features = self.media_preparer.prepare(
            &input.media_path,
            workdir.path(),
            &self.layout,
            self.auto_resample_rate_hz,
        )?;

        // HVite pairs the MLF label with the feature file by stem.
        let stem = feature_stem(&features.feature_path)?;
        let reference = write_reference(&words, stem);
        let transcript_path = workdir.path().join(format!("{stem}.mlf"));
        reference.write_to(&transcript_path)?;

        let acoustic = self.layout.acoustic_model(features.sample_rate_hz)?;
        let raw_alignment = self.acoustic_aligner.align(&AcousticRequest {
            workdir: workdir.path(),
            feature_path: &features.feature_path,
            transcript_path: &transcript_path,
            acoustic: &acoustic,
            model: &self.layout,
        })?;

        let durations = reconstruct(&raw_alignment, &reference)?;
        tracing::info!(
            media = %input.media_path.display(),
            sample_rate_hz = features.sample_rate_hz,
            units = reference.unit_count(),
            "alignment complete"
        );
        Ok(durations)
    }
}

fn feature_stem(feature_path: &Path) -> Result<&str, AlignmentError> {
    feature_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| {
            AlignmentError::invalid_input(format!(
                "feature path has no usable file stem: {}",
                feature_path.display()
            ))
        })
}
