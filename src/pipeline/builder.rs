use crate::alignment::dictionary::Lexicon;
use crate::config::{AlignerConfig, ModelLayout};
use crate::error::AlignmentError;
use crate::pipeline::defaults::{HViteAligner, JiebaWordBreaker, ToolchainMediaPreparer};
use crate::pipeline::runtime::{ForcedAligner, ForcedAlignerParts};
use crate::pipeline::traits::{AcousticAligner, MediaPreparer, WordBreaker};

pub struct ForcedAlignerBuilder {
    config: AlignerConfig,
    lexicon: Option<Lexicon>,
    word_breaker: Option<Box<dyn WordBreaker>>,
    media_preparer: Option<Box<dyn MediaPreparer>>,
    acoustic_aligner: Option<Box<dyn AcousticAligner>>,
}

impl ForcedAlignerBuilder {
    pub fn new(config: AlignerConfig) -> Self {
        Self {
            config,
            lexicon: None,
            word_breaker: None,
            media_preparer: None,
            acoustic_aligner: None,
        }
    }

    /// Use an in-memory lexicon instead of loading the model's resources.
    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    pub fn with_word_breaker(mut self, word_breaker: Box<dyn WordBreaker>) -> Self {
        self.word_breaker = Some(word_breaker);
        self
    }

    pub fn with_media_preparer(mut self, media_preparer: Box<dyn MediaPreparer>) -> Self {
        self.media_preparer = Some(media_preparer);
        self
    }

    pub fn with_acoustic_aligner(mut self, acoustic_aligner: Box<dyn AcousticAligner>) -> Self {
        self.acoustic_aligner = Some(acoustic_aligner);
        self
    }

    pub fn build(self) -> Result<ForcedAligner, AlignmentError> {
        self.config.validate()?;
        let layout = ModelLayout::resolve(&self.config)?;

        let lexicon = match self.lexicon {
            Some(lexicon) => lexicon,
            None => Lexicon::load(&layout.dictionary, &layout.punctuation)?,
        };

        let media_preparer = self
            .media_preparer
            .unwrap_or_else(|| Box::new(ToolchainMediaPreparer::new(self.config.tools.clone())));
        let acoustic_aligner = self
            .acoustic_aligner
            .unwrap_or_else(|| Box::new(HViteAligner::from_config(&self.config)));

        Ok(ForcedAligner::from_parts(ForcedAlignerParts {
            layout,
            lexicon,
            auto_resample_rate_hz: self.config.auto_resample_rate_hz,
            word_breaker: self
                .word_breaker
                .unwrap_or_else(|| Box::new(JiebaWordBreaker::new())),
            media_preparer,
            acoustic_aligner,
        }))
    }
}
