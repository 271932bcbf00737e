pub mod alignment;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

pub use alignment::dictionary::{Dictionary, Lexicon, PunctuationSet, ReadingIndex};
pub use alignment::reconstruction::{reconstruct, PhonemeDurations, ReconstructionState};
pub use alignment::report::{build_report, Meta, Report, UtteranceReport};
pub use alignment::transcript::{write_reference, ReferenceTranscript};
pub use config::{AcousticModel, AlignerConfig, ExternalTools, ModelLayout, PRETRAINED_SAMPLE_RATES_HZ};
pub use error::AlignmentError;
pub use pipeline::builder::ForcedAlignerBuilder;
pub use pipeline::runtime::ForcedAligner;
pub use pipeline::traits::{AcousticAligner, AcousticRequest, MediaPreparer, PreparedFeatures, WordBreaker};
pub use types::{AlignmentInput, PhonemeDuration, ResolvedWord, Token};
