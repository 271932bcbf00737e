use serde::Serialize;

use crate::types::PhonemeDuration;

pub const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub schema_version: u32,
    pub meta: Meta,
    pub utterances: Vec<UtteranceReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub generated_at: String,
    pub model_dir: String,
    pub auto_resample_rate_hz: u32,
    pub utterance_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct UtteranceReport {
    pub id: String,
    pub text: String,
    pub phoneme_count: usize,
    /// End of the last phoneme, seconds.
    pub speech_end: f64,
    pub phonemes: Vec<PhonemeDuration>,
}

impl UtteranceReport {
    pub fn new(id: impl Into<String>, text: impl Into<String>, phonemes: Vec<PhonemeDuration>) -> Self {
        let speech_end = phonemes.iter().map(|p| p.end).fold(0.0, f64::max);
        Self {
            id: id.into(),
            text: text.into(),
            phoneme_count: phonemes.len(),
            speech_end,
            phonemes,
        }
    }
}

pub fn build_report(meta_base: Meta, utterances: Vec<UtteranceReport>) -> Report {
    Report {
        schema_version: REPORT_SCHEMA_VERSION,
        meta: Meta {
            utterance_count: utterances.len(),
            ..meta_base
        },
        utterances,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phoneme(unit: &str, begin: f64, end: f64) -> PhonemeDuration {
        PhonemeDuration {
            unit: unit.to_string(),
            begin,
            end,
        }
    }

    #[test]
    fn utterance_report_summarizes_phonemes() {
        let report = UtteranceReport::new(
            "000",
            "春走",
            vec![phoneme("chun", 0.1, 0.35), phoneme("zou", 0.35, 0.6)],
        );
        assert_eq!(report.phoneme_count, 2);
        assert!((report.speech_end - 0.6).abs() < 1e-12);
    }

    #[test]
    fn build_report_counts_utterances_and_serializes() {
        let meta = Meta {
            generated_at: "2026-01-01T00:00:00+00:00".to_string(),
            model_dir: "/opt/model".to_string(),
            auto_resample_rate_hz: 8_000,
            utterance_count: 0,
        };
        let report = build_report(
            meta,
            vec![UtteranceReport::new("a", "春", vec![phoneme("chun", 0.0, 0.2)])],
        );
        assert_eq!(report.meta.utterance_count, 1);

        let json = serde_json::to_value(&report).expect("serialize report");
        assert_eq!(json["schema_version"], 1);
        assert_eq!(json["utterances"][0]["phonemes"][0]["unit"], "chun");
        assert_eq!(json["utterances"][0]["phonemes"][0]["end"], 0.2);
    }
}
