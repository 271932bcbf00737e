use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::AlignmentError;

/// Sample rates the bundled acoustic models were trained on.
pub const PRETRAINED_SAMPLE_RATES_HZ: [u32; 2] = [8_000, 16_000];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlignerConfig {
    pub model_dir: PathBuf,
    pub dict_path: Option<PathBuf>,
    pub puncs_path: Option<PathBuf>,
    pub mono_path: Option<PathBuf>,
    /// Rate used when the input audio is not already at a pretrained rate.
    pub auto_resample_rate_hz: u32,
    pub tools: ExternalTools,
    /// HVite `-t` pruning thresholds.
    pub pruning: [f64; 3],
}

impl AlignerConfig {
    pub const DEFAULT_AUTO_RESAMPLE_RATE_HZ: u32 = 8_000;
    pub const DEFAULT_PRUNING: [f64; 3] = [10_000.0, 10_000.0, 10_000.0];

    pub fn load(path: &Path) -> Result<Self, AlignmentError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| AlignmentError::io("read aligner config", e))?;
        serde_json::from_str(&data).map_err(|e| AlignmentError::json("parse aligner config", e))
    }

    pub fn validate(&self) -> Result<(), AlignmentError> {
        if !is_pretrained_rate(self.auto_resample_rate_hz) {
            return Err(AlignmentError::UnsupportedSampleRate {
                rate_hz: self.auto_resample_rate_hz,
            });
        }
        Ok(())
    }
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("model"),
            dict_path: None,
            puncs_path: None,
            mono_path: None,
            auto_resample_rate_hz: Self::DEFAULT_AUTO_RESAMPLE_RATE_HZ,
            tools: ExternalTools::default(),
            pruning: Self::DEFAULT_PRUNING,
        }
    }
}

/// Program names (or paths) of the external collaborators.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExternalTools {
    pub ffmpeg: String,
    pub sox: String,
    pub hcopy: String,
    pub hvite: String,
}

impl Default for ExternalTools {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            sox: "sox".to_string(),
            hcopy: "HCopy".to_string(),
            hvite: "HVite".to_string(),
        }
    }
}

pub fn is_pretrained_rate(rate_hz: u32) -> bool {
    PRETRAINED_SAMPLE_RATES_HZ.contains(&rate_hz)
}

/// Absolute locations of every model resource. External tools run with
/// the request directory as their working directory, so nothing here may
/// stay relative.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelLayout {
    pub model_dir: PathBuf,
    pub dictionary: PathBuf,
    pub punctuation: PathBuf,
    pub monophones: PathBuf,
}

/// Per-rate acoustic resources under `<model_dir>/<rate>/`.
#[derive(Debug, Clone, PartialEq)]
pub struct AcousticModel {
    pub sample_rate_hz: u32,
    pub config: PathBuf,
    pub hmmdefs: PathBuf,
    pub macros: PathBuf,
}

impl ModelLayout {
    pub fn resolve(config: &AlignerConfig) -> Result<Self, AlignmentError> {
        let model_dir = std::path::absolute(&config.model_dir)
            .map_err(|e| AlignmentError::io("resolve model directory", e))?;
        let pick = |custom: &Option<PathBuf>, default_name: &str| -> Result<PathBuf, AlignmentError> {
            match custom {
                Some(path) => std::path::absolute(path)
                    .map_err(|e| AlignmentError::io("resolve model resource", e)),
                None => Ok(model_dir.join(default_name)),
            }
        };
        Ok(Self {
            dictionary: pick(&config.dict_path, "dict")?,
            punctuation: pick(&config.puncs_path, "puncs")?,
            monophones: pick(&config.mono_path, "monophones")?,
            model_dir,
        })
    }

    pub fn acoustic_model(&self, sample_rate_hz: u32) -> Result<AcousticModel, AlignmentError> {
        if !is_pretrained_rate(sample_rate_hz) {
            return Err(AlignmentError::UnsupportedSampleRate {
                rate_hz: sample_rate_hz,
            });
        }
        let dir = self.model_dir.join(sample_rate_hz.to_string());
        Ok(AcousticModel {
            sample_rate_hz,
            config: dir.join("config"),
            hmmdefs: dir.join("hmmdefs"),
            macros: dir.join("macros"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligner_config_default() {
        let config = AlignerConfig::default();
        assert_eq!(config.model_dir, PathBuf::from("model"));
        assert!(config.dict_path.is_none());
        assert_eq!(config.auto_resample_rate_hz, 8_000);
        assert_eq!(config.tools.hvite, "HVite");
        assert_eq!(config.pruning, [10_000.0; 3]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_unsupported_rate() {
        let config = AlignerConfig {
            auto_resample_rate_hz: 22_050,
            ..AlignerConfig::default()
        };
        match config.validate() {
            Err(AlignmentError::UnsupportedSampleRate { rate_hz }) => assert_eq!(rate_hz, 22_050),
            other => panic!("expected UnsupportedSampleRate, got {other:?}"),
        }
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{
            "model_dir": "/opt/htk-model",
            "auto_resample_rate_hz": 16000,
            "tools": { "hvite": "/usr/local/bin/HVite" }
        }"#;
        let config: AlignerConfig = serde_json::from_str(json).expect("valid config json");
        assert_eq!(config.model_dir, PathBuf::from("/opt/htk-model"));
        assert_eq!(config.auto_resample_rate_hz, 16_000);
        assert_eq!(config.tools.hvite, "/usr/local/bin/HVite");
        assert_eq!(config.tools.sox, "sox");
        assert_eq!(config.pruning, AlignerConfig::DEFAULT_PRUNING);
    }

    #[test]
    fn layout_uses_model_dir_unless_overridden() {
        let config = AlignerConfig {
            model_dir: PathBuf::from("/opt/htk-model"),
            puncs_path: Some(PathBuf::from("/etc/puncs")),
            ..AlignerConfig::default()
        };
        let layout = ModelLayout::resolve(&config).unwrap();
        assert_eq!(layout.dictionary, PathBuf::from("/opt/htk-model/dict"));
        assert_eq!(layout.punctuation, PathBuf::from("/etc/puncs"));
        assert_eq!(layout.monophones, PathBuf::from("/opt/htk-model/monophones"));
    }

    #[test]
    fn acoustic_model_paths_follow_rate() {
        let layout = ModelLayout::resolve(&AlignerConfig {
            model_dir: PathBuf::from("/opt/htk-model"),
            ..AlignerConfig::default()
        })
        .unwrap();
        let acoustic = layout.acoustic_model(16_000).unwrap();
        assert_eq!(acoustic.config, PathBuf::from("/opt/htk-model/16000/config"));
        assert_eq!(acoustic.hmmdefs, PathBuf::from("/opt/htk-model/16000/hmmdefs"));
        assert_eq!(acoustic.macros, PathBuf::from("/opt/htk-model/16000/macros"));
        assert!(layout.acoustic_model(44_100).is_err());
    }
}
