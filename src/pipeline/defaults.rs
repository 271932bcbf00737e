use std::path::{Path, PathBuf};
use std::process::Command;

use jieba_rs::Jieba;

use crate::config::{is_pretrained_rate, AlignerConfig, ExternalTools, ModelLayout};
use crate::error::AlignmentError;
use crate::pipeline::tools::run_tool;
use crate::pipeline::traits::{
    AcousticAligner, AcousticRequest, MediaPreparer, PreparedFeatures, WordBreaker,
};

pub struct JiebaWordBreaker {
    jieba: Jieba,
}

impl JiebaWordBreaker {
    pub fn new() -> Self {
        Self {
            jieba: Jieba::new(),
        }
    }
}

impl Default for JiebaWordBreaker {
    fn default() -> Self {
        Self::new()
    }
}

impl WordBreaker for JiebaWordBreaker {
    fn cut<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.jieba.cut(text, true)
    }
}

/// `ffmpeg` to WAV, `sox` when the rate has no pretrained model, then
/// `HCopy` feature extraction with the rate's config.
pub struct ToolchainMediaPreparer {
    tools: ExternalTools,
}

impl ToolchainMediaPreparer {
    pub fn new(tools: ExternalTools) -> Self {
        Self { tools }
    }
}

impl MediaPreparer for ToolchainMediaPreparer {
    fn prepare(
        &self,
        media_path: &Path,
        workdir: &Path,
        model: &ModelLayout,
        auto_resample_rate_hz: u32,
    ) -> Result<PreparedFeatures, AlignmentError> {
        let wav_path = workdir.join("utterance.wav");
        run_tool(
            &self.tools.ffmpeg,
            Command::new(&self.tools.ffmpeg)
                .arg("-y")
                .arg("-i")
                .arg(media_path)
                .arg(&wav_path),
        )?;

        let native_rate_hz = read_sample_rate(&wav_path)?;
        let (wav_path, sample_rate_hz) = if is_pretrained_rate(native_rate_hz) {
            (wav_path, native_rate_hz)
        } else {
            tracing::warn!(
                native_rate_hz,
                target_rate_hz = auto_resample_rate_hz,
                "no pretrained model for input rate; resampling"
            );
            let resampled = workdir.join("utterance.resampled.wav");
            run_tool(
                &self.tools.sox,
                Command::new(&self.tools.sox)
                    .arg(&wav_path)
                    .arg("-r")
                    .arg(auto_resample_rate_hz.to_string())
                    .arg(&resampled),
            )?;
            (resampled, auto_resample_rate_hz)
        };

        let acoustic = model.acoustic_model(sample_rate_hz)?;
        let feature_path = workdir.join("utterance.plp");
        run_tool(
            &self.tools.hcopy,
            Command::new(&self.tools.hcopy)
                .arg("-C")
                .arg(&acoustic.config)
                .arg(&wav_path)
                .arg(&feature_path),
        )?;

        Ok(PreparedFeatures {
            feature_path,
            sample_rate_hz,
        })
    }
}

pub(crate) fn read_sample_rate(wav_path: &Path) -> Result<u32, AlignmentError> {
    let reader =
        hound::WavReader::open(wav_path).map_err(|e| AlignmentError::wav("read WAV header", e))?;
    Ok(reader.spec().sample_rate)
}

/// `HVite` in forced-alignment mode with state-level output (`-a -m`),
/// run from the request directory.
pub struct HViteAligner {
    program: String,
    pruning: [f64; 3],
}

impl HViteAligner {
    pub const OUTPUT_FILE: &'static str = "utterance.aligned";

    pub fn new(program: impl Into<String>, pruning: [f64; 3]) -> Self {
        Self {
            program: program.into(),
            pruning,
        }
    }

    pub fn from_config(config: &AlignerConfig) -> Self {
        Self::new(config.tools.hvite.clone(), config.pruning)
    }

    fn args(&self, request: &AcousticRequest<'_>) -> Result<Vec<String>, AlignmentError> {
        let mut args: Vec<String> = vec!["-T".into(), "1".into(), "-a".into(), "-m".into(), "-t".into()];
        args.extend(self.pruning.iter().map(|t| format!("{t:.1}")));
        args.push("-I".into());
        args.push(local_name(request.transcript_path)?);
        args.push("-H".into());
        args.push(request.acoustic.macros.display().to_string());
        args.push("-H".into());
        args.push(request.acoustic.hmmdefs.display().to_string());
        args.push("-i".into());
        args.push(format!("./{}", Self::OUTPUT_FILE));
        args.push(request.model.dictionary.display().to_string());
        args.push(request.model.monophones.display().to_string());
        args.push(local_name(request.feature_path)?);
        Ok(args)
    }
}

impl AcousticAligner for HViteAligner {
    fn align(&self, request: &AcousticRequest<'_>) -> Result<Vec<String>, AlignmentError> {
        let args = self.args(request)?;
        run_tool(
            &self.program,
            Command::new(&self.program)
                .args(&args)
                .current_dir(request.workdir),
        )?;

        let output_path: PathBuf = request.workdir.join(Self::OUTPUT_FILE);
        let data = std::fs::read_to_string(&output_path)
            .map_err(|e| AlignmentError::io("read aligner output", e))?;
        Ok(data.lines().map(str::to_string).collect())
    }
}

/// `./<file name>`: the MLF label pattern is matched against the feature
/// path exactly as it is passed, so both stay relative to the workdir.
fn local_name(path: &Path) -> Result<String, AlignmentError> {
    let name = path.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
        AlignmentError::invalid_input(format!("not a file path: {}", path.display()))
    })?;
    Ok(format!("./{name}"))
}
