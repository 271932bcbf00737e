use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, ValueEnum};
use htk_phoneme_aligner::{
    build_report, AlignerConfig, AlignmentInput, ForcedAligner, ForcedAlignerBuilder, Meta,
    PhonemeDuration, UtteranceReport,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[path = "phoneme_align/json_report_formatter.rs"]
mod json_report_formatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// `reading begin end` per line.
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "phoneme_align")]
#[command(about = "Phoneme-level forced alignment of Mandarin speech with HTK")]
struct Args {
    #[arg(long, env = "PHONEME_ALIGN_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, env = "PHONEME_ALIGN_MODEL_DIR")]
    model_dir: Option<PathBuf>,
    #[arg(long, env = "PHONEME_ALIGN_SAMPLE_RATE")]
    sample_rate: Option<u32>,
    #[arg(long, conflicts_with_all = ["text_file", "cases_file"])]
    text: Option<String>,
    #[arg(long, conflicts_with = "cases_file")]
    text_file: Option<PathBuf>,
    #[arg(long)]
    audio: Option<PathBuf>,
    /// JSON Lines file of `{"id", "text", "audio_path"}` records.
    #[arg(long, env = "PHONEME_ALIGN_CASES_FILE")]
    cases_file: Option<PathBuf>,
    /// Extra dictionary entries, one surface form per line.
    #[arg(long)]
    extra_dict: Option<PathBuf>,
    /// Extra punctuation symbols, one per line.
    #[arg(long)]
    extra_puncs: Option<PathBuf>,
    #[arg(long, env = "PHONEME_ALIGN_FORMAT", value_enum, default_value_t = OutputFormat::Text)]
    output_format: OutputFormat,
    #[arg(long, env = "PHONEME_ALIGN_OUT")]
    out: Option<PathBuf>,
    /// Print the reference transcript and exit without aligning.
    #[arg(long, default_value_t = false)]
    print_reference: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct Case {
    id: String,
    text: String,
    audio_path: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("phoneme_align: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();
    let config = load_config(&args)?;
    let mut aligner = ForcedAlignerBuilder::new(config.clone())
        .build()
        .map_err(|err| format!("Failed to build aligner: {err}"))?;

    if let Some(path) = args.extra_dict.as_ref() {
        aligner.extend_dictionary(read_lines(path)?);
    }
    if let Some(path) = args.extra_puncs.as_ref() {
        aligner.extend_punctuation(read_lines(path)?);
    }

    let cases = load_cases(&args)?;
    if cases.is_empty() {
        return Err("No cases to align.".to_string());
    }

    if args.print_reference {
        for case in &cases {
            let reference = aligner
                .reference_for(&case.text)
                .map_err(|err| format!("{}: {err}", case.id))?;
            print!("{}", reference.render());
        }
        return Ok(());
    }

    let utterances = align_cases(&aligner, &cases)?;
    match args.output_format {
        OutputFormat::Text => {
            let mut out = String::new();
            for utterance in &utterances {
                if cases.len() > 1 {
                    out.push_str(&format!("# {}\n", utterance.id));
                }
                for phoneme in &utterance.phonemes {
                    out.push_str(&format_phoneme(phoneme));
                    out.push('\n');
                }
            }
            write_output(args.out.as_deref(), &out)
        }
        OutputFormat::Json => {
            let report = build_report(
                Meta {
                    generated_at: Utc::now().to_rfc3339(),
                    model_dir: aligner.layout().model_dir.display().to_string(),
                    auto_resample_rate_hz: aligner.auto_resample_rate_hz(),
                    utterance_count: 0,
                },
                utterances,
            );
            match args.out.as_deref() {
                Some(path) => {
                    json_report_formatter::write_report(path, &report)?;
                    println!("{}", path.display());
                    Ok(())
                }
                None => json_report_formatter::print_report(&report),
            }
        }
    }
}

fn load_config(args: &Args) -> Result<AlignerConfig, String> {
    let mut config = match args.config.as_ref() {
        Some(path) => AlignerConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => AlignerConfig::default(),
    };
    if let Some(model_dir) = args.model_dir.as_ref() {
        config.model_dir = model_dir.clone();
    }
    if let Some(rate) = args.sample_rate {
        config.auto_resample_rate_hz = rate;
    }
    Ok(config)
}

fn load_cases(args: &Args) -> Result<Vec<Case>, String> {
    if let Some(path) = args.cases_file.as_ref() {
        return load_cases_file(path);
    }
    let text = match (args.text.as_ref(), args.text_file.as_ref()) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .map_err(|err| format!("Failed to read text file '{}': {err}", path.display()))?,
        (None, None) => return Err("One of --text, --text-file or --cases-file is required.".to_string()),
    };
    let audio_path = match args.audio.as_ref() {
        Some(path) => path.clone(),
        None if args.print_reference => PathBuf::new(),
        None => return Err("--audio is required unless --cases-file is given.".to_string()),
    };
    Ok(vec![Case {
        id: "utterance".to_string(),
        text,
        audio_path,
    }])
}

fn load_cases_file(path: &Path) -> Result<Vec<Case>, String> {
    let file = fs::File::open(path)
        .map_err(|err| format!("Failed to open cases file '{}': {err}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut cases = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|err| format!("Failed to read cases file '{}': {err}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let mut case: Case = serde_json::from_str(&line).map_err(|err| {
            format!("Invalid case on line {} of '{}': {err}", idx + 1, path.display())
        })?;
        if case.audio_path.is_relative() {
            case.audio_path = base_dir.join(&case.audio_path);
        }
        cases.push(case);
    }
    Ok(cases)
}

fn align_cases(aligner: &ForcedAligner, cases: &[Case]) -> Result<Vec<UtteranceReport>, String> {
    let progress = if cases.len() > 1 {
        let bar = ProgressBar::new(cases.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let mut utterances = Vec::with_capacity(cases.len());
    for case in cases {
        progress.set_message(case.id.clone());
        if !case.audio_path.exists() {
            progress.abandon();
            return Err(format!(
                "{}: audio file '{}' does not exist",
                case.id,
                case.audio_path.display()
            ));
        }
        let input = AlignmentInput {
            text: case.text.clone(),
            media_path: case.audio_path.clone(),
        };
        let phonemes: Vec<PhonemeDuration> = match aligner.align(&input) {
            Ok(durations) => durations.collect(),
            Err(err) => {
                progress.abandon();
                return Err(format!("{}: align() failed: {err}", case.id));
            }
        };
        utterances.push(UtteranceReport::new(case.id.clone(), case.text.clone(), phonemes));
        progress.inc(1);
    }
    progress.finish_with_message("done");
    Ok(utterances)
}

fn format_phoneme(phoneme: &PhonemeDuration) -> String {
    format!("{} {} {}", phoneme.unit, phoneme.begin, phoneme.end)
}

fn read_lines(path: &Path) -> Result<Vec<String>, String> {
    let data = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
    Ok(data
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect())
}

fn write_output(path: Option<&Path>, content: &str) -> Result<(), String> {
    match path {
        Some(path) => fs::write(path, content)
            .map_err(|err| format!("Failed to write '{}': {err}", path.display())),
        None => {
            print!("{content}");
            Ok(())
        }
    }
}
