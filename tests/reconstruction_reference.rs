use std::env;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use htk_phoneme_aligner::{reconstruct, AlignmentError, PhonemeDuration, ReferenceTranscript};
use libtest_mimic::{Arguments, Failed, Trial};
use serde::Deserialize;

const DEFAULT_DELTA_S: f64 = 1e-9;
const SUITE_NAME: &str = "reconstruction_matches_reference";

#[derive(Debug, Deserialize)]
struct ReconstructionCase {
    id: String,
    /// Reference MLF, one entry per line.
    reference: Vec<String>,
    /// Raw aligner output, one entry per line.
    raw: Vec<String>,
    #[serde(default)]
    expected: Vec<ExpectedPhoneme>,
    #[serde(default)]
    expected_error: Option<ExpectedError>,
}

#[derive(Debug, Deserialize)]
struct ExpectedPhoneme {
    unit: String,
    begin: f64,
    end: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ExpectedError {
    CountMismatch,
    Malformed,
}

fn main() {
    let args = Arguments::from_args();
    let repo_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let delta_s = env_f64("PHONEME_ALIGN_IT_DELTA_S", DEFAULT_DELTA_S);

    let cases = match load_all_cases(&repo_root.join("tests/fixtures/reconstruction")) {
        Ok(cases) => cases,
        Err(err) => {
            run_setup_failure(&args, err);
            return;
        }
    };
    if cases.is_empty() {
        run_setup_failure(
            &args,
            "No reconstruction fixtures found under tests/fixtures/reconstruction.".to_string(),
        );
        return;
    }

    let tests = cases
        .into_iter()
        .map(|case| {
            let test_name = format!("{SUITE_NAME}::case::{}", case.id);
            Trial::test(test_name, move || run_case(&case, delta_s).map_err(Failed::from))
        })
        .collect();

    libtest_mimic::run(&args, tests).exit();
}

fn run_setup_failure(args: &Arguments, message: String) {
    let test = Trial::test(format!("{SUITE_NAME}::setup"), move || {
        Err(Failed::from(message))
    });
    libtest_mimic::run(args, vec![test]).exit();
}

fn run_case(case: &ReconstructionCase, delta_s: f64) -> Result<(), String> {
    let reference = ReferenceTranscript::parse(&case.reference.join("\n"))
        .map_err(|err| format!("{}: invalid reference MLF: {err}", case.id))?;
    let result = reconstruct(&case.raw, &reference);

    match (case.expected_error, result) {
        (None, Ok(durations)) => compare_durations(case, &durations.collect::<Vec<_>>(), delta_s),
        (None, Err(err)) => Err(format!("{}: reconstruct() failed: {err}", case.id)),
        (Some(expected), Ok(durations)) => Err(format!(
            "{}: expected {expected:?} error, got {} phonemes",
            case.id,
            durations.count()
        )),
        (Some(expected), Err(err)) => {
            let matched = matches!(
                (expected, &err),
                (ExpectedError::CountMismatch, AlignmentError::AlignmentCountMismatch { .. })
                    | (ExpectedError::Malformed, AlignmentError::MalformedAlignment { .. })
            );
            if matched {
                Ok(())
            } else {
                Err(format!("{}: expected {expected:?} error, got: {err}", case.id))
            }
        }
    }
}

fn compare_durations(
    case: &ReconstructionCase,
    observed: &[PhonemeDuration],
    delta_s: f64,
) -> Result<(), String> {
    if observed.len() != case.expected.len() {
        return Err(format!(
            "{}: phoneme count mismatch (expected {}, got {})",
            case.id,
            case.expected.len(),
            observed.len()
        ));
    }

    for (idx, (expected, observed)) in case.expected.iter().zip(observed).enumerate() {
        if observed.unit != expected.unit {
            return Err(format!(
                "{}: unit mismatch at index {idx} (expected '{}', got '{}')",
                case.id, expected.unit, observed.unit
            ));
        }
        let begin_diff = (observed.begin - expected.begin).abs();
        let end_diff = (observed.end - expected.end).abs();
        if begin_diff > delta_s || end_diff > delta_s {
            return Err(format!(
                "{}: '{}' at index {idx} is [{}, {}], expected [{}, {}]",
                case.id, expected.unit, observed.begin, observed.end, expected.begin, expected.end
            ));
        }
        if observed.end < observed.begin {
            return Err(format!("{}: '{}' at index {idx} ends before it begins", case.id, observed.unit));
        }
    }

    Ok(())
}

fn load_all_cases(dir: &Path) -> Result<Vec<ReconstructionCase>, String> {
    let entries = fs::read_dir(dir)
        .map_err(|err| format!("Failed to list fixtures in '{}': {err}", dir.display()))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|err| format!("Failed to list fixtures in '{}': {err}", dir.display()))?
            .path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();
    paths.iter().map(|path| load_case(path)).collect()
}

fn load_case(path: &Path) -> Result<ReconstructionCase, String> {
    let file = File::open(path)
        .map_err(|err| format!("Failed to open fixture '{}': {err}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|err| format!("Failed to parse fixture '{}': {err}", path.display()))
}

fn env_f64(name: &str, default: f64) -> f64 {
    match env::var(name) {
        Ok(value) => value.trim().parse::<f64>().unwrap_or_else(|err| {
            panic!(
                "Invalid value for {}='{}' (expected f64): {}",
                name, value, err
            )
        }),
        Err(_) => default,
    }
}
