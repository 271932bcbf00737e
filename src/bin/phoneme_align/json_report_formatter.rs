use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use htk_phoneme_aligner::Report;

/// Pretty JSON with a trailing newline, to any sink.
fn write_json<W: Write>(mut sink: W, report: &Report) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut sink, report)?;
    sink.write_all(b"\n")?;
    sink.flush()
}

pub fn write_report(path: &Path, report: &Report) -> Result<(), String> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .map_err(|err| format!("Failed to create report directory '{}': {err}", dir.display()))?;
    }
    let file = File::create(path)
        .map_err(|err| format!("Failed to create report file '{}': {err}", path.display()))?;
    write_json(BufWriter::new(file), report)
        .map_err(|err| format!("Failed to write report '{}': {err}", path.display()))
}

pub fn print_report(report: &Report) -> Result<(), String> {
    write_json(io::stdout().lock(), report).map_err(|err| format!("Failed to print report: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use htk_phoneme_aligner::{build_report, Meta, PhonemeDuration, UtteranceReport};

    fn report() -> Report {
        build_report(
            Meta {
                generated_at: "2026-01-01T00:00:00+00:00".to_string(),
                model_dir: "/opt/htk-model".to_string(),
                auto_resample_rate_hz: 8_000,
                utterance_count: 0,
            },
            vec![UtteranceReport::new(
                "000",
                "春",
                vec![PhonemeDuration {
                    unit: "chun".to_string(),
                    begin: 0.1,
                    end: 0.35,
                }],
            )],
        )
    }

    #[test]
    fn json_ends_with_newline_and_parses_back() {
        let mut out = Vec::new();
        write_json(&mut out, &report()).expect("write json");
        assert_eq!(out.last(), Some(&b'\n'));
        let value: serde_json::Value = serde_json::from_slice(&out).expect("valid json");
        assert_eq!(value["meta"]["utterance_count"], 1);
        assert_eq!(value["utterances"][0]["phonemes"][0]["unit"], "chun");
    }

    #[test]
    fn write_report_creates_missing_directories() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("reports/nested/out.json");
        write_report(&path, &report()).expect("write report");
        assert!(path.exists());
    }
}
