//! HTK master label file (MLF) holding the reference units.

use std::path::Path;

use crate::error::AlignmentError;
use crate::types::ResolvedWord;

pub const MLF_HEADER: &str = "#!MLF!#";
pub const SILENCE: &str = "sp";
pub const TERMINATOR: &str = ".";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTranscript {
    /// Quoted label-file pattern, e.g. `"./utterance.lab"`.
    label: String,
    /// Leading silence, one symbol per unit, trailing silence.
    symbols: Vec<String>,
}

/// Flatten resolved words into one reference symbol per unit, bracketed by
/// silence. `label_stem` must match the feature file's stem for the
/// aligner to pair them.
pub fn write_reference(words: &[ResolvedWord], label_stem: &str) -> ReferenceTranscript {
    let unit_count: usize = words.iter().map(ResolvedWord::len).sum();
    let mut symbols = Vec::with_capacity(unit_count + 2);
    symbols.push(SILENCE.to_string());
    symbols.extend(words.iter().flat_map(|w| w.units.iter().cloned()));
    symbols.push(SILENCE.to_string());
    ReferenceTranscript {
        label: format!("\"./{label_stem}.lab\""),
        symbols,
    }
}

impl ReferenceTranscript {
    /// Parse an MLF back: two header lines and the terminator line are
    /// skipped, each remaining line contributes its first field.
    pub fn parse(text: &str) -> Result<Self, AlignmentError> {
        let lines: Vec<&str> = text.lines().collect();
        if lines.len() < 3 {
            return Err(AlignmentError::invalid_input(format!(
                "reference transcript has {} lines; header, label and terminator are required",
                lines.len()
            )));
        }
        if lines[0].trim() != MLF_HEADER {
            return Err(AlignmentError::invalid_input(format!(
                "reference transcript must start with {MLF_HEADER}, found {:?}",
                lines[0]
            )));
        }
        let symbols = lines[2..lines.len() - 1]
            .iter()
            .map(|line| line.split_whitespace().next().unwrap_or_default().to_string())
            .collect();
        Ok(Self {
            label: lines[1].trim().to_string(),
            symbols,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Number of non-silence symbols.
    pub fn unit_count(&self) -> usize {
        self.symbols.iter().filter(|s| s.as_str() != SILENCE).count()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(MLF_HEADER);
        out.push('\n');
        out.push_str(&self.label);
        out.push('\n');
        for symbol in &self.symbols {
            out.push_str(symbol);
            out.push('\n');
        }
        out.push_str(TERMINATOR);
        out.push('\n');
        out
    }

    pub fn write_to(&self, path: &Path) -> Result<(), AlignmentError> {
        std::fs::write(path, self.render())
            .map_err(|e| AlignmentError::io("write reference transcript", e))
    }
}
