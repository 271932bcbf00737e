//! Collapse HVite's state-level alignment back onto the reference units.
//!
//! With `-m`, HVite writes one record per HMM state. The first state of a
//! model carries the model name (5 fields: start, end, state, score,
//! model); the remaining states of the same model omit it (4 fields). A
//! lone `.` closes the label list. Times are 100 ns ticks.

use crate::alignment::reading::unit_reading;
use crate::alignment::transcript::{ReferenceTranscript, SILENCE};
use crate::error::AlignmentError;
use crate::types::PhonemeDuration;

const TICKS_PER_SECOND: f64 = 10_000_000.0;
const HEADER_LINES: usize = 2;
const FOOTER_LINES: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconstructionState {
    /// Expecting the first record of the first unit.
    Start,
    /// Inside a unit; continuation or new-unit records may follow.
    Continue,
    /// Closing marker seen; everything after it is ignored.
    Done,
}

/// Shape of one body record.
#[derive(Debug, Clone, PartialEq)]
enum Record<'a> {
    Blank,
    Close,
    Continuation { end: f64 },
    Unit { begin: f64, end: f64, label: &'a str },
    Other(usize),
}

fn parse_record(line_number: usize, line: &str) -> Result<Record<'_>, AlignmentError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let time = |idx: usize| -> Result<f64, AlignmentError> {
        let ticks = fields[idx]
            .parse::<f64>()
            .map_err(|e| AlignmentError::malformed(line_number, line, format!("bad time field: {e}")))?;
        if !ticks.is_finite() {
            return Err(AlignmentError::malformed(line_number, line, "non-finite time field"));
        }
        Ok(ticks / TICKS_PER_SECOND)
    };
    Ok(match fields.len() {
        0 => Record::Blank,
        1 => Record::Close,
        4 => Record::Continuation { end: time(1)? },
        5 => Record::Unit {
            begin: time(0)?,
            end: time(1)?,
            label: fields[4],
        },
        n => Record::Other(n),
    })
}

/// Single transition of the collapsing state machine.
#[allow(clippy::neg_cmp_op_on_partial_ord)]
fn transition(
    state: ReconstructionState,
    record: Record<'_>,
    line_number: usize,
    line: &str,
    durations: &mut Vec<PhonemeDuration>,
) -> Result<ReconstructionState, AlignmentError> {
    use ReconstructionState::*;

    match (state, record) {
        (Done, _) => Ok(Done),
        (state, Record::Blank) => Ok(state),
        (Start | Continue, Record::Unit { begin, end, label }) => {
            if !(begin <= end) {
                return Err(AlignmentError::malformed(line_number, line, "segment ends before it begins"));
            }
            durations.push(PhonemeDuration {
                unit: label.to_string(),
                begin,
                end,
            });
            Ok(Continue)
        }
        (Continue, Record::Continuation { end }) => {
            // Continue is only reachable after a push.
            let Some(last) = durations.last_mut() else {
                return Err(AlignmentError::malformed(line_number, line, "continuation without a unit"));
            };
            if !(last.begin <= end) {
                return Err(AlignmentError::malformed(line_number, line, "segment ends before its unit begins"));
            }
            last.end = end;
            Ok(Continue)
        }
        (Continue, Record::Close) => Ok(Done),
        (Start, Record::Continuation { .. } | Record::Close) => Err(AlignmentError::malformed(
            line_number,
            line,
            "expected a 5-field unit record",
        )),
        (_, Record::Other(n)) => Err(AlignmentError::malformed(
            line_number,
            line,
            format!("unexpected record with {n} fields"),
        )),
    }
}

/// Runs the state machine over body lines, one duration per unit.
#[derive(Debug)]
pub struct SegmentCollapser {
    state: ReconstructionState,
    durations: Vec<PhonemeDuration>,
}

impl Default for SegmentCollapser {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentCollapser {
    pub fn new() -> Self {
        Self {
            state: ReconstructionState::Start,
            durations: Vec::new(),
        }
    }

    pub fn state(&self) -> ReconstructionState {
        self.state
    }

    /// `line_number` is 1-based within the raw output and only used for
    /// error reporting.
    pub fn feed(&mut self, line_number: usize, line: &str) -> Result<(), AlignmentError> {
        if self.state == ReconstructionState::Done {
            return Ok(());
        }
        let record = parse_record(line_number, line)?;
        self.state = transition(self.state, record, line_number, line, &mut self.durations)?;
        Ok(())
    }

    pub fn finish(self) -> Vec<PhonemeDuration> {
        self.durations
    }
}

/// Body of the raw output: header and footer stripped.
pub fn alignment_body<S: AsRef<str>>(raw_alignment: &[S]) -> &[S] {
    if raw_alignment.len() <= HEADER_LINES + FOOTER_LINES {
        return &[];
    }
    &raw_alignment[HEADER_LINES..raw_alignment.len() - FOOTER_LINES]
}

/// One duration per aligned unit, still carrying the aligner's labels.
pub fn collapse_segments<S: AsRef<str>>(
    raw_alignment: &[S],
) -> Result<Vec<PhonemeDuration>, AlignmentError> {
    let mut collapser = SegmentCollapser::new();
    for (offset, line) in alignment_body(raw_alignment).iter().enumerate() {
        collapser.feed(HEADER_LINES + offset + 1, line.as_ref())?;
    }
    Ok(collapser.finish())
}

/// Reconcile aligner output with the reference it was given.
///
/// Fails when the number of aligned units differs from the number of
/// reference symbols (silences included). The returned iterator relabels
/// each interval with its reference symbol, skips silences and reports
/// the reading of each remaining unit.
pub fn reconstruct<S: AsRef<str>>(
    raw_alignment: &[S],
    reference: &ReferenceTranscript,
) -> Result<PhonemeDurations, AlignmentError> {
    let durations = collapse_segments(raw_alignment)?;
    let expected = reference.symbols().len();
    if durations.len() != expected {
        return Err(AlignmentError::AlignmentCountMismatch {
            expected,
            actual: durations.len(),
        });
    }
    tracing::debug!(
        segments = durations.len(),
        units = reference.unit_count(),
        "reconstruction: aligner output reconciled"
    );
    Ok(PhonemeDurations {
        inner: durations
            .into_iter()
            .zip(reference.symbols().to_vec())
            .collect::<Vec<_>>()
            .into_iter(),
    })
}

/// Lazily relabelled, silence-free phoneme durations.
#[derive(Debug, Clone)]
pub struct PhonemeDurations {
    inner: std::vec::IntoIter<(PhonemeDuration, String)>,
}

impl PhonemeDurations {
    pub fn empty() -> Self {
        Self {
            inner: Vec::new().into_iter(),
        }
    }
}

impl Iterator for PhonemeDurations {
    type Item = PhonemeDuration;

    fn next(&mut self) -> Option<Self::Item> {
        for (duration, symbol) in self.inner.by_ref() {
            if symbol == SILENCE {
                continue;
            }
            return Some(PhonemeDuration {
                unit: unit_reading(&symbol),
                ..duration
            });
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}
