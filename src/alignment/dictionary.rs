use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::alignment::reading::readings;
use crate::error::AlignmentError;

/// Accepted pronunciation units, in load order.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: Vec<String>,
    members: HashSet<String>,
}

impl Dictionary {
    /// Reads a pronunciation dictionary; the first whitespace-delimited
    /// field of each line is the surface form.
    pub fn load(path: &Path) -> Result<Self, AlignmentError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| AlignmentError::io("read pronunciation dictionary", e))?;
        Ok(Self::parse(&data))
    }

    pub fn parse(data: &str) -> Self {
        Self::from_entries(
            data.lines()
                .filter_map(|line| line.split_whitespace().next())
                .map(str::to_string),
        )
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dictionary = Self::default();
        dictionary.extend(entries);
        dictionary
    }

    pub fn contains(&self, surface: &str) -> bool {
        self.members.contains(surface)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    // Append-only; only the lexicon may grow a dictionary it indexes.
    pub(crate) fn extend<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for entry in entries {
            let entry = entry.into();
            if entry.is_empty() || self.members.contains(&entry) {
                continue;
            }
            self.members.insert(entry.clone());
            self.entries.push(entry);
        }
    }
}

/// Reading tuple to canonical surface form. Later dictionary entries win
/// over earlier ones with the same reading.
#[derive(Debug, Clone, Default)]
pub struct ReadingIndex {
    by_reading: HashMap<Vec<String>, String>,
}

impl ReadingIndex {
    pub fn build(dictionary: &Dictionary) -> Self {
        let by_reading = dictionary
            .iter()
            .map(|surface| (readings(surface), surface.to_string()))
            .collect();
        Self { by_reading }
    }

    pub fn lookup(&self, reading: &[String]) -> Option<&str> {
        self.by_reading.get(reading).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_reading.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_reading.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PunctuationSet {
    symbols: HashSet<String>,
}

impl PunctuationSet {
    /// One symbol per line, surrounding whitespace trimmed.
    pub fn load(path: &Path) -> Result<Self, AlignmentError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| AlignmentError::io("read punctuation list", e))?;
        Ok(Self::parse(&data))
    }

    pub fn parse(data: &str) -> Self {
        Self::from_symbols(data.lines().map(str::trim))
    }

    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        set.extend(symbols);
        set
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn extend<I, S>(&mut self, symbols: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.symbols.extend(
            symbols
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty()),
        );
    }
}

/// Dictionary, its reading index and the punctuation filter.
///
/// The reading index is rebuilt by every method that changes the
/// dictionary, so lookups never see a dictionary state other than the
/// current one.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    dictionary: Dictionary,
    reading_index: ReadingIndex,
    punctuation: PunctuationSet,
}

impl Lexicon {
    pub fn load(dict_path: &Path, puncs_path: &Path) -> Result<Self, AlignmentError> {
        let lexicon = Self::from_parts(Dictionary::load(dict_path)?, PunctuationSet::load(puncs_path)?);
        tracing::info!(
            dictionary = %dict_path.display(),
            entries = lexicon.dictionary.len(),
            readings = lexicon.reading_index.len(),
            punctuation = lexicon.punctuation.len(),
            "lexicon loaded"
        );
        Ok(lexicon)
    }

    pub fn from_parts(dictionary: Dictionary, punctuation: PunctuationSet) -> Self {
        let reading_index = ReadingIndex::build(&dictionary);
        Self {
            dictionary,
            reading_index,
            punctuation,
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn reading_index(&self) -> &ReadingIndex {
        &self.reading_index
    }

    pub fn punctuation(&self) -> &PunctuationSet {
        &self.punctuation
    }

    pub fn set_dictionary(&mut self, dictionary: Dictionary) {
        self.dictionary = dictionary;
        self.reading_index = ReadingIndex::build(&self.dictionary);
    }

    pub fn extend_dictionary<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dictionary.extend(entries);
        self.reading_index = ReadingIndex::build(&self.dictionary);
    }

    pub fn set_punctuation(&mut self, punctuation: PunctuationSet) {
        self.punctuation = punctuation;
    }

    pub fn extend_punctuation<I, S>(&mut self, symbols: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.punctuation.extend(symbols);
    }
}
