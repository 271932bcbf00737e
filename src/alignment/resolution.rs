use crate::alignment::dictionary::Lexicon;
use crate::alignment::reading::char_reading;
use crate::error::AlignmentError;
use crate::types::{ResolvedWord, Token};

/// Map every character of `token` to a dictionary surface form.
///
/// Characters the dictionary lacks are replaced by the entry sharing
/// their single-character reading (a homophone the acoustic model knows).
/// A character with neither fails the whole token.
pub fn resolve(token: &Token, lexicon: &Lexicon) -> Result<ResolvedWord, AlignmentError> {
    let mut units = Vec::with_capacity(token.as_str().chars().count());
    for c in token.as_str().chars() {
        let mut buf = [0u8; 4];
        let surface = c.encode_utf8(&mut buf);
        if lexicon.dictionary().contains(surface) {
            units.push(surface.to_string());
            continue;
        }

        let reading = char_reading(c);
        match lexicon.reading_index().lookup(std::slice::from_ref(&reading)) {
            Some(substitute) => {
                tracing::debug!(
                    character = %c,
                    reading = reading.as_str(),
                    substitute,
                    "resolution: substituted homophone"
                );
                units.push(substitute.to_string());
            }
            None => {
                return Err(AlignmentError::UnresolvedPronunciation {
                    character: c,
                    word: token.as_str().to_string(),
                })
            }
        }
    }
    Ok(ResolvedWord { units })
}

pub fn resolve_all(tokens: &[Token], lexicon: &Lexicon) -> Result<Vec<ResolvedWord>, AlignmentError> {
    tokens.iter().map(|token| resolve(token, lexicon)).collect()
}
