use crate::alignment::dictionary::Lexicon;
use crate::pipeline::traits::WordBreaker;
use crate::types::Token;

/// Split `text` into dictionary-aware tokens.
///
/// Words from the general word breaker survive whole only when the
/// dictionary knows them; everything else falls back to one token per
/// character. Punctuation and whitespace never reach the output.
pub fn segment(text: &str, word_breaker: &dyn WordBreaker, lexicon: &Lexicon) -> Vec<Token> {
    let mut tokens = Vec::new();
    for word in word_breaker.cut(text) {
        if lexicon.dictionary().contains(word) {
            tokens.push(Token::new(word));
        } else {
            tokens.extend(word.chars().map(|c| Token::new(c.to_string())));
        }
    }
    tokens.retain(|token| keep_token(token.as_str(), lexicon));

    tracing::debug!(
        tokens = ?tokens.iter().map(Token::as_str).collect::<Vec<_>>(),
        "segmentation: tokens"
    );
    tokens
}

fn keep_token(token: &str, lexicon: &Lexicon) -> bool {
    !token.trim().is_empty() && !lexicon.punctuation().contains(token)
}
