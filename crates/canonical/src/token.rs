use serde::{Deserialize, Serialize};

/// A token kept by the tokenizer.
///
/// `index` is the position in the kept token sequence, which is the
/// coordinate system used by shingle positions and match highlighting.
/// `start`/`end` are UTF-8 byte offsets into the normalized text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// The token text content.
    pub text: String,
    /// 0-based position among kept tokens.
    pub index: usize,
    /// Byte offset (inclusive) in the normalized text.
    pub start: usize,
    /// Byte offset (exclusive) in the normalized text.
    pub end: usize,
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        self.text.as_str()
    }
}

/// Splits normalized text on whitespace, dropping tokens shorter than
/// `min_token_len` characters.
///
/// Dropped tokens do not consume an index: the returned sequence is densely
/// numbered from 0.
pub fn tokenize(text: &str, min_token_len: usize) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(token_start) = start.take() {
                push_token(&mut tokens, text, token_start, idx, min_token_len);
            }
        } else if start.is_none() {
            start = Some(idx);
        }
    }

    if let Some(token_start) = start {
        push_token(&mut tokens, text, token_start, text.len(), min_token_len);
    }

    tokens
}

fn push_token(tokens: &mut Vec<Token>, text: &str, start: usize, end: usize, min_len: usize) {
    let slice = &text[start..end];
    if slice.chars().count() < min_len {
        return;
    }
    tokens.push(Token {
        text: slice.to_string(),
        index: tokens.len(),
        start,
        end,
    });
}
