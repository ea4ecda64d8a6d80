//! Line normalization and whitespace tokenization.

use crate::redirection::REDIRECT_OPERATOR;

/// Surrounds every redirection character with single spaces so that it always
/// ends up as a token of its own. Nothing else in the line is touched.
pub fn normalize(line: &str) -> String {
    line.replace(REDIRECT_OPERATOR, &format!(" {REDIRECT_OPERATOR} "))
}

/// Splits a normalized line into maximal runs of non-whitespace characters.
///
/// An empty or all-whitespace line yields no tokens.
pub fn split_into_tokens(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_owned).collect()
}

/// Normalizes and tokenizes a raw input line.
pub fn tokenize(raw: &str) -> Vec<String> {
    split_into_tokens(&normalize(raw))
}
