//! Detokenizer for the Rebeca dialects
//!
//! Tokens carry their exact source slice, so detokenizing is plain concatenation. It is the
//! check behind total lexical coverage: `detokenize(&tokenize(s, d)) == s` for every `s`.

use crate::lexer::tokens::Token;

/// Detokenize a stream of tokens into a string
pub fn detokenize(tokens: &[Token<'_>]) -> String {
    let mut result = String::with_capacity(tokens.iter().map(|t| t.text.len()).sum());
    for token in tokens {
        result.push_str(token.text);
    }
    result
}
