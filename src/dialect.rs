//! Dialect configuration for the two supported languages
//!
//!     Rebeca model files (`.rebeca`) and Rebeca property files (`.property`) share their
//!     lexical structure: comments, string and char literals, punctuation and operators are
//!     identical. They differ in two places only:
//!
//!         - the keyword set, which decides whether a word lexes as Keyword or Identifier
//!         - the spacing around `:`. Model files bind instances as `Foo f(a):(b);` and keep the
//!           colon bare, property files label definitions as `Safety: p0 && p1;`
//!
//!     A [Dialect] is a plain `Copy` value. The tables behind it are immutable statics built
//!     once, so formatting passes on different threads can share them freely.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// How a dialect spaces the `:` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColonSpacing {
    /// `a:b`
    Tight,
    /// `a: b`
    SpaceAfter,
}

/// Static tables describing one dialect.
#[derive(Debug)]
pub struct DialectSpec {
    name: &'static str,
    keywords: HashSet<&'static str>,
    brace_joiners: HashSet<&'static str>,
    paren_spaced: HashSet<&'static str>,
    colon: ColonSpacing,
}

impl DialectSpec {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.contains(word)
    }

    /// Keywords that stay on the line of a preceding `}` (`} else {`).
    pub fn is_brace_joiner(&self, word: &str) -> bool {
        self.brace_joiners.contains(word)
    }

    /// Keywords separated from a following `(` by one space (`if (`, `while (`).
    pub fn spaces_before_paren(&self, word: &str) -> bool {
        self.paren_spaced.contains(word)
    }

    pub fn colon_spacing(&self) -> ColonSpacing {
        self.colon
    }
}

const COMMON_KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "default", "break", "continue",
    "return", "true", "false", "null", "int", "byte", "short", "boolean", "double", "float",
    "char", "string", "void", "try", "catch", "finally", "throw", "synchronized",
];

const MODEL_KEYWORDS: &[&str] = &[
    "reactiveclass", "knownrebecs", "statevars", "msgsrv", "main", "self", "sender", "env",
    "after", "deadline", "delay", "now", "priority", "globalvariables", "recordclass",
    "interface", "extends", "implements", "abstract", "final", "private", "public",
    "protected", "static", "new", "import", "package", "instanceof", "list", "set", "map",
];

const PROPERTY_KEYWORDS: &[&str] = &[
    "property", "define", "Assertion", "Safety", "Liveness", "LTL", "CTL", "TCTL", "G", "F",
    "X", "U", "AG", "AF", "EG", "EF", "AX", "EX",
];

const BRACE_JOINERS: &[&str] = &["else", "catch", "finally"];

const PAREN_SPACED: &[&str] = &["if", "for", "while", "switch", "catch", "synchronized"];

fn build(name: &'static str, extra: &[&'static str], colon: ColonSpacing) -> DialectSpec {
    let keywords: HashSet<&'static str> =
        COMMON_KEYWORDS.iter().chain(extra).copied().collect();
    let only_keywords = |words: &[&'static str]| -> HashSet<&'static str> {
        words
            .iter()
            .copied()
            .filter(|w| keywords.contains(w))
            .collect()
    };
    let brace_joiners = only_keywords(BRACE_JOINERS);
    let paren_spaced = only_keywords(PAREN_SPACED);
    DialectSpec {
        name,
        keywords,
        brace_joiners,
        paren_spaced,
        colon,
    }
}

static MODEL: Lazy<DialectSpec> =
    Lazy::new(|| build("model", MODEL_KEYWORDS, ColonSpacing::Tight));

static PROPERTY: Lazy<DialectSpec> =
    Lazy::new(|| build("property", PROPERTY_KEYWORDS, ColonSpacing::SpaceAfter));

/// One of the two supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    /// Reactive-object model files.
    #[default]
    Model,
    /// Property / specification files.
    Property,
}

impl Dialect {
    pub const ALL: [Dialect; 2] = [Dialect::Model, Dialect::Property];

    pub fn spec(self) -> &'static DialectSpec {
        match self {
            Dialect::Model => &MODEL,
            Dialect::Property => &PROPERTY,
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name()
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a dialect name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dialect '{0}' (expected 'model' or 'property')")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "model" | "rebeca" => Ok(Dialect::Model),
            "property" | "prop" => Ok(Dialect::Property),
            other => Err(UnknownDialect(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_sets_differ() {
        assert!(Dialect::Model.spec().is_keyword("reactiveclass"));
        assert!(!Dialect::Property.spec().is_keyword("reactiveclass"));
        assert!(Dialect::Property.spec().is_keyword("Safety"));
        assert!(!Dialect::Model.spec().is_keyword("Safety"));
        for dialect in Dialect::ALL {
            assert!(dialect.spec().is_keyword("if"));
        }
    }

    #[test]
    fn test_colon_rules() {
        assert_eq!(Dialect::Model.spec().colon_spacing(), ColonSpacing::Tight);
        assert_eq!(
            Dialect::Property.spec().colon_spacing(),
            ColonSpacing::SpaceAfter
        );
    }

    #[test]
    fn test_brace_joiners_are_keywords() {
        let spec = Dialect::Model.spec();
        assert!(spec.is_brace_joiner("else"));
        assert!(spec.is_brace_joiner("catch"));
        assert!(!spec.is_brace_joiner("while"));
        assert!(!spec.is_brace_joiner("msgsrv"));
    }

    #[test]
    fn test_paren_spacing() {
        let spec = Dialect::Model.spec();
        assert!(spec.spaces_before_paren("if"));
        assert!(spec.spaces_before_paren("while"));
        assert!(!spec.spaces_before_paren("msgsrv"));
        assert!(!spec.spaces_before_paren("return"));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("rebeca".parse::<Dialect>(), Ok(Dialect::Model));
        assert_eq!("Property".parse::<Dialect>(), Ok(Dialect::Property));
        assert!("java".parse::<Dialect>().is_err());
    }
}
