//! Processing API for Rebeca sources
//!
//! Pairs a processing stage (what to compute) with an output format (how to render it),
//! addressed by strings like `token-simple` or `format-diff`:
//!
//!     - token-simple: one `<kind:text>` item per token, a line break after each newline token
//!     - token-json: the token stream as pretty-printed JSON
//!     - format-text: the formatted source
//!     - format-diff: a unified diff from the source to its formatted form
//!     - format-edits: the replace-range edits as pretty-printed JSON
//!
//! ## Example Usage
//!
//! ```rust
//! use rebeca_fmt::processor::{process_source, ProcessingSpec};
//! use rebeca_fmt::formatter::FormatOptions;
//!
//! let spec = ProcessingSpec::from_string("format-text").unwrap();
//! let out = process_source("x=1;", "x.rebeca", &spec, &FormatOptions::default()).unwrap();
//! assert_eq!(out, "x = 1;\n");
//! ```

use crate::dialect::UnknownDialect;
use crate::formatter::{unified_diff, FormatOptions, Formatter, IndentStyle, InvalidIndent};
use crate::lexer::{tokenize, Token, TokenKind};
use std::fs;
use std::path::{Path, PathBuf};

/// Represents the processing stage (what data to extract)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    Token,
    Format,
}

/// Represents the output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Simple,
    Json,
    Text,
    Diff,
    Edits,
}

/// Represents a complete processing specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingSpec {
    pub stage: ProcessingStage,
    pub format: OutputFormat,
}

impl ProcessingSpec {
    /// Parse a format string like "token-simple" or "format-diff"
    pub fn from_string(format_str: &str) -> Result<Self, ProcessingError> {
        let Some((stage, format)) = format_str.split_once('-') else {
            return Err(ProcessingError::InvalidFormat(format_str.to_string()));
        };

        let stage = match stage {
            "token" => ProcessingStage::Token,
            "format" => ProcessingStage::Format,
            _ => return Err(ProcessingError::InvalidStage(stage.to_string())),
        };

        let format = match format {
            "simple" => OutputFormat::Simple,
            "json" => OutputFormat::Json,
            "text" => OutputFormat::Text,
            "diff" => OutputFormat::Diff,
            "edits" => OutputFormat::Edits,
            _ => return Err(ProcessingError::InvalidFormatType(format.to_string())),
        };

        match (stage, format) {
            (ProcessingStage::Token, OutputFormat::Simple | OutputFormat::Json)
            | (ProcessingStage::Format, OutputFormat::Text | OutputFormat::Diff | OutputFormat::Edits) => {
                Ok(ProcessingSpec { stage, format })
            }
            _ => Err(ProcessingError::InvalidFormatType(format!(
                "'{}' is not available for the {} stage",
                format.name(),
                stage.name()
            ))),
        }
    }

    /// Get all available processing specifications
    pub fn available_specs() -> Vec<ProcessingSpec> {
        vec![
            ProcessingSpec {
                stage: ProcessingStage::Token,
                format: OutputFormat::Simple,
            },
            ProcessingSpec {
                stage: ProcessingStage::Token,
                format: OutputFormat::Json,
            },
            ProcessingSpec {
                stage: ProcessingStage::Format,
                format: OutputFormat::Text,
            },
            ProcessingSpec {
                stage: ProcessingStage::Format,
                format: OutputFormat::Diff,
            },
            ProcessingSpec {
                stage: ProcessingStage::Format,
                format: OutputFormat::Edits,
            },
        ]
    }

    /// The string form accepted by [ProcessingSpec::from_string]
    pub fn name(&self) -> String {
        format!("{}-{}", self.stage.name(), self.format.name())
    }
}

impl ProcessingStage {
    fn name(self) -> &'static str {
        match self {
            ProcessingStage::Token => "token",
            ProcessingStage::Format => "format",
        }
    }
}

impl OutputFormat {
    fn name(self) -> &'static str {
        match self {
            OutputFormat::Simple => "simple",
            OutputFormat::Json => "json",
            OutputFormat::Text => "text",
            OutputFormat::Diff => "diff",
            OutputFormat::Edits => "edits",
        }
    }
}

/// Errors that can occur during processing
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("invalid stage: {0}")]
    InvalidStage(String),
    #[error("invalid format type: {0}")]
    InvalidFormatType(String),
    #[error("invalid range '{0}' (expected OFFSET:LENGTH)")]
    InvalidRange(String),
    #[error(transparent)]
    UnknownDialect(#[from] UnknownDialect),
    #[error(transparent)]
    InvalidIndent(#[from] InvalidIndent),
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Process source text according to the given specification.
///
/// `name` labels the input in diff headers.
pub fn process_source(
    source: &str,
    name: &str,
    spec: &ProcessingSpec,
    options: &FormatOptions,
) -> Result<String, ProcessingError> {
    match spec.stage {
        ProcessingStage::Token => {
            let tokens = tokenize(source, options.dialect);
            format_tokens(&tokens, spec.format)
        }
        ProcessingStage::Format => {
            let formatter = Formatter::new(options.clone());
            match spec.format {
                OutputFormat::Text => Ok(formatter.format(source)),
                OutputFormat::Diff => Ok(unified_diff(source, &formatter.format(source), name)),
                OutputFormat::Edits => {
                    let edits = formatter.format_edits(source);
                    Ok(serde_json::to_string_pretty(&edits)?)
                }
                OutputFormat::Simple | OutputFormat::Json => Err(
                    ProcessingError::InvalidFormatType(spec.format.name().to_string()),
                ),
            }
        }
    }
}

/// Process a Rebeca file according to the given specification
pub fn process_file<P: AsRef<Path>>(
    file_path: P,
    spec: &ProcessingSpec,
    options: &FormatOptions,
) -> Result<String, ProcessingError> {
    let file_path = file_path.as_ref();
    let content = read_source(file_path)?;
    process_source(&content, &file_path.display().to_string(), spec, options)
}

/// Read a source file, attaching the path to any I/O error
pub fn read_source(path: &Path) -> Result<String, ProcessingError> {
    fs::read_to_string(path).map_err(|source| ProcessingError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Format tokens according to the specified format
fn format_tokens(tokens: &[Token], format: OutputFormat) -> Result<String, ProcessingError> {
    match format {
        OutputFormat::Simple => {
            let mut result = String::new();
            for token in tokens {
                result.push_str(&token.to_string());
                if token.kind == TokenKind::Newline {
                    result.push('\n');
                }
            }
            Ok(result)
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(tokens)?),
        other => Err(ProcessingError::InvalidFormatType(format!(
            "'{}' only works with the format stage",
            other.name()
        ))),
    }
}

/// Get all available format strings
pub fn available_formats() -> Vec<String> {
    ProcessingSpec::available_specs()
        .iter()
        .map(ProcessingSpec::name)
        .collect()
}

/// Parse an `OFFSET:LENGTH` byte range
pub fn parse_range(range: &str) -> Result<(usize, usize), ProcessingError> {
    let invalid = || ProcessingError::InvalidRange(range.to_string());
    let (offset, length) = range.split_once(':').ok_or_else(invalid)?;
    let offset = offset.trim().parse().map_err(|_| invalid())?;
    let length = length.trim().parse().map_err(|_| invalid())?;
    Ok((offset, length))
}

/// Parse an indent setting, for callers that take it as free text
pub fn parse_indent(indent: &str) -> Result<IndentStyle, ProcessingError> {
    Ok(indent.parse()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::formatter::{apply_edits, TextEdit};
    use std::io::Write;

    #[test]
    fn test_parse_every_available_format() {
        for name in available_formats() {
            let spec = ProcessingSpec::from_string(&name).unwrap();
            assert_eq!(spec.name(), name);
        }
        assert_eq!(available_formats().len(), 5);
    }

    #[test]
    fn test_rejects_bad_format_strings() {
        assert!(matches!(
            ProcessingSpec::from_string("token"),
            Err(ProcessingError::InvalidFormat(_))
        ));
        assert!(matches!(
            ProcessingSpec::from_string("ast-tag"),
            Err(ProcessingError::InvalidStage(_))
        ));
        assert!(matches!(
            ProcessingSpec::from_string("token-xml"),
            Err(ProcessingError::InvalidFormatType(_))
        ));
        assert!(matches!(
            ProcessingSpec::from_string("token-diff"),
            Err(ProcessingError::InvalidFormatType(_))
        ));
        assert!(matches!(
            ProcessingSpec::from_string("format-json"),
            Err(ProcessingError::InvalidFormatType(_))
        ));
    }

    #[test]
    fn test_token_simple_output() {
        let spec = ProcessingSpec::from_string("token-simple").unwrap();
        let out = process_source("x=1;\n", "x", &spec, &FormatOptions::default()).unwrap();
        assert_eq!(
            out,
            "<identifier:x><operator:=><number:1><semicolon:;><newline>\n"
        );
    }

    #[test]
    fn test_token_json_output() {
        let spec = ProcessingSpec::from_string("token-json").unwrap();
        let out = process_source("msgsrv", "x", &spec, &FormatOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["kind"], "keyword");
        assert_eq!(value[0]["text"], "msgsrv");
    }

    #[test]
    fn test_format_diff_output() {
        let spec = ProcessingSpec::from_string("format-diff").unwrap();
        let out = process_source("x=1;\n", "ping.rebeca", &spec, &FormatOptions::default())
            .unwrap();
        assert!(out.contains("--- ping.rebeca"));
        assert!(out.contains("+x = 1;"));

        let clean = process_source("x = 1;\n", "ping.rebeca", &spec, &FormatOptions::default())
            .unwrap();
        assert!(clean.is_empty());
    }

    #[test]
    fn test_format_edits_output() {
        let spec = ProcessingSpec::from_string("format-edits").unwrap();
        let source = "a{b;}\n";
        let out = process_source(source, "x", &spec, &FormatOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let edits: Vec<TextEdit> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|edit| TextEdit {
                start: edit["start"].as_u64().unwrap() as usize,
                end: edit["end"].as_u64().unwrap() as usize,
                new_text: edit["new_text"].as_str().unwrap().to_string(),
            })
            .collect();
        assert_eq!(apply_edits(source, &edits), "a {\n\tb;\n}\n");
    }

    #[test]
    fn test_process_file_uses_options() {
        let mut file = tempfile::Builder::new()
            .suffix(".property")
            .tempfile()
            .unwrap();
        write!(file, "property{{define{{p=x>1;}}}}").unwrap();
        let spec = ProcessingSpec::from_string("format-text").unwrap();
        let options = FormatOptions {
            dialect: Dialect::Property,
            indent: IndentStyle::Spaces(2),
        };
        let out = process_file(file.path(), &spec, &options).unwrap();
        assert_eq!(out, "property {\n  define {\n    p = x > 1;\n  }\n}\n");
    }

    #[test]
    fn test_missing_file_reports_path() {
        let spec = ProcessingSpec::from_string("format-text").unwrap();
        let err = process_file("no/such/file.rebeca", &spec, &FormatOptions::default())
            .unwrap_err();
        assert!(matches!(err, ProcessingError::Io { .. }));
        assert!(err.to_string().contains("no/such/file.rebeca"));
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("10:4").unwrap(), (10, 4));
        assert_eq!(parse_range(" 0 : 0 ").unwrap(), (0, 0));
        assert!(matches!(
            parse_range("10"),
            Err(ProcessingError::InvalidRange(_))
        ));
        assert!(parse_range("a:b").is_err());
        assert!(parse_range("-1:2").is_err());
    }

    #[test]
    fn test_parse_indent() {
        assert_eq!(parse_indent("2").unwrap(), IndentStyle::Spaces(2));
        assert!(matches!(
            parse_indent("0"),
            Err(ProcessingError::InvalidIndent(_))
        ));
    }
}
