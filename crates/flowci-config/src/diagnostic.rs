// SPDX-FileCopyrightText: 2026 Flowci Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with fuzzy match suggestions.
//!
//! Converts Figment deserialization errors into miette diagnostics with
//! source spans into the located config file and "did you mean?" hints
//! ranked by Jaro-Winkler similarity.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with rich diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An unknown key was found in the configuration.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(flowci::config::unknown_key),
        help("{}", format_unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Closest valid key, if any is similar enough.
        suggestion: Option<String>,
        valid_keys: String,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A configuration value has the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(flowci::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
        #[label("wrong type here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A configuration value is not one of the accepted variants.
    #[error("invalid value for key `{key}`: {detail}")]
    #[diagnostic(code(flowci::config::invalid_value))]
    InvalidValue { key: String, detail: String },

    /// A required configuration key is missing.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(flowci::config::missing_key),
        help("add `{key} = <value>` to your flowci.toml")
    )]
    MissingKey { key: String },

    /// The located config resource could not be read.
    #[error("cannot read configuration from {location}")]
    #[diagnostic(
        code(flowci::config::unreadable),
        help("point FLOWCI_CONFIG or `-D flowci.config=<path>` at a readable file")
    )]
    Unreadable {
        location: String,
        #[source]
        source: flowci_core::FlowError,
    },

    /// A validation error for a config value.
    #[error("validation error: {message}")]
    #[diagnostic(code(flowci::config::validation))]
    Validation { message: String },

    /// Catch-all for other configuration errors.
    #[error("configuration error: {0}")]
    #[diagnostic(code(flowci::config::other))]
    Other(String),
}

fn format_unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert a `figment::Error` into a list of `ConfigError` diagnostics.
///
/// `source` is the `(name, content)` of the TOML that was merged, used to
/// attach spans to unknown keys.
pub fn figment_to_config_errors(
    err: figment::Error,
    source: Option<(&str, &str)>,
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| {
            let path: Vec<String> = error.path.to_vec();
            match &error.kind {
                Kind::UnknownField(field, expected) => {
                    let valid_keys: Vec<&str> = expected.to_vec();
                    let (span, src) = source_span(source, &path, field);
                    ConfigError::UnknownKey {
                        key: field.clone(),
                        suggestion: suggest_key(field, &valid_keys),
                        valid_keys: valid_keys.join(", "),
                        span,
                        src,
                    }
                }
                Kind::MissingField(field) => ConfigError::MissingKey {
                    key: field.clone().into_owned(),
                },
                Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                    key: path.join("."),
                    detail: format!("found {actual}, expected {expected}"),
                    expected: expected.to_string(),
                    span: None,
                    src: None,
                },
                Kind::UnknownVariant(actual, expected) => ConfigError::InvalidValue {
                    key: path.join("."),
                    detail: format!("`{actual}` is not one of {}", expected.join(", ")),
                },
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

fn source_span(
    source: Option<(&str, &str)>,
    path: &[String],
    field: &str,
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let Some((name, content)) = source else {
        return (None, None);
    };
    match find_key_offset(content, path, field) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), field.len())),
            Some(NamedSource::new(name, content.to_string())),
        ),
        None => (None, None),
    }
}

/// Find the byte offset of a key in TOML content, relative to a section path.
///
/// For `path = ["plugin"]` and `field = "stor"`, finds the `[plugin]` header
/// and then the first line after it starting with `stor`. Top-level fields
/// are searched from the start.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let search_start = match path.first() {
        None => 0,
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header).map(|pos| pos + header.len())?
        }
    };

    let remaining = &content[search_start..];
    let mut byte_offset = 0;
    for line in remaining.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(after) = trimmed.strip_prefix(field)
            && (after.starts_with(' ') || after.starts_with('=') || after.starts_with('\t'))
        {
            return Some(search_start + byte_offset + (line.len() - trimmed.len()));
        }
        byte_offset += line.len();
    }

    None
}

/// Suggest a similar key name using Jaro-Winkler string similarity.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    let mut best_score = SUGGESTION_THRESHOLD;
    let mut best_match = None;

    for &key in valid_keys {
        let score = strsim::jaro_winkler(unknown, key);
        if score > best_score {
            best_score = score;
            best_match = Some(key.to_string());
        }
    }

    best_match
}

/// Render a list of `ConfigError`s to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    #[test]
    fn suggest_stor_for_store() {
        let valid = &["store", "store_path", "cache_file"];
        assert_eq!(suggest_key("stor", valid), Some("store".to_string()));
    }

    #[test]
    fn suggest_cache_fiel_for_cache_file() {
        let valid = &["store", "store_path", "cache_file", "warm_start"];
        assert_eq!(
            suggest_key("cache_fiel", valid),
            Some("cache_file".to_string())
        );
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        let valid = &["level"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn find_key_offset_in_section() {
        let content = "[log]\nlevel = \"info\"\n\n[plugin]\ncache_fiel = \"x\"\n";
        let path = vec!["plugin".to_string()];
        let o = find_key_offset(content, &path, "cache_fiel").unwrap();
        assert_eq!(&content[o..o + 10], "cache_fiel");
    }

    #[test]
    fn find_key_offset_handles_crlf() {
        let content = "[plugin]\r\n  stor = \"json\"\r\n";
        let path = vec!["plugin".to_string()];
        let o = find_key_offset(content, &path, "stor").unwrap();
        assert_eq!(&content[o..o + 4], "stor");
    }

    #[test]
    fn unknown_key_carries_span_and_suggestion() {
        let content = "[plugin]\nstor = \"json\"\n";
        let err = load_config_from_str(content).unwrap_err();
        let errors = figment_to_config_errors(err, Some(("flowci.toml", content)));
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            ConfigError::UnknownKey {
                key,
                suggestion,
                span,
                ..
            } => {
                assert_eq!(key, "stor");
                assert_eq!(suggestion.as_deref(), Some("store"));
                assert_eq!(span.map(|s| s.offset()), Some(9));
            }
            other => panic!("expected UnknownKey, got {other:?}"),
        }
    }

    #[test]
    fn unknown_store_kind_is_invalid_value() {
        let err = load_config_from_str("[plugin]\nstore = \"redis\"\n").unwrap_err();
        let errors = figment_to_config_errors(err, None);
        assert!(
            errors
                .iter()
                .any(|e| matches!(e, ConfigError::InvalidValue { detail, .. } if detail.contains("redis"))),
            "got {errors:?}"
        );
    }
}
