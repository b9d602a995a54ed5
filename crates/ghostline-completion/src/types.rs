//! Core data types shared across the completion pipeline

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for completion operations
pub type CompletionResult<T> = Result<T, CompletionError>;

/// Errors that can occur inside the completion crate
///
/// None of these escape [`crate::engine::CompletionEngine::request_suggestions`];
/// the engine converts every failure into an empty suggestion list.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A language pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_yaml::Error> for CompletionError {
    fn from(err: serde_yaml::Error) -> Self {
        CompletionError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for CompletionError {
    fn from(err: serde_json::Error) -> Self {
        CompletionError::Serialization(err.to_string())
    }
}

impl From<regex::Error> for CompletionError {
    fn from(err: regex::Error) -> Self {
        CompletionError::Pattern(err.to_string())
    }
}

/// Cursor position as zero-based line and character offsets
///
/// `character` counts characters, not bytes, so a position can never split a
/// UTF-8 code point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Classification assigned to the line under the cursor
///
/// Exactly one kind applies per line; overlapping patterns are resolved by a
/// fixed precedence order (declarations before statements, statements before
/// the call fallback).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineKind {
    FunctionDeclaration,
    ClassDeclaration,
    ImportStatement,
    VariableDeclaration,
    Comment,
    StringLiteral,
    ConditionalStatement,
    LoopStatement,
    ReturnStatement,
    TryCatch,
    FunctionCall,
    General,
}

/// Where a variable binding is visible from the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableScope {
    /// Declared on the cursor's own line
    Local,
    /// A parameter of the enclosing function
    Parameter,
    /// Declared on an earlier line
    Global,
}

/// A variable declaration discovered near the cursor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableInfo {
    pub name: String,
    /// Declared type annotation, when the language carries one
    pub declared_type: Option<String>,
    /// Right-hand side of the declaration, when present
    pub declared_value: Option<String>,
    /// Zero-based line of the declaration
    pub line: usize,
    pub scope: VariableScope,
}

/// The nearest enclosing function declaration above the cursor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionScope {
    pub name: String,
    pub parameter_names: Vec<String>,
    /// Declared return type, when the language carries one
    pub return_type_hint: Option<String>,
    /// Zero-based line of the declaration
    pub declaration_line: usize,
    pub is_async: bool,
}

/// The nearest enclosing class declaration above the cursor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassScope {
    pub name: String,
    /// Base class or extended type, when present
    pub base_name: Option<String>,
    /// Zero-based line of the declaration
    pub declaration_line: usize,
    /// Methods declared between the class line and the cursor
    pub method_names: Vec<String>,
    /// Properties declared between the class line and the cursor
    pub property_names: Vec<String>,
}

/// Snapshot of the code surrounding one completion request
///
/// Built fresh per request and never persisted; every field reflects the
/// document at the moment of analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeContext {
    /// Language identifier of the document
    pub language: String,
    /// Text on the current line up to the cursor
    pub current_line_prefix: String,
    /// Up to ten lines before the cursor, in document order
    pub preceding_lines: Vec<String>,
    /// Up to ten lines after the cursor, in document order
    pub following_lines: Vec<String>,
    pub enclosing_function: Option<FunctionScope>,
    pub enclosing_class: Option<ClassScope>,
    /// Import statements from the whole document, first occurrence wins
    pub imports: Vec<String>,
    /// Declarations scanned backward from the cursor, most recent first,
    /// followed by the enclosing function's parameters
    pub local_variables: Vec<VariableInfo>,
    pub line_kind: LineKind,
    /// Leading whitespace of the current line
    pub indentation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_equality() {
        assert_eq!(Position::new(3, 7), Position::new(3, 7));
        assert_ne!(Position::new(3, 7), Position::new(3, 8));
    }

    #[test]
    fn test_completion_error_display() {
        let err = CompletionError::Config("missing language".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing language");
    }

    #[test]
    fn test_regex_error_maps_to_pattern() {
        let bad = regex::Regex::new("(unclosed").unwrap_err();
        let err: CompletionError = bad.into();
        assert!(matches!(err, CompletionError::Pattern(_)));
    }

    #[test]
    fn test_line_kind_serializes_as_variant_name() {
        let json = serde_json::to_string(&LineKind::ImportStatement).unwrap();
        assert_eq!(json, "\"ImportStatement\"");
    }
}
