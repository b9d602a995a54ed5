//! Pattern-driven context analysis
//!
//! `RegexContextAnalyzer` scans line text with the configured language
//! patterns. It never parses: enclosing scopes come from the first backward
//! match (innermost approximation), imports from a whole-document pass, and
//! variables from a backward pass. Analysis is infallible; anything the
//! patterns cannot recover simply stays empty.

use std::sync::Arc;

use regex::Regex;

use crate::context::CONTEXT_WINDOW_LINES;
use crate::document::Document;
use crate::language::{LanguageConfig, LanguageConfigRegistry};
use crate::types::{
    ClassScope, CodeContext, FunctionScope, LineKind, Position, VariableInfo, VariableScope,
};

/// Builds a [`CodeContext`] snapshot for a cursor position
///
/// Implementations are synchronous and must degrade to empty or neutral
/// results instead of failing.
pub trait ContextAnalyzer: Send + Sync {
    fn analyze(&self, document: &dyn Document, position: Position) -> CodeContext;
}

/// Production analyzer backed by the language pattern registry
pub struct RegexContextAnalyzer {
    registry: Arc<LanguageConfigRegistry>,
}

impl RegexContextAnalyzer {
    pub fn new(registry: Arc<LanguageConfigRegistry>) -> Self {
        Self { registry }
    }
}

impl ContextAnalyzer for RegexContextAnalyzer {
    fn analyze(&self, document: &dyn Document, position: Position) -> CodeContext {
        let language = document.language_id().to_string();
        let line_count = document.line_count();
        let line_index = (position.line as usize).min(line_count.saturating_sub(1));

        let current_line = document.line_at(line_index).unwrap_or_default();
        // Column is a character offset, so a byte-level slice could split a
        // code point; walk chars instead.
        let current_line_prefix: String = current_line
            .chars()
            .take(position.character as usize)
            .collect();
        let indentation: String = current_line
            .chars()
            .take_while(|c| c.is_whitespace())
            .collect();

        let preceding_lines = collect_lines(
            document,
            line_index.saturating_sub(CONTEXT_WINDOW_LINES),
            line_index,
        );
        let following_start = (line_index + 1).min(line_count);
        let following_end = (line_index + 1 + CONTEXT_WINDOW_LINES).min(line_count);
        let following_lines = collect_lines(document, following_start, following_end);

        let (enclosing_function, enclosing_class, imports, local_variables, line_kind) =
            match self.registry.lookup(&language) {
                Some(config) => {
                    let enclosing_function = find_enclosing_function(document, line_index, config);
                    let enclosing_class = find_enclosing_class(document, line_index, config);
                    let imports = collect_imports(document, config);
                    let local_variables = collect_variables(
                        document,
                        line_index,
                        config,
                        enclosing_function.as_ref(),
                    );
                    let line_kind = classify_line(&current_line_prefix, config);
                    (
                        enclosing_function,
                        enclosing_class,
                        imports,
                        local_variables,
                        line_kind,
                    )
                }
                None => (None, None, Vec::new(), Vec::new(), LineKind::General),
            };

        CodeContext {
            language,
            current_line_prefix,
            preceding_lines,
            following_lines,
            enclosing_function,
            enclosing_class,
            imports,
            local_variables,
            line_kind,
            indentation,
        }
    }
}

fn collect_lines(document: &dyn Document, start: usize, end: usize) -> Vec<String> {
    (start..end)
        .filter_map(|index| document.line_at(index))
        .collect()
}

fn find_enclosing_function(
    document: &dyn Document,
    line_index: usize,
    config: &LanguageConfig,
) -> Option<FunctionScope> {
    let pattern = config.function_pattern.as_ref()?;
    for index in (0..=line_index).rev() {
        let line = match document.line_at(index) {
            Some(line) => line,
            None => continue,
        };
        if let Some(caps) = pattern.captures(&line) {
            let name = match caps.name("name") {
                Some(name) => name.as_str().to_string(),
                None => continue,
            };
            let parameter_names = caps
                .name("params")
                .map(|m| split_parameters(m.as_str()))
                .unwrap_or_default();
            let return_type_hint = caps
                .name("ret")
                .map(|m| m.as_str().trim().to_string())
                .filter(|hint| !hint.is_empty());
            return Some(FunctionScope {
                name,
                parameter_names,
                return_type_hint,
                declaration_line: index,
                is_async: caps.name("async").is_some(),
            });
        }
    }
    None
}

fn find_enclosing_class(
    document: &dyn Document,
    line_index: usize,
    config: &LanguageConfig,
) -> Option<ClassScope> {
    let pattern = config.class_pattern.as_ref()?;
    for index in (0..=line_index).rev() {
        let line = match document.line_at(index) {
            Some(line) => line,
            None => continue,
        };
        if let Some(caps) = pattern.captures(&line) {
            let name = match caps.name("name") {
                Some(name) => name.as_str().to_string(),
                None => continue,
            };
            let base_name = caps
                .name("base")
                .map(|m| m.as_str().trim().to_string())
                .filter(|base| !base.is_empty());
            let (method_names, property_names) =
                collect_members(document, index, line_index, config);
            return Some(ClassScope {
                name,
                base_name,
                declaration_line: index,
                method_names,
                property_names,
            });
        }
    }
    None
}

/// Methods and properties declared between a class declaration and the cursor
fn collect_members(
    document: &dyn Document,
    declaration_line: usize,
    line_index: usize,
    config: &LanguageConfig,
) -> (Vec<String>, Vec<String>) {
    let mut method_names = Vec::new();
    let mut property_names = Vec::new();

    for index in (declaration_line + 1)..=line_index {
        let line = match document.line_at(index) {
            Some(line) => line,
            None => continue,
        };
        if let Some(name) = capture_name(&config.function_pattern, &line) {
            method_names.push(name);
        } else if let Some(name) = capture_name(&config.variable_pattern, &line) {
            property_names.push(name);
        }
    }

    (method_names, property_names)
}

fn capture_name(pattern: &Option<Regex>, line: &str) -> Option<String> {
    pattern
        .as_ref()?
        .captures(line)?
        .name("name")
        .map(|m| m.as_str().to_string())
}

/// Whole-document import scan, insertion-ordered, first occurrence wins
fn collect_imports(document: &dyn Document, config: &LanguageConfig) -> Vec<String> {
    let pattern = match config.import_pattern.as_ref() {
        Some(pattern) => pattern,
        None => return Vec::new(),
    };

    let mut imports: Vec<String> = Vec::new();
    for index in 0..document.line_count() {
        let line = match document.line_at(index) {
            Some(line) => line,
            None => continue,
        };
        let trimmed = line.trim();
        if pattern.is_match(trimmed) && !imports.iter().any(|existing| existing == trimmed) {
            imports.push(trimmed.to_string());
        }
    }
    imports
}

/// Backward declaration scan; most recent declaration first, no
/// de-duplication. Parameters of the enclosing function are appended after
/// the scanned declarations.
fn collect_variables(
    document: &dyn Document,
    line_index: usize,
    config: &LanguageConfig,
    enclosing_function: Option<&FunctionScope>,
) -> Vec<VariableInfo> {
    let mut variables = Vec::new();

    if let Some(pattern) = config.variable_pattern.as_ref() {
        for index in (0..=line_index).rev() {
            let line = match document.line_at(index) {
                Some(line) => line,
                None => continue,
            };
            let caps = match pattern.captures(&line) {
                Some(caps) => caps,
                None => continue,
            };
            let name = match caps.name("name") {
                Some(name) => name.as_str().to_string(),
                None => continue,
            };
            let declared_type = caps
                .name("vtype")
                .map(|m| m.as_str().trim().to_string())
                .filter(|declared| !declared.is_empty());
            let declared_value = caps
                .name("value")
                .map(|m| m.as_str().trim().to_string())
                .filter(|declared| !declared.is_empty());
            let scope = if index == line_index {
                VariableScope::Local
            } else {
                VariableScope::Global
            };
            variables.push(VariableInfo {
                name,
                declared_type,
                declared_value,
                line: index,
                scope,
            });
        }
    }

    if let Some(function) = enclosing_function {
        for name in &function.parameter_names {
            variables.push(VariableInfo {
                name: name.clone(),
                declared_type: None,
                declared_value: None,
                line: function.declaration_line,
                scope: VariableScope::Parameter,
            });
        }
    }

    variables
}

/// Classifies the trimmed prefix by first-matching-pattern-wins precedence
///
/// Order matters: `const x = require('y')` satisfies both the import and the
/// variable patterns, and import must win.
fn classify_line(prefix: &str, config: &LanguageConfig) -> LineKind {
    let trimmed = prefix.trim();
    if trimmed.is_empty() {
        return LineKind::General;
    }

    let checks = [
        (&config.function_pattern, LineKind::FunctionDeclaration),
        (&config.class_pattern, LineKind::ClassDeclaration),
        (&config.import_pattern, LineKind::ImportStatement),
        (&config.variable_pattern, LineKind::VariableDeclaration),
        (&config.comment_pattern, LineKind::Comment),
        (&config.string_pattern, LineKind::StringLiteral),
        (&config.conditional_pattern, LineKind::ConditionalStatement),
        (&config.loop_pattern, LineKind::LoopStatement),
        (&config.return_pattern, LineKind::ReturnStatement),
        (&config.try_catch_pattern, LineKind::TryCatch),
    ];

    for (pattern, kind) in checks {
        if is_match(pattern, trimmed) {
            return kind;
        }
    }

    if trimmed.contains('(') && trimmed.contains(')') {
        return LineKind::FunctionCall;
    }

    LineKind::General
}

fn is_match(pattern: &Option<Regex>, text: &str) -> bool {
    pattern.as_ref().map_or(false, |p| p.is_match(text))
}

/// Bare parameter names from a raw parameter list capture
///
/// Strips type annotations, default values, receiver sigils, and `mut`
/// bindings so `a, b: int = 3`, `&mut self`, `*args`, and `w io.Writer`
/// all reduce to their names.
fn split_parameters(params: &str) -> Vec<String> {
    params
        .split(',')
        .filter_map(|part| {
            let part = part
                .split(|c: char| c == ':' || c == '=')
                .next()
                .unwrap_or("")
                .trim();
            let part = part.trim_start_matches(|c: char| c == '*' || c == '&' || c == '.');
            let part = part.strip_prefix("mut ").unwrap_or(part).trim();
            part.split_whitespace().next().map(|name| name.to_string())
        })
        .collect()
}
