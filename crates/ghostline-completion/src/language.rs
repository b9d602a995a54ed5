//! Language pattern configuration and registry
//!
//! Context analysis is pattern-based: each language contributes a bundle of
//! regular expressions for the constructs the analyzer cares about
//! (functions, classes, imports, variables, and the statement kinds used for
//! line classification). Bundles are plain data ([`LanguagePatterns`]) that
//! compile into [`LanguageConfig`] at registration time, so hosts can ship
//! additional languages as YAML or JSON files without touching the analyzer.

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::{CompletionError, CompletionResult};

/// Raw, serializable pattern bundle for one language
///
/// Every pattern field holds a regex source string. A missing field means
/// the language has no such construct (Go has no try/catch, for example) and
/// the corresponding checks simply never match.
///
/// Capture group conventions, used by the analyzer where present:
/// `name`, `params`, `ret`, and `async` on `function_pattern`; `name` and
/// `base` on `class_pattern`; `name`, `vtype`, and `value` on
/// `variable_pattern`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguagePatterns {
    /// Canonical language identifier (lowercased at registration)
    pub language: String,
    /// Alternate identifiers that resolve to this bundle
    #[serde(default)]
    pub aliases: Vec<String>,
    pub function_pattern: Option<String>,
    pub class_pattern: Option<String>,
    pub import_pattern: Option<String>,
    pub variable_pattern: Option<String>,
    pub comment_pattern: Option<String>,
    pub string_pattern: Option<String>,
    pub conditional_pattern: Option<String>,
    pub loop_pattern: Option<String>,
    pub return_pattern: Option<String>,
    pub try_catch_pattern: Option<String>,
}

/// Compiled pattern matchers for one language
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    pub language: String,
    pub aliases: Vec<String>,
    pub function_pattern: Option<Regex>,
    pub class_pattern: Option<Regex>,
    pub import_pattern: Option<Regex>,
    pub variable_pattern: Option<Regex>,
    pub comment_pattern: Option<Regex>,
    pub string_pattern: Option<Regex>,
    pub conditional_pattern: Option<Regex>,
    pub loop_pattern: Option<Regex>,
    pub return_pattern: Option<Regex>,
    pub try_catch_pattern: Option<Regex>,
}

impl LanguageConfig {
    /// Compile a raw pattern bundle
    ///
    /// # Errors
    ///
    /// Returns `CompletionError::Pattern` naming the language and the field
    /// whose regex failed to compile.
    pub fn compile(patterns: &LanguagePatterns) -> CompletionResult<Self> {
        Ok(Self {
            language: patterns.language.clone(),
            aliases: patterns.aliases.clone(),
            function_pattern: compile_pattern(
                &patterns.language,
                "function",
                &patterns.function_pattern,
            )?,
            class_pattern: compile_pattern(&patterns.language, "class", &patterns.class_pattern)?,
            import_pattern: compile_pattern(
                &patterns.language,
                "import",
                &patterns.import_pattern,
            )?,
            variable_pattern: compile_pattern(
                &patterns.language,
                "variable",
                &patterns.variable_pattern,
            )?,
            comment_pattern: compile_pattern(
                &patterns.language,
                "comment",
                &patterns.comment_pattern,
            )?,
            string_pattern: compile_pattern(
                &patterns.language,
                "string",
                &patterns.string_pattern,
            )?,
            conditional_pattern: compile_pattern(
                &patterns.language,
                "conditional",
                &patterns.conditional_pattern,
            )?,
            loop_pattern: compile_pattern(&patterns.language, "loop", &patterns.loop_pattern)?,
            return_pattern: compile_pattern(
                &patterns.language,
                "return",
                &patterns.return_pattern,
            )?,
            try_catch_pattern: compile_pattern(
                &patterns.language,
                "try_catch",
                &patterns.try_catch_pattern,
            )?,
        })
    }
}

fn compile_pattern(
    language: &str,
    kind: &str,
    source: &Option<String>,
) -> CompletionResult<Option<Regex>> {
    match source {
        Some(source) => Regex::new(source).map(Some).map_err(|err| {
            CompletionError::Pattern(format!("{} {} pattern: {}", language, kind, err))
        }),
        None => Ok(None),
    }
}

/// Configuration format for pattern bundle files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

/// Loader for language pattern bundles shipped as data files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a pattern bundle from a YAML file
    pub fn load_from_yaml(path: &Path) -> CompletionResult<LanguagePatterns> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_string(&content, ConfigFormat::Yaml)
    }

    /// Load a pattern bundle from a JSON file
    pub fn load_from_json(path: &Path) -> CompletionResult<LanguagePatterns> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_string(&content, ConfigFormat::Json)
    }

    /// Load a pattern bundle from a string
    pub fn load_from_string(
        content: &str,
        format: ConfigFormat,
    ) -> CompletionResult<LanguagePatterns> {
        let patterns: LanguagePatterns = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        Self::validate(&patterns)?;
        Ok(patterns)
    }

    fn validate(patterns: &LanguagePatterns) -> CompletionResult<()> {
        if patterns.language.trim().is_empty() {
            return Err(CompletionError::Config(
                "Language name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Registry of compiled language configs
///
/// Populated once at startup and read-only afterwards. Lookup keys are
/// case-insensitive and resolve through the alias table, so `ts`, `tsx`, and
/// `typescript` all reach the JavaScript-family bundle.
pub struct LanguageConfigRegistry {
    configs: HashMap<String, LanguageConfig>,
    aliases: HashMap<String, String>,
}

impl LanguageConfigRegistry {
    pub fn new() -> Self {
        Self {
            configs: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    /// Registry preloaded with the built-in language bundles
    ///
    /// Built-ins cover the JavaScript family (including TypeScript), Python,
    /// Rust, and Go.
    pub fn with_builtin_languages() -> CompletionResult<Self> {
        let mut registry = Self::new();
        for patterns in builtin_patterns() {
            registry.register(&patterns)?;
        }
        Ok(registry)
    }

    /// Compile and register a pattern bundle
    ///
    /// Re-registering a language replaces its config and alias entries.
    pub fn register(&mut self, patterns: &LanguagePatterns) -> CompletionResult<()> {
        let config = LanguageConfig::compile(patterns)?;
        let canonical = normalize(&config.language);
        for alias in &config.aliases {
            self.aliases.insert(normalize(alias), canonical.clone());
        }
        self.configs.insert(canonical, config);
        Ok(())
    }

    /// Look up a config by language id or alias
    ///
    /// Returns `None` for unknown identifiers; callers degrade to a neutral
    /// analysis rather than failing.
    pub fn lookup(&self, language: &str) -> Option<&LanguageConfig> {
        let key = normalize(language);
        if let Some(config) = self.configs.get(&key) {
            return Some(config);
        }
        self.aliases
            .get(&key)
            .and_then(|canonical| self.configs.get(canonical))
    }

    /// Canonical identifiers of all registered languages
    pub fn list_languages(&self) -> Vec<String> {
        self.configs.keys().cloned().collect()
    }

    /// Remove a language and its aliases
    pub fn unregister(&mut self, language: &str) -> Option<LanguageConfig> {
        let key = normalize(language);
        let removed = self.configs.remove(&key);
        if removed.is_some() {
            self.aliases.retain(|_, canonical| canonical != &key);
        }
        removed
    }

    /// Register every `.yaml`, `.yml`, and `.json` bundle in a directory
    pub fn load_from_directory(&mut self, dir: &Path) -> CompletionResult<()> {
        if !dir.is_dir() {
            return Err(CompletionError::Config(format!(
                "Configuration directory not found: {}",
                dir.display()
            )));
        }

        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    let patterns = match ext.to_str() {
                        Some("yaml") | Some("yml") => ConfigLoader::load_from_yaml(&path)?,
                        Some("json") => ConfigLoader::load_from_json(&path)?,
                        _ => continue,
                    };
                    self.register(&patterns)?;
                }
            }
        }

        Ok(())
    }
}

impl Default for LanguageConfigRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(language: &str) -> String {
    language.trim().to_lowercase()
}

/// Maps file extensions to built-in language identifiers
pub struct LanguageDetector;

impl LanguageDetector {
    /// Language identifier for a file extension, if recognized
    pub fn from_extension(extension: &str) -> Option<&'static str> {
        match extension {
            "js" | "mjs" | "cjs" | "jsx" => Some("javascript"),
            "ts" | "tsx" | "mts" | "cts" => Some("typescript"),
            "py" | "pyi" => Some("python"),
            "rs" => Some("rust"),
            "go" => Some("go"),
            _ => None,
        }
    }

    /// Language identifier for a file path, if recognized
    pub fn from_path(path: &Path) -> Option<&'static str> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// The built-in pattern bundles
pub fn builtin_patterns() -> Vec<LanguagePatterns> {
    vec![
        javascript_patterns(),
        python_patterns(),
        rust_patterns(),
        go_patterns(),
    ]
}

/// JavaScript-family bundle, shared by TypeScript through aliases
///
/// Function matching covers `function` declarations and arrow functions
/// assigned to a binding; the optional `: type` groups make the same
/// expressions work for TypeScript annotations.
fn javascript_patterns() -> LanguagePatterns {
    LanguagePatterns {
        language: "javascript".to_string(),
        aliases: vec![
            "js".to_string(),
            "jsx".to_string(),
            "typescript".to_string(),
            "ts".to_string(),
            "tsx".to_string(),
        ],
        function_pattern: Some(
            r"^\s*(?:(?:export\s+)?(?:(?P<async>async)\s+)?function\s*\*?\s*(?P<name>[A-Za-z_$][A-Za-z0-9_$]*)\s*\((?P<params>[^)]*)\)(?:\s*:\s*(?P<ret>[^{]+))?|(?:export\s+)?(?:const|let|var)\s+(?P<name>[A-Za-z_$][A-Za-z0-9_$]*)\s*=\s*(?:(?P<async>async)\s+)?\((?P<params>[^)]*)\)(?:\s*:\s*(?P<ret>[^=]+))?\s*=>)"
                .to_string(),
        ),
        class_pattern: Some(
            r"^\s*(?:export\s+)?(?:abstract\s+)?class\s+(?P<name>[A-Za-z_$][A-Za-z0-9_$]*)(?:\s+extends\s+(?P<base>[A-Za-z_$][A-Za-z0-9_$.]*))?"
                .to_string(),
        ),
        import_pattern: Some(
            r"^\s*(?:import\s+.+|(?:const|let|var)\s+.+=\s*require\s*\(.+)".to_string(),
        ),
        variable_pattern: Some(
            r"^\s*(?:export\s+)?(?:const|let|var)\s+(?P<name>[A-Za-z_$][A-Za-z0-9_$]*)(?:\s*:\s*(?P<vtype>[^=;]+?))?(?:\s*=\s*(?P<value>.+?))?;?\s*$"
                .to_string(),
        ),
        comment_pattern: Some(r"^\s*(?://|/\*|\*)".to_string()),
        string_pattern: Some(r#"^\s*['"`]"#.to_string()),
        conditional_pattern: Some(r"^\s*\}?\s*(?:if|else|switch|case)\b".to_string()),
        loop_pattern: Some(r"^\s*\}?\s*(?:for|while|do)\b".to_string()),
        return_pattern: Some(r"^\s*return\b".to_string()),
        try_catch_pattern: Some(r"^\s*\}?\s*(?:try|catch|finally)\b".to_string()),
    }
}

fn python_patterns() -> LanguagePatterns {
    LanguagePatterns {
        language: "python".to_string(),
        aliases: vec!["py".to_string()],
        function_pattern: Some(
            r"^\s*(?:(?P<async>async)\s+)?def\s+(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*\((?P<params>[^)]*)\)\s*(?:->\s*(?P<ret>[^:]+))?\s*:?"
                .to_string(),
        ),
        class_pattern: Some(
            r"^\s*class\s+(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*(?:\(\s*(?P<base>[A-Za-z_][A-Za-z0-9_.]*)[^)]*\))?\s*:?"
                .to_string(),
        ),
        import_pattern: Some(r"^\s*(?:import\s+\S+|from\s+\S+\s+import\s+.+)".to_string()),
        variable_pattern: Some(
            r"^\s*(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*(?::\s*(?P<vtype>[^=]+?))?\s*=\s*(?P<value>[^=].*)?$"
                .to_string(),
        ),
        comment_pattern: Some(r"^\s*#".to_string()),
        string_pattern: Some(r#"^\s*[rbufRBUF]*['"]"#.to_string()),
        conditional_pattern: Some(r"^\s*(?:if|elif|else)\b".to_string()),
        loop_pattern: Some(r"^\s*(?:for|while)\b".to_string()),
        return_pattern: Some(r"^\s*(?:return|yield)\b".to_string()),
        try_catch_pattern: Some(r"^\s*(?:try|except|finally)\b".to_string()),
    }
}

fn rust_patterns() -> LanguagePatterns {
    LanguagePatterns {
        language: "rust".to_string(),
        aliases: vec!["rs".to_string()],
        function_pattern: Some(
            r"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:(?P<async>async)\s+)?(?:unsafe\s+)?fn\s+(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*(?:<[^>]*>)?\s*\((?P<params>[^)]*)\)\s*(?:->\s*(?P<ret>[^{;]+))?"
                .to_string(),
        ),
        class_pattern: Some(
            r"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:struct|enum|trait)\s+(?P<name>[A-Za-z_][A-Za-z0-9_]*)(?:\s*:\s*(?P<base>[A-Za-z_][A-Za-z0-9_+\s:]*))?"
                .to_string(),
        ),
        import_pattern: Some(
            r"^\s*(?:(?:pub(?:\([^)]*\))?\s+)?use\s+.+|extern\s+crate\s+.+)".to_string(),
        ),
        variable_pattern: Some(
            r"^\s*(?:let\s+(?:mut\s+)?(?P<name>[A-Za-z_][A-Za-z0-9_]*)(?:\s*:\s*(?P<vtype>[^=;]+?))?(?:\s*=\s*(?P<value>.+?))?|(?:pub(?:\([^)]*\))?\s+)?(?:const|static)\s+(?P<name>[A-Z_][A-Z0-9_]*)\s*:\s*(?P<vtype>[^=]+?)\s*=\s*(?P<value>.+?))\s*;?\s*$"
                .to_string(),
        ),
        comment_pattern: Some(r"^\s*(?://|/\*|\*)".to_string()),
        string_pattern: Some(r#"^\s*[br]*#*""#.to_string()),
        conditional_pattern: Some(r"^\s*\}?\s*(?:if|else|match)\b".to_string()),
        loop_pattern: Some(r"^\s*\}?\s*(?:for|while|loop)\b".to_string()),
        return_pattern: Some(r"^\s*return\b".to_string()),
        try_catch_pattern: None,
    }
}

fn go_patterns() -> LanguagePatterns {
    LanguagePatterns {
        language: "go".to_string(),
        aliases: vec!["golang".to_string()],
        function_pattern: Some(
            r"^\s*func\s+(?:\([^)]*\)\s*)?(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*\((?P<params>[^)]*)\)\s*(?P<ret>[^{]+)?"
                .to_string(),
        ),
        class_pattern: Some(
            r"^\s*type\s+(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s+(?:struct|interface)\b".to_string(),
        ),
        import_pattern: Some(r#"^\s*import\s+(?:\(|"[^"]*"|\w+\s+"[^"]*")"#.to_string()),
        variable_pattern: Some(
            r"^\s*(?:var\s+(?P<name>[A-Za-z_][A-Za-z0-9_]*)(?:\s+(?P<vtype>[^=\s][^=]*?))?(?:\s*=\s*(?P<value>.+))?|(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*:=\s*(?P<value>.*))$"
                .to_string(),
        ),
        comment_pattern: Some(r"^\s*(?://|/\*)".to_string()),
        string_pattern: Some(r#"^\s*[`"]"#.to_string()),
        conditional_pattern: Some(r"^\s*\}?\s*(?:if|else|switch|case)\b".to_string()),
        loop_pattern: Some(r"^\s*\}?\s*for\b".to_string()),
        return_pattern: Some(r"^\s*return\b".to_string()),
        try_catch_pattern: None,
    }
}
