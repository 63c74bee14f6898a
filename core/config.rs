use crate::error::{AppError, Result};
use crate::rules::RuleSet;
use log;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_DIR: &str = ".codeshare";
pub const DEFAULT_CONFIG_FILENAME: &str = "codeshare.toml";
pub const DEFAULT_OUTPUT_FILE: &str = "context.md";
pub const DEFAULT_IGNORE_FILE: &str = ".gitignore";
pub const DEFAULT_TREE_DEPTH: usize = 3;
pub const DEFAULT_MAX_CHARS: usize = 10_000;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    #[serde(default = "default_ignore_file")]
    pub ignore_file: String,
    #[serde(default = "default_tree_depth")]
    pub tree_depth: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,
    /// Exact file names and bare extensions (".pyc") share this list.
    #[serde(default = "default_exclude_files")]
    pub exclude_files: Vec<String>,
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

/// Styling hints for interactive front ends. The engine never reads them.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct UiConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styling: Option<String>,
}

fn default_ignore_file() -> String {
    DEFAULT_IGNORE_FILE.to_string()
}
fn default_tree_depth() -> usize {
    DEFAULT_TREE_DEPTH
}
fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}
fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_FILE)
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_exclude_dirs() -> Vec<String> {
    to_strings(&[
        ".git",
        ".venv",
        "venv",
        "node_modules",
        "__pycache__",
        "build",
        "dist",
        ".vscode",
        ".idea",
        "target",
        "bin",
        "obj",
        ".pytest_cache",
    ])
}

fn default_exclude_files() -> Vec<String> {
    to_strings(&[
        ".gitignore",
        ".pyc",
        ".exe",
        ".dll",
        ".so",
        "context.md",
        ".DS_Store",
        "Thumbs.db",
        ".env",
        "package-lock.json",
        "yarn.lock",
        "poetry.lock",
        "Pipfile.lock",
        "Cargo.lock",
    ])
}

fn default_allowed_extensions() -> Vec<String> {
    to_strings(&[
        ".cpp", ".c", ".cc", ".cxx", ".h", ".hpp", ".hxx", ".py", ".pyx", ".js", ".jsx", ".ts",
        ".tsx", ".md", ".txt", ".rst", ".qml", ".qrc", ".cmake", ".json", ".yaml", ".yml",
        ".toml", ".rs", ".sql", ".sh", ".bat", ".css", ".scss", ".less", ".html", ".htm", ".xml",
    ])
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            ignore_file: default_ignore_file(),
            tree_depth: default_tree_depth(),
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            exclude_dirs: default_exclude_dirs(),
            exclude_files: default_exclude_files(),
            allowed_extensions: default_allowed_extensions(),
            max_chars: default_max_chars(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

impl Config {
    /// Freezes the rule section into a `RuleSet`, optionally replacing the
    /// per-file character budget.
    pub fn rule_set(&self, max_chars_override: Option<usize>) -> RuleSet {
        let max_chars = max_chars_override.unwrap_or(self.rules.max_chars);
        RuleSet::new(
            self.rules.exclude_dirs.iter().cloned(),
            self.rules.exclude_files.iter().cloned(),
            self.rules.allowed_extensions.iter().cloned(),
            max_chars,
        )
    }

    /// Finds the configuration file to load, if any.
    ///
    /// An explicit path must exist. Otherwise the project-local file is tried
    /// first, then the per-user file under the platform config directory.
    pub fn resolve_config_path(
        project_root: &Path,
        cli_config_file: Option<&str>,
        cli_disable_config: bool,
    ) -> Result<Option<PathBuf>> {
        if cli_disable_config {
            log::debug!("Config file loading disabled via CLI flag.");
            return Ok(None);
        }

        if let Some(p_str) = cli_config_file {
            let path = PathBuf::from(shellexpand::tilde(p_str).as_ref());
            if !path.is_file() {
                return Err(AppError::Config(format!(
                    "Specified config file not found at path: {}",
                    path.display()
                )));
            }
            log::debug!("Using specified config file path: {}", path.display());
            return Ok(Some(path));
        }

        let project_path = project_root
            .join(DEFAULT_CONFIG_DIR)
            .join(DEFAULT_CONFIG_FILENAME);
        if project_path.is_file() {
            log::debug!("Using project config file: {}", project_path.display());
            return Ok(Some(project_path));
        }

        if let Some(user_dir) = dirs::config_dir() {
            let user_path = user_dir.join("codeshare").join(DEFAULT_CONFIG_FILENAME);
            if user_path.is_file() {
                log::debug!("Using user config file: {}", user_path.display());
                return Ok(Some(user_path));
            }
        }

        log::debug!(
            "No config file specified and none found for {}; using built-in defaults.",
            project_root.display()
        );
        Ok(None)
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", config_path.display());
        let toml_content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&toml_content).map_err(|e| match e {
            AppError::TomlParse(msg) => AppError::TomlParse(format!(
                "Error parsing config file '{}': {}",
                config_path.display(),
                msg
            )),
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config = toml::from_str::<Config>(content)
            .map_err(|e| AppError::TomlParse(format!("{}. Check TOML syntax and structure.", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<()> {
        if self.general.tree_depth == 0 {
            return Err(AppError::Config(
                "general.tree_depth must be at least 1".to_string(),
            ));
        }
        if self.general.ignore_file.trim().is_empty() {
            return Err(AppError::Config(
                "general.ignore_file must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
