//! Configuration discovery and loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CascadeError, CascadeResult};

use super::types::Config;

/// Project-level config file, looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "rigcascade.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// A resolved configuration and where it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    /// `None` when only defaults (plus environment) apply
    pub source: Option<PathBuf>,
    pub warnings: Vec<ConfigWarning>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> CascadeResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|e| CascadeError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| CascadeError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Resolve the config file and apply `RIGCASCADE_*` overrides.
///
/// An explicit path must exist. The project and user files are optional,
/// but a file that exists and fails to parse is an error rather than
/// being silently skipped.
pub fn discover(explicit: Option<&Path>) -> CascadeResult<LoadedConfig> {
    let candidates = match explicit {
        Some(path) => vec![path.to_path_buf()],
        None => default_candidates(),
    };

    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(CascadeError::InvalidConfig {
                file: path.to_path_buf(),
                message: "config file does not exist".to_string(),
            });
        }
    }

    for candidate in candidates {
        if candidate.is_file() {
            let (config, warnings) = load_with_warnings(&candidate)?;
            tracing::debug!(path = %candidate.display(), "loaded configuration");
            return Ok(LoadedConfig {
                config: with_env_overrides(config, |key| std::env::var(key).ok()),
                source: Some(candidate),
                warnings,
            });
        }
    }

    Ok(LoadedConfig {
        config: with_env_overrides(Config::default(), |key| std::env::var(key).ok()),
        source: None,
        warnings: Vec::new(),
    })
}

fn default_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(PROJECT_CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("rigcascade").join("config.toml"));
    }
    candidates
}

/// Apply environment variable overrides (RIGCASCADE_* prefix)
pub fn with_env_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(root) = non_empty("RIGCASCADE_PROJECT_ROOT") {
        config.project.root = PathBuf::from(root);
    }

    if let Some(database) = non_empty("RIGCASCADE_DATABASE") {
        config.project.database = PathBuf::from(database);
    }

    if let Some(exe) = non_empty("RIGCASCADE_WORKER_EXE") {
        config.worker.executable = Some(PathBuf::from(exe));
    }

    if let Some(prefix) = non_empty("RIGCASCADE_SUBSET_PREFIX") {
        config.trigger.subset_prefix = prefix;
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "project",
        "root",
        "database",
        "trigger",
        "subset_prefix",
        "task",
        "require_task_option",
        "worker",
        "executable",
        "extra_args",
        "pipeline",
        "comment",
        "repairs",
        "staging_dir",
        "publish_root",
        "extract_command",
        "revision",
        "directory",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}

