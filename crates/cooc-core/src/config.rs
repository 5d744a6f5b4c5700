use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::edges::MentionPolicy;
use crate::error::{Coded, ErrorCode};
use crate::extract::{Gazetteer, PERSON};
use crate::normalize::{AliasError, AliasTable, DEFAULT_STRIP_CHARS, Normalizer};

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "cooc.toml";

/// Root causes of configuration failures, carried inside `anyhow` chains.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error(transparent)]
    Parse(#[from] toml::de::Error),

    #[error("{0}")]
    Invalid(String),
}

impl Coded for ConfigError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::ConfigNotFound,
            Self::Parse(_) => ErrorCode::ConfigParseError,
            Self::Invalid(_) => ErrorCode::ConfigInvalid,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoocConfig {
    #[serde(default)]
    pub entities: EntityConfig,
    /// Canonical name → aliases folded into it.
    #[serde(default)]
    pub aliases: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub edges: EdgeConfig,
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub centrality: CentralitySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityConfig {
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default = "default_strip_chars")]
    pub strip_chars: Vec<char>,
    /// Extra names for the gazetteer, beyond alias keys and targets.
    #[serde(default)]
    pub known: Vec<String>,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            strip_chars: default_strip_chars(),
            known: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdgeConfig {
    #[serde(default)]
    pub weighting: MentionPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_min_weight")]
    pub min_weight: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            min_weight: default_min_weight(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CentralitySettings {
    #[serde(default = "default_true")]
    pub normalized_betweenness: bool,
    #[serde(default)]
    pub eigenvector_weighted: bool,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Default for CentralitySettings {
    fn default() -> Self {
        Self {
            normalized_betweenness: default_true(),
            eigenvector_weighted: false,
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
        }
    }
}

impl CoocConfig {
    /// Validated alias table built from `[aliases]`.
    ///
    /// # Errors
    ///
    /// Returns an error if one alias is listed under two canonical names.
    pub fn alias_table(&self) -> Result<AliasTable, AliasError> {
        AliasTable::from_groups(&self.aliases)
    }

    /// Normalizer built from `[aliases]` and `entities.strip_chars`.
    ///
    /// # Errors
    ///
    /// Returns an error if the alias table is inconsistent.
    pub fn normalizer(&self) -> Result<Normalizer, AliasError> {
        Ok(Normalizer::new(
            self.alias_table()?,
            self.entities.strip_chars.iter().copied(),
        ))
    }

    /// Dictionary extractor over every configured name: alias keys,
    /// canonical names and `entities.known`.
    #[must_use]
    pub fn gazetteer(&self) -> Gazetteer {
        let names = self
            .aliases
            .iter()
            .flat_map(|(canonical, aliases)| std::iter::once(canonical).chain(aliases))
            .chain(&self.entities.known)
            .cloned();
        Gazetteer::new(names, self.entities.kind.clone())
    }

    /// Reject values no run could use.
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending key.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(ConfigError::Invalid(msg).into()) };
        if self.entities.kind.trim().is_empty() {
            return invalid("entities.kind must not be empty".to_string());
        }
        if self.centrality.max_iterations == 0 {
            return invalid("centrality.max_iterations must be at least 1".to_string());
        }
        if !(self.centrality.tolerance.is_finite() && self.centrality.tolerance > 0.0) {
            return invalid(format!(
                "centrality.tolerance must be a positive number, got {}",
                self.centrality.tolerance
            ));
        }
        self.alias_table()?;
        Ok(())
    }
}

/// Read and validate a config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid TOML, or holds
/// invalid values.
pub fn load_config(path: &Path) -> Result<CoocConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = toml::from_str::<CoocConfig>(&content)
        .map_err(ConfigError::Parse)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config in {}", path.display()))?;
    Ok(config)
}

/// Pick the config file for a run.
///
/// An explicit path must exist. Otherwise `cooc.toml` in `cwd`, then
/// `<config dir>/cooc/config.toml`; `None` means built-in defaults.
///
/// # Errors
///
/// Returns an error if `explicit` is given but does not exist.
pub fn config_path(explicit: Option<&Path>, cwd: &Path) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()).into());
        }
        return Ok(Some(path.to_path_buf()));
    }

    let local = cwd.join(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Ok(Some(local));
    }

    Ok(dirs::config_dir()
        .map(|dir| dir.join("cooc/config.toml"))
        .filter(|path| path.exists()))
}

/// Resolve and load the effective configuration.
///
/// # Errors
///
/// Propagates errors from [`config_path`] and [`load_config`].
pub fn resolve_config(explicit: Option<&Path>, cwd: &Path) -> Result<CoocConfig> {
    match config_path(explicit, cwd)? {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config(&path)
        }
        None => {
            debug!("no config file found, using defaults");
            Ok(CoocConfig::default())
        }
    }
}

fn default_kind() -> String {
    PERSON.to_string()
}

fn default_strip_chars() -> Vec<char> {
    DEFAULT_STRIP_CHARS.to_vec()
}

const fn default_min_weight() -> u64 {
    500
}

const fn default_true() -> bool {
    true
}

const fn default_max_iterations() -> usize {
    100
}

const fn default_tolerance() -> f64 {
    1e-6
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::EntityExtractor;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg: CoocConfig = toml::from_str("").expect("parse");
        assert_eq!(cfg.entities.kind, "PERSON");
        assert_eq!(cfg.entities.strip_chars, vec![':']);
        assert_eq!(cfg.edges.weighting, MentionPolicy::PerMention);
        assert_eq!(cfg.graph.min_weight, 500);
        assert!(cfg.centrality.normalized_betweenness);
        assert!(!cfg.centrality.eigenvector_weighted);
        assert_eq!(cfg.centrality.max_iterations, 100);
        assert!((cfg.centrality.tolerance - 1e-6).abs() < f64::EPSILON);
        cfg.validate().expect("defaults are valid");
    }

    #[test]
    fn full_file_parses() {
        let cfg: CoocConfig = toml::from_str(
            r##"
[entities]
kind = "ORG"
strip_chars = [":", "#"]
known = ["Bernie Sanders"]

[aliases]
"Donald Trump" = ["Trump", "trump"]
"Barack Obama" = ["Obama"]

[edges]
weighting = "documents"

[graph]
min_weight = 2

[centrality]
normalized_betweenness = false
eigenvector_weighted = true
max_iterations = 500
tolerance = 1e-9
"##,
        )
        .expect("parse");
        assert_eq!(cfg.entities.kind, "ORG");
        assert_eq!(cfg.entities.strip_chars, vec![':', '#']);
        assert_eq!(cfg.edges.weighting, MentionPolicy::PerDocument);
        assert_eq!(cfg.graph.min_weight, 2);
        assert!(!cfg.centrality.normalized_betweenness);
        assert!(cfg.centrality.eigenvector_weighted);
        assert_eq!(cfg.centrality.max_iterations, 500);

        let normalizer = cfg.normalizer().expect("consistent aliases");
        assert_eq!(normalizer.normalize("trump#"), "Donald Trump");
        assert_eq!(normalizer.normalize("Obama:"), "Barack Obama");
    }

    #[test]
    fn gazetteer_covers_aliases_targets_and_known_names() {
        let cfg: CoocConfig = toml::from_str(
            r#"
[entities]
known = ["Bernie Sanders"]

[aliases]
"Donald Trump" = ["Trump"]
"#,
        )
        .expect("parse");
        let g = cfg.gazetteer();
        assert_eq!(g.len(), 3);
        assert_eq!(g.kind(), "PERSON");
        let found = g.extract("Donald Trump, Trump and Bernie Sanders");
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn conflicting_aliases_fail_validation() {
        let cfg: CoocConfig = toml::from_str(
            r#"
[aliases]
"Donald Trump" = ["Trump"]
"Ivanka Trump" = ["Trump"]
"#,
        )
        .expect("parse");
        assert!(cfg.validate().is_err());
        assert!(cfg.alias_table().is_err());
    }

    #[test]
    fn non_positive_tolerance_is_rejected() {
        let cfg: CoocConfig =
            toml::from_str("[centrality]\ntolerance = 0.0\n").expect("parse");
        let err = cfg.validate().expect_err("invalid");
        assert!(err.to_string().contains("tolerance"));
        let code = err.downcast_ref::<ConfigError>().map(Coded::error_code);
        assert_eq!(code, Some(ErrorCode::ConfigInvalid));

        let cfg: CoocConfig =
            toml::from_str("[centrality]\nmax_iterations = 0\n").expect("parse");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn local_file_wins_over_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(LOCAL_CONFIG_FILE), "[graph]\nmin_weight = 3\n")
            .expect("write");
        let cfg = resolve_config(None, dir.path()).expect("resolve");
        assert_eq!(cfg.graph.min_weight, 3);
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.toml");
        let err = resolve_config(Some(&missing), dir.path()).expect_err("missing");
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn parse_errors_name_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[graph\n").expect("write");
        let err = load_config(&path).expect_err("bad toml");
        assert!(err.to_string().contains("bad.toml"));
        let code = err
            .chain()
            .find_map(|e| e.downcast_ref::<ConfigError>())
            .map(Coded::error_code);
        assert_eq!(code, Some(ErrorCode::ConfigParseError));
    }
}
