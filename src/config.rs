//! Configuration for the review engine
//!
//! Reads configuration from:
//! - `.sqlreviewrc.yaml` / `.sqlreviewrc.json` (project-level)
//! - `~/.sqlreviewrc.yaml` (user-level)
//!
//! A configuration carries the review policy: for each engine, the list of
//! rules to run with their level and payload.

use crate::registry::Registry;
use crate::rule::{Engine, Rule, RuleLevel, RuleType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Check batches in parallel
    pub parallel: bool,

    /// Number of parallel jobs (0 = auto-detect)
    pub jobs: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            jobs: 0,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,

    /// Color mode
    pub color: ColorMode,

    /// Verbose output
    pub verbose: bool,

    /// Show statistics
    pub statistics: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: ColorMode::Auto,
            verbose: false,
            statistics: false,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Github,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "github" => Ok(OutputFormat::Github),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Color mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Rule overrides applied on top of the policy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Rules switched off for every engine
    pub disabled: Vec<RuleType>,

    /// Level overrides (rule type -> level)
    pub level: BTreeMap<RuleType, RuleLevel>,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extend from other configuration files or presets
    pub extends: Vec<String>,

    /// Engine settings
    pub engine: EngineConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Review policy: rules per engine
    pub policy: BTreeMap<Engine, Vec<Rule>>,

    /// Rule overrides
    pub rules: RulesConfig,
}

impl Config {
    /// Create default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a preset configuration by name
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "recommended" => Some(Self::preset_with(|_| Some(RuleLevel::Warning))),
            "strict" => Some(Self::preset_with(|_| Some(RuleLevel::Error))),
            "minimal" => Some(Self::preset_with(|rule_type| match rule_type {
                RuleType::StatementAddCheckNotValid
                | RuleType::StatementWhereRequire
                | RuleType::StatementSummaryReport => Some(RuleLevel::Warning),
                _ => None,
            })),
            _ => None,
        }
    }

    /// Every registered advisor at the level `level_of` picks, with default payloads
    fn preset_with(level_of: impl Fn(RuleType) -> Option<RuleLevel>) -> Self {
        let mut policy: BTreeMap<Engine, Vec<Rule>> = BTreeMap::new();
        for (engine, rule_type) in Registry::builtin().keys() {
            let Some(level) = level_of(rule_type) else {
                continue;
            };
            // Summaries are facts, not findings
            let level = if rule_type == RuleType::StatementSummaryReport {
                RuleLevel::Info
            } else {
                level
            };
            policy
                .entry(engine)
                .or_default()
                .push(Rule::new(rule_type, level).with_payload(rule_type.default_payload()));
        }
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_depth(path, 0)
    }

    /// Load with recursion depth limit (to prevent infinite loops)
    fn load_with_depth(path: &Path, depth: usize) -> Result<Self, ConfigError> {
        const MAX_DEPTH: usize = 10;
        if depth >= MAX_DEPTH {
            return Err(ConfigError::Invalid(
                "Maximum config inheritance depth exceeded".to_string(),
            ));
        }

        let content = std::fs::read_to_string(path)?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let mut config: Self = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "Unknown config file format: {}",
                    ext
                )))
            }
        };

        if !config.extends.is_empty() {
            let base_dir = path.parent().unwrap_or(Path::new("."));
            let mut base_config = Self::default();

            for extend in &config.extends.clone() {
                let extended = if let Some(preset) = Self::preset(extend) {
                    preset
                } else {
                    let extend_path = if Path::new(extend).is_absolute() {
                        PathBuf::from(extend)
                    } else {
                        base_dir.join(extend)
                    };
                    Self::load_with_depth(&extend_path, depth + 1)?
                };
                base_config.merge(extended);
            }

            base_config.merge(config);
            config = base_config;
        }

        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    ///
    /// Policy rules are merged per engine: a rule type present in `other`
    /// replaces the inherited one, new rule types are appended.
    pub fn merge(&mut self, other: Self) {
        if other.engine.jobs != 0 {
            self.engine.jobs = other.engine.jobs;
        }
        self.engine.parallel = other.engine.parallel;

        if other.output.format != OutputFormat::Text {
            self.output.format = other.output.format;
        }
        if other.output.verbose {
            self.output.verbose = true;
        }
        if other.output.statistics {
            self.output.statistics = true;
        }
        if other.output.color != ColorMode::Auto {
            self.output.color = other.output.color;
        }

        for (engine, rules) in other.policy {
            let inherited = self.policy.entry(engine).or_default();
            for rule in rules {
                match inherited.iter_mut().find(|r| r.rule_type == rule.rule_type) {
                    Some(existing) => *existing = rule,
                    None => inherited.push(rule),
                }
            }
        }

        self.rules.disabled.extend(other.rules.disabled);
        self.rules.level.extend(other.rules.level);
    }

    /// Load configuration from default locations
    ///
    /// Falls back to the recommended preset when no file is found.
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_names = [
            ".sqlreviewrc.yaml",
            ".sqlreviewrc.yml",
            ".sqlreviewrc.json",
            "sqlreview.yaml",
            "sqlreview.yml",
            "sqlreview.json",
        ];

        for name in &config_names {
            let path = PathBuf::from(name);
            if path.exists() {
                log::debug!("Using config {}", path.display());
                return Self::load(&path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            for name in &config_names {
                let path = home.join(name);
                if path.exists() {
                    log::debug!("Using config {}", path.display());
                    return Self::load(&path);
                }
            }
        }

        log::debug!("No config file found, using the recommended preset");
        Ok(Self::preset("recommended").unwrap_or_default())
    }

    /// Merge CLI arguments into configuration
    pub fn merge_cli(
        &mut self,
        format: Option<OutputFormat>,
        verbose: Option<bool>,
        jobs: Option<usize>,
        disabled_rules: Option<Vec<RuleType>>,
    ) {
        if let Some(f) = format {
            self.output.format = f;
        }
        if let Some(v) = verbose {
            self.output.verbose = v;
        }
        if let Some(j) = jobs {
            self.engine.jobs = j;
        }
        if let Some(disabled) = disabled_rules {
            self.rules.disabled.extend(disabled);
        }
    }

    /// Rules to run for an engine, with overrides applied
    ///
    /// Disabled rules stay in the list with level `DISABLED`; dispatch skips them.
    pub fn effective_policy(&self, engine: Engine) -> Vec<Rule> {
        self.policy
            .get(&engine)
            .map(|rules| {
                rules
                    .iter()
                    .map(|rule| {
                        if self.rules.disabled.contains(&rule.rule_type) {
                            rule.clone().with_level(RuleLevel::Disabled)
                        } else if let Some(level) = self.rules.level.get(&rule.rule_type) {
                            rule.clone().with_level(*level)
                        } else {
                            rule.clone()
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::new();
        assert!(config.engine.parallel);
        assert_eq!(config.engine.jobs, 0);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.policy.is_empty());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("github".parse::<OutputFormat>().unwrap(), OutputFormat::Github);
        assert!("sarif".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_yaml_deserialize() {
        let yaml = r#"
engine:
  parallel: false
  jobs: 4
output:
  format: json
policy:
  SNOWFLAKE:
    - type: column.maximum-varchar-length
      level: ERROR
      payload:
        number: 100
rules:
  disabled:
    - statement.where.require
  level:
    naming.table: WARNING
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(!config.engine.parallel);
        assert_eq!(config.engine.jobs, 4);
        assert_eq!(config.output.format, OutputFormat::Json);
        let rules = &config.policy[&Engine::Snowflake];
        assert_eq!(rules[0].rule_type, RuleType::ColumnMaximumVarcharLength);
        assert_eq!(rules[0].payload["number"], 100);
        assert_eq!(config.rules.disabled, vec![RuleType::StatementWhereRequire]);
        assert_eq!(
            config.rules.level.get(&RuleType::NamingTable),
            Some(&RuleLevel::Warning)
        );
    }

    #[test]
    fn test_presets() {
        let recommended = Config::preset("recommended").unwrap();
        let pg = recommended.effective_policy(Engine::Postgres);
        assert!(pg
            .iter()
            .any(|r| r.rule_type == RuleType::StatementAddCheckNotValid
                && r.level == RuleLevel::Warning));
        let summary = pg
            .iter()
            .find(|r| r.rule_type == RuleType::StatementSummaryReport)
            .unwrap();
        assert_eq!(summary.level, RuleLevel::Info);

        let strict = Config::preset("strict").unwrap();
        let varchar = strict
            .effective_policy(Engine::Snowflake)
            .into_iter()
            .find(|r| r.rule_type == RuleType::ColumnMaximumVarcharLength)
            .unwrap();
        assert_eq!(varchar.level, RuleLevel::Error);
        assert_eq!(varchar.payload["number"], 2048);

        let minimal = Config::preset("minimal").unwrap();
        assert!(minimal
            .effective_policy(Engine::Postgres)
            .iter()
            .all(|r| r.rule_type != RuleType::NamingTable));

        assert!(Config::preset("unknown").is_none());
    }

    #[test]
    fn test_merge_replaces_rules_per_type() {
        let mut base = Config::preset("recommended").unwrap();
        let mut overlay = Config::new();
        overlay.policy.insert(
            Engine::Snowflake,
            vec![Rule::new(RuleType::ColumnMaximumVarcharLength, RuleLevel::Error)
                .with_payload(serde_json::json!({"number": 10}))],
        );
        base.merge(overlay);

        let rules = base.effective_policy(Engine::Snowflake);
        let varchar: Vec<_> = rules
            .iter()
            .filter(|r| r.rule_type == RuleType::ColumnMaximumVarcharLength)
            .collect();
        assert_eq!(varchar.len(), 1);
        assert_eq!(varchar[0].level, RuleLevel::Error);
        assert_eq!(varchar[0].payload["number"], 10);
    }

    #[test]
    fn test_effective_policy_overrides() {
        let mut config = Config::preset("recommended").unwrap();
        config.rules.disabled.push(RuleType::StatementWhereRequire);
        config
            .rules
            .level
            .insert(RuleType::NamingTable, RuleLevel::Error);

        let pg = config.effective_policy(Engine::Postgres);
        let level_of = |t: RuleType| pg.iter().find(|r| r.rule_type == t).unwrap().level;
        assert_eq!(level_of(RuleType::StatementWhereRequire), RuleLevel::Disabled);
        assert_eq!(level_of(RuleType::NamingTable), RuleLevel::Error);

        assert!(config.effective_policy(Engine::Oracle).is_empty());
    }

    #[test]
    fn test_config_merge_cli() {
        let mut config = Config::new();
        config.merge_cli(
            Some(OutputFormat::Json),
            Some(true),
            Some(4),
            Some(vec![RuleType::NamingTable]),
        );

        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.verbose);
        assert_eq!(config.engine.jobs, 4);
        assert!(config.rules.disabled.contains(&RuleType::NamingTable));
    }

    #[test]
    fn test_load_with_extends() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.yaml");
        std::fs::write(
            &base,
            "extends: [strict]\noutput:\n  verbose: true\n",
        )
        .unwrap();

        let path = dir.path().join(".sqlreviewrc.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "extends: [base.yaml]\nrules:\n  disabled: [naming.table]"
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert!(config.output.verbose);
        assert!(!config.policy.is_empty());
        let pg = config.effective_policy(Engine::Postgres);
        assert!(pg
            .iter()
            .any(|r| r.rule_type == RuleType::NamingTable && r.is_disabled()));
    }

    #[test]
    fn test_self_extending_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loop.yaml");
        std::fs::write(&path, "extends: [loop.yaml]\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("depth"));
    }

    #[test]
    fn test_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::Invalid(_))
        ));
    }
}
