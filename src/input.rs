//! Statement batch input
//!
//! A batch is one JSON document handed over by the parsing collaborator:
//!
//! ```json
//! {"engine": "POSTGRES", "statement": "...", "tree": {"kind": "ast", "statements": [...]}}
//! ```

use crate::advisor::ParsedTree;
use crate::rule::{Engine, TreeKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Batch loading error
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid statement batch {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("batch {batch} is for {engine}, which expects a {expected}, but carries a {actual}")]
    TreeMismatch {
        batch: String,
        engine: Engine,
        expected: TreeKind,
        actual: TreeKind,
    },

    #[error("invalid input pattern: {0}")]
    Pattern(String),
}

/// Statements of one database change, parsed for one engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementBatch {
    pub engine: Engine,

    /// Raw statement text
    #[serde(default)]
    pub statement: String,

    pub tree: ParsedTree,

    /// File the batch was read from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl StatementBatch {
    pub fn new(engine: Engine, statement: &str, tree: ParsedTree) -> Self {
        Self {
            engine,
            statement: statement.to_string(),
            tree,
            source: None,
        }
    }

    /// Parse a batch from JSON text
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Read a batch file
    pub fn load(path: &Path) -> Result<Self, InputError> {
        let content = std::fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut batch = Self::from_json(&content).map_err(|source| InputError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        batch.source = Some(path.to_path_buf());
        batch.validate()?;
        Ok(batch)
    }

    /// Check that the tree was produced by the batch engine's parser
    pub fn validate(&self) -> Result<(), InputError> {
        let expected = self.engine.tree_kind();
        let actual = self.tree.kind();
        if expected != actual {
            return Err(InputError::TreeMismatch {
                batch: self.name(),
                engine: self.engine,
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Display name: the source path, or `<batch>` for in-memory batches
    pub fn name(&self) -> String {
        self.source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<batch>".to_string())
    }
}

/// Expand files, directories and glob patterns into batch files
///
/// Directories contribute every `*.json` file below them. Results are sorted
/// and deduplicated.
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>, InputError> {
    let mut files = Vec::new();

    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }

        let glob_pattern = if path.is_dir() {
            format!("{}/**/*.json", pattern.trim_end_matches('/'))
        } else {
            pattern.clone()
        };

        let entries =
            glob::glob(&glob_pattern).map_err(|e| InputError::Pattern(e.to_string()))?;
        let before = files.len();
        for entry in entries {
            match entry {
                Ok(p) if p.is_file() => files.push(p),
                Ok(_) => {}
                Err(e) => log::warn!("Skipping unreadable path: {}", e),
            }
        }
        if files.len() == before {
            log::warn!("No input files match {}", pattern);
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}
