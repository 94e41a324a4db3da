//! TOML configuration for parsing, graph building and traversal.
//!
//! Every field has a default matching namuwiki dump conventions, so an absent config file is
//! equivalent to an empty one:
//!
//! ```toml
//! normalize_unicode = true
//! threads = 4
//!
//! [markup]
//! redirect_markers = ["#redirect", "#넘겨주기"]
//! category_markers = ["분류:", "Category:"]
//!
//! [traversal]
//! max_depth = 2
//! max_nodes = 50000
//! ```

use crate::error::WikiGraphError;
use serde::{Deserialize, Serialize};
use std::{
    fs::{read_to_string, write},
    path::Path,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Plain-text prefixes that turn a document into a redirect.
    pub redirect_markers: Vec<String>,
    /// Namespaces whose links point at binary media and never become edges.
    pub file_markers: Vec<String>,
    /// Namespace prefixes stripped from category links.
    pub category_markers: Vec<String>,
    pub parent_marker: String,
    pub child_marker: String,
    pub related_marker: String,
    /// Lowercase title suffixes of media documents, skipped as graph sources.
    pub media_extensions: Vec<String>,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        MarkupConfig {
            redirect_markers: vec!["#redirect".to_string(), "#넘겨주기".to_string()],
            file_markers: vec![
                "파일:".to_string(),
                "File:".to_string(),
                "Image:".to_string(),
            ],
            category_markers: vec!["분류:".to_string(), "Category:".to_string()],
            parent_marker: " * 상위 문서 :".to_string(),
            child_marker: " * 하위 문서 :".to_string(),
            related_marker: " * 관련 문서 :".to_string(),
            media_extensions: [".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    pub max_depth: usize,
    /// Upper bound on visited nodes per query. `None` disables the budget.
    pub max_nodes: Option<usize>,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        TraversalConfig {
            max_depth: 1,
            max_nodes: Some(100_000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Apply Unicode NFC to titles and link targets.
    pub normalize_unicode: bool,
    /// Worker threads for parallel stages. `None` uses the rayon default.
    pub threads: Option<usize>,
    /// Documents per numbered subdirectory of the text corpus export.
    pub corpus_bucket_size: usize,
    pub markup: MarkupConfig,
    pub traversal: TraversalConfig,
}

impl Default for GraphConfig {
    fn default() -> Self {
        GraphConfig {
            normalize_unicode: true,
            threads: None,
            corpus_bucket_size: 10_000,
            markup: MarkupConfig::default(),
            traversal: TraversalConfig::default(),
        }
    }
}

impl GraphConfig {
    /// Reads a config file, falling back to defaults when it does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<GraphConfig, WikiGraphError> {
        let path = path.as_ref();
        tracing::debug!("Attempting to read config from: {:?}", path);
        if !path.exists() {
            tracing::debug!("Config file not found, using defaults.");
            return Ok(GraphConfig::default());
        }
        let config = Self::from_toml(&read_to_string(path)?)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<GraphConfig, WikiGraphError> {
        Ok(toml::from_str(content)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), WikiGraphError> {
        tracing::debug!("Attempting to write config to: {:?}", path.as_ref());
        write(path, toml::to_string(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), WikiGraphError> {
        if self.corpus_bucket_size == 0 {
            return Err(WikiGraphError::Config(
                "corpus_bucket_size must be positive".to_string(),
            ));
        }
        if self.threads == Some(0) {
            return Err(WikiGraphError::Config(
                "threads must be positive when set".to_string(),
            ));
        }
        if self.markup.redirect_markers.iter().any(|m| m.is_empty()) {
            return Err(WikiGraphError::Config(
                "redirect markers must not be empty strings".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the thread pool used by the parallel stages.
    pub fn thread_pool(&self) -> Result<rayon::ThreadPool, WikiGraphError> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(threads) = self.threads {
            builder = builder.num_threads(threads);
        }
        builder
            .build()
            .map_err(|e| WikiGraphError::Config(format!("Thread pool setup failed: {e}")))
    }
}
