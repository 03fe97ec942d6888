use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::{
    annotation::{
        cache::{CacheOpts, RecordCache},
        store::AnnotationStore,
    },
    foundation::error::{BoardError, BoardResult},
    render::pipeline::{BoardContext, CompositorOpts},
};

/// Process configuration, usually read from a JSON file.
///
/// ```json
/// { "compositor": { "parallel": true, "threads": 4, "timeout": 5.0 },
///   "cache": { "max_entries": 4096, "ttl": 600 } }
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Compositor execution options.
    pub compositor: CompositorOpts,
    /// Record cache bounds; `max_entries = 0` runs without a cache.
    pub cache: CacheOpts,
}

impl BoardConfig {
    /// Parse from JSON text.
    pub fn from_json_str(s: &str) -> BoardResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| BoardError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> BoardResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Reject option values no compositor can run with.
    pub fn validate(&self) -> BoardResult<()> {
        if self.compositor.threads == Some(0) {
            return Err(BoardError::validation(
                "compositor.threads must be >= 1 when set",
            ));
        }
        if !self.compositor.sequence_zoom_threshold.is_finite() {
            return Err(BoardError::validation(
                "compositor.sequence_zoom_threshold must be finite",
            ));
        }
        Ok(())
    }

    /// Context over `store` with a fresh cache sized by this config.
    pub fn context(&self, store: Arc<dyn AnnotationStore>) -> BoardContext {
        let cache = (self.cache.max_entries > 0).then(|| Arc::new(RecordCache::new(self.cache)));
        BoardContext::new(store, cache, self.compositor.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/request/config.rs"]
mod tests;
