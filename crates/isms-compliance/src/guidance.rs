//! Guidance cache
//!
//! Per-control guidance comments read from a JSON file of the form
//! `{"criteres": [{"code": "5.1", "commentaire": "..."}]}`. The file is
//! read on first lookup and kept until [`GuidanceCache::clear`].

use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Deserialize)]
struct GuidanceFile {
    #[serde(default)]
    criteres: Vec<GuidanceItem>,
}

#[derive(Deserialize)]
struct GuidanceItem {
    code: Option<String>,
    #[serde(default)]
    commentaire: String,
}

/// Lazily loaded map from control code to guidance text
pub struct GuidanceCache {
    path: Option<PathBuf>,
    entries: RwLock<Option<HashMap<String, String>>>,
}

impl GuidanceCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            entries: RwLock::new(None),
        }
    }

    /// Cache with no backing file
    pub fn empty() -> Self {
        Self {
            path: None,
            entries: RwLock::new(None),
        }
    }

    /// Guidance for a control code, if any
    pub fn get(&self, code: &str) -> Option<String> {
        self.ensure_loaded();
        self.entries
            .read()
            .as_ref()
            .and_then(|entries| entries.get(code.trim()).cloned())
    }

    /// Number of loaded entries
    pub fn len(&self) -> usize {
        self.ensure_loaded();
        self.entries.read().as_ref().map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_loaded(&self) -> bool {
        self.entries.read().is_some()
    }

    /// Drop loaded entries; the next lookup reads the file again
    pub fn clear(&self) {
        *self.entries.write() = None;
    }

    fn ensure_loaded(&self) {
        if self.is_loaded() {
            return;
        }
        let mut slot = self.entries.write();
        if slot.is_none() {
            *slot = Some(match &self.path {
                Some(path) => load(path),
                None => HashMap::new(),
            });
        }
    }
}

impl Default for GuidanceCache {
    fn default() -> Self {
        Self::empty()
    }
}

fn load(path: &Path) -> HashMap<String, String> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Guidance file unreadable");
            return HashMap::new();
        }
    };
    let file: GuidanceFile = match serde_json::from_str(&text) {
        Ok(file) => file,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Guidance file malformed");
            return HashMap::new();
        }
    };

    let entries: HashMap<String, String> = file
        .criteres
        .into_iter()
        .filter_map(|item| {
            let code = item.code?;
            (!item.commentaire.trim().is_empty()).then_some((code, item.commentaire))
        })
        .collect();
    debug!(path = %path.display(), entries = entries.len(), "Guidance loaded");
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn guidance_file(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_lazy_load_and_lookup() {
        let file = guidance_file(
            r#"{"criteres": [
                {"code": "5.1", "commentaire": "Politique signée par la direction"},
                {"code": "5.2", "commentaire": ""},
                {"commentaire": "orphan"}
            ]}"#,
        );
        let cache = GuidanceCache::new(file.path());
        assert!(!cache.is_loaded());
        assert_eq!(cache.get("5.1").as_deref(), Some("Politique signée par la direction"));
        assert!(cache.is_loaded());
        assert_eq!(cache.get("5.2"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear_forces_reload() {
        let file = guidance_file(r#"{"criteres": [{"code": "8.7", "commentaire": "EDR"}]}"#);
        let cache = GuidanceCache::new(file.path());
        assert_eq!(cache.len(), 1);

        std::fs::write(file.path(), r#"{"criteres": []}"#).unwrap();
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(!cache.is_loaded());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_missing_or_malformed_file_is_empty() {
        let cache = GuidanceCache::new("/nonexistent/guidance.json");
        assert_eq!(cache.get("5.1"), None);
        assert!(cache.is_empty());

        let file = guidance_file("not json");
        assert!(GuidanceCache::new(file.path()).is_empty());
        assert!(GuidanceCache::empty().is_empty());
    }
}
