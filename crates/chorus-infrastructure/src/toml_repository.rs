//! Directory-of-TOML-files implementation of `PersistencePort`.
//!
//! One file per saved agent configuration:
//!
//! ```text
//! base_dir/
//! ├── 3f2a…-….toml
//! └── 9c17…-….toml
//! ```

use async_trait::async_trait;
use chorus_core::ports::PersistencePort;
use chorus_core::requirements::RequirementsStore;
use chorus_core::spec::AgentSpec;
use chorus_core::{ChorusError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// On-disk document: the requirements snapshot together with the spec it
/// produced, so a saved agent can be reloaded or re-synthesized later.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SavedAgentDoc {
    id: String,
    created_at: DateTime<Utc>,
    requirements: RequirementsStore,
    spec: AgentSpec,
}

/// Saves each agent configuration as one TOML file under a base directory.
pub struct TomlSpecRepository {
    base_dir: PathBuf,
}

impl TomlSpecRepository {
    /// Repository at the default location (`~/.config/chorus/agents`).
    ///
    /// # Errors
    ///
    /// Fails when the platform config directory cannot be determined.
    pub fn default_location() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| ChorusError::persistence("cannot find config directory"))?
            .join("chorus")
            .join("agents");
        Ok(Self::with_path(base_dir))
    }

    /// Repository under a custom directory (used by tests).
    pub fn with_path(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.base_dir.join(format!("{}.toml", id))
    }

    /// Ids of every saved configuration, unordered.
    pub async fn list(&self) -> Result<Vec<String>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }
        let mut ids = Vec::new();
        let mut entries = fs::read_dir(&self.base_dir)
            .await
            .map_err(|e| ChorusError::persistence(format!("failed to read {:?}: {}", self.base_dir, e)))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ChorusError::persistence(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "toml") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }
        Ok(ids)
    }
}

#[async_trait]
impl PersistencePort for TomlSpecRepository {
    async fn save(&self, requirements: &RequirementsStore, spec: &AgentSpec) -> Result<String> {
        fs::create_dir_all(&self.base_dir).await.map_err(|e| {
            ChorusError::persistence(format!("failed to create {:?}: {}", self.base_dir, e))
        })?;

        let doc = SavedAgentDoc {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            requirements: requirements.clone(),
            spec: spec.clone(),
        };
        let content = toml::to_string_pretty(&doc)
            .map_err(|e| ChorusError::persistence(format!("failed to serialize agent: {}", e)))?;

        let path = self.path_for(&doc.id);
        fs::write(&path, content)
            .await
            .map_err(|e| ChorusError::persistence(format!("failed to write {:?}: {}", path, e)))?;
        tracing::info!(
            target: "persistence",
            id = %doc.id,
            agent_type = %doc.spec.agent_type,
            "agent configuration saved"
        );
        Ok(doc.id)
    }

    async fn load(&self, id: &str) -> Result<Option<(RequirementsStore, AgentSpec)>> {
        let path = self.path_for(id);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| ChorusError::persistence(format!("failed to read {:?}: {}", path, e)))?;
        let doc: SavedAgentDoc = toml::from_str(&content)
            .map_err(|e| ChorusError::persistence(format!("failed to parse {:?}: {}", path, e)))?;
        Ok(Some((doc.requirements, doc.spec)))
    }
}
