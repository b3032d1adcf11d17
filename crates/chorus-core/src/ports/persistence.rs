//! External interface for saving and loading agent configurations.

use crate::error::Result;
use crate::requirements::RequirementsStore;
use crate::spec::AgentSpec;
use async_trait::async_trait;

/// Saves finished agent configurations for later reuse.
///
/// Save failures are non-fatal: the orchestrator logs them and the
/// conversation continues.
#[async_trait]
pub trait PersistencePort: Send + Sync {
    /// Persists a requirements snapshot together with its synthesized spec.
    /// Returns the stored configuration's id.
    async fn save(&self, requirements: &RequirementsStore, spec: &AgentSpec) -> Result<String>;

    /// Loads a previously saved configuration. `Ok(None)` for unknown ids.
    async fn load(&self, id: &str) -> Result<Option<(RequirementsStore, AgentSpec)>>;
}
