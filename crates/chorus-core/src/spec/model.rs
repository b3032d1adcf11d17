//! The synthesized agent specification.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A callable function the synthesized agent exposes to its callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentFunction {
    pub name: String,
    pub description: String,
    /// Parameter names only; typing is the transport layer's concern
    pub parameters: Vec<String>,
}

/// An immutable agent specification produced by one synthesis pass.
///
/// A re-synthesis produces a wholly new `AgentSpec`; nothing ever mutates an
/// existing one in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSpec {
    /// Display label, e.g. "Tony's Pizza Pizza Assistant"
    pub agent_type: String,
    /// Full persona prompt for the live session
    pub instructions: String,
    /// Voice identifier understood by the session transport
    pub voice: String,
    pub functions: Vec<AgentFunction>,
    pub sample_responses: Vec<String>,
    /// Derived display fields (category, business name, effective tone, ...)
    pub business_context: HashMap<String, String>,
}

impl AgentSpec {
    /// Business name for announcements, falling back to a neutral label.
    pub fn business_name(&self) -> &str {
        self.business_context
            .get("business_name")
            .map(String::as_str)
            .unwrap_or("our business")
    }

    /// Resolved category name ("pizza", "dental", ...).
    pub fn category(&self) -> &str {
        self.business_context
            .get("category")
            .map(String::as_str)
            .unwrap_or("general")
    }
}
