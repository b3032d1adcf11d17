//! Accumulated user requirements for one conversation context.
//!
//! The store is owned exclusively by that context's orchestrator and is only
//! mutated while the state machine is outside Processing. Finalize snapshots
//! it (never clears it) so a later re-synthesis can reuse the history.

mod field;

pub use field::{classify_field, contact_key, RequirementField};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Values the speech layer produces when the caller had nothing to say.
/// These never count as a real answer.
const FILLER_VALUES: &[&str] = &["um", "uh", "i don't know", "not sure"];

/// Minimum trimmed length for a value to be considered meaningful.
const MIN_VALUE_LEN: usize = 2;

/// Mutable accumulation of user-supplied requirement fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequirementsStore {
    pub business_name: Option<String>,
    pub business_type: Option<String>,
    pub target_audience: Option<String>,
    /// Ordered, append-only
    pub main_functions: Vec<String>,
    pub tone: Option<String>,
    pub special_requirements: Vec<String>,
    pub contact_info: HashMap<String, String>,
}

/// Result of applying one field/value pair to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOutcome {
    /// Value stored under the resolved slot
    Stored(RequirementField),
    /// Value was filler or too short; nothing stored, caller should re-ask
    Rejected,
}

impl RequirementsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when a value is meaningful enough to store.
    pub fn is_meaningful(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.len() >= MIN_VALUE_LEN && !FILLER_VALUES.contains(&trimmed.to_lowercase().as_str())
    }

    /// Classifies `field_name` via the alias table and applies `value`.
    ///
    /// Filler or too-short values are rejected without mutating anything.
    /// Unrecognized fields land in the special-requirements bucket with their
    /// original name so no user input is silently dropped.
    pub fn apply(&mut self, field_name: &str, value: &str) -> StoreOutcome {
        if !Self::is_meaningful(value) {
            tracing::warn!(
                target: "requirements",
                field = field_name,
                value,
                "rejected filler value"
            );
            return StoreOutcome::Rejected;
        }

        let trimmed = value.trim();
        let field = classify_field(field_name);
        match field {
            RequirementField::BusinessName => {
                self.business_name = Some(trimmed.to_string());
            }
            RequirementField::BusinessType => {
                self.business_type = Some(trimmed.to_string());
            }
            RequirementField::Cuisine => {
                self.business_type = Some(format!("{} Restaurant", trimmed));
            }
            RequirementField::Functions => {
                self.main_functions.extend(
                    trimmed
                        .split(',')
                        .map(|f| f.trim().to_string())
                        .filter(|f| !f.is_empty()),
                );
            }
            RequirementField::Tone => {
                self.tone = Some(trimmed.to_string());
            }
            RequirementField::TargetAudience => {
                self.target_audience = Some(trimmed.to_string());
            }
            RequirementField::OperatingHours => {
                self.special_requirements
                    .push(format!("Operating hours: {}", trimmed));
            }
            RequirementField::Contact => {
                self.contact_info
                    .insert(contact_key(field_name), trimmed.to_string());
            }
            RequirementField::SpecialRequirement => {
                self.special_requirements.push(trimmed.to_string());
            }
            RequirementField::Generic => {
                self.special_requirements
                    .push(format!("{}: {}", field_name, trimmed));
            }
        }

        tracing::debug!(target: "requirements", field = field_name, value = trimmed, "stored");
        StoreOutcome::Stored(field)
    }

    /// Required fields (business name and type) still missing or invalid.
    pub fn missing_required(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if !self
            .business_name
            .as_deref()
            .is_some_and(Self::is_meaningful)
        {
            missing.push("business name".to_string());
        }
        if !self
            .business_type
            .as_deref()
            .is_some_and(Self::is_meaningful)
        {
            missing.push("business type".to_string());
        }
        missing
    }

    /// Recommended but optional fields still missing.
    pub fn missing_recommended(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.main_functions.is_empty() {
            missing.push("main functions".to_string());
        }
        if self.tone.is_none() {
            missing.push("preferred tone".to_string());
        }
        if self.target_audience.is_none() {
            missing.push("target audience".to_string());
        }
        missing
    }

    /// True when the minimum required fields are present.
    pub fn is_valid_for_processing(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// Human-readable summary for the confirmation step.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Business: {}\nType: {}\n",
            self.business_name.as_deref().unwrap_or("(not set)"),
            self.business_type.as_deref().unwrap_or("(not set)"),
        );
        if !self.main_functions.is_empty() {
            summary.push_str(&format!("Functions: {}\n", self.main_functions.join(", ")));
        }
        if let Some(tone) = &self.tone {
            summary.push_str(&format!("Tone: {}\n", tone));
        }
        if let Some(audience) = &self.target_audience {
            summary.push_str(&format!("Target Audience: {}\n", audience));
        }
        if !self.special_requirements.is_empty() {
            summary.push_str(&format!(
                "Special Requirements: {}\n",
                self.special_requirements.join(", ")
            ));
        }
        summary
    }
}
