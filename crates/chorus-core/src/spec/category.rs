//! The business category table.
//!
//! An ordered list of keyword rules mapping a free-text business type onto a
//! category template (voice, tone, default functions, response templates).
//! The table is plain data: it can be loaded from TOML and extended without
//! touching the orchestrator. First matching rule wins; "pizza" sits ahead of
//! "restaurant" so a pizzeria is never swallowed by the broader rule.

use crate::error::Result;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// One business category with its keyword rule and persona template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    /// Case-insensitive substring keywords; any match selects this category
    pub keywords: Vec<String>,
    pub voice: String,
    pub tone: String,
    /// Default function names layered in when the user named none
    pub functions: Vec<String>,
    /// Sample responses with a `{{ business_name }}` placeholder
    pub response_templates: Vec<String>,
}

/// Ordered category table plus the fallback used when nothing matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTable {
    pub categories: Vec<Category>,
    pub fallback: Category,
}

impl CategoryTable {
    /// Resolves a free-text business type to a category.
    ///
    /// Case-insensitive substring match over the ordered rules; the fallback
    /// ("general") handles empty input and unmatched types.
    pub fn resolve(&self, business_type: Option<&str>) -> &Category {
        let Some(raw) = business_type else {
            return &self.fallback;
        };
        let lowered = raw.to_lowercase();
        self.categories
            .iter()
            .find(|category| {
                category
                    .keywords
                    .iter()
                    .any(|keyword| lowered.contains(keyword.as_str()))
            })
            .unwrap_or(&self.fallback)
    }

    /// Parses a category table from TOML.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes the table to TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        DEFAULT_TABLE.clone()
    }
}

fn category(
    name: &str,
    keywords: &[&str],
    voice: &str,
    tone: &str,
    functions: &[&str],
    response_templates: &[&str],
) -> Category {
    Category {
        name: name.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        voice: voice.to_string(),
        tone: tone.to_string(),
        functions: functions.iter().map(|f| f.to_string()).collect(),
        response_templates: response_templates.iter().map(|r| r.to_string()).collect(),
    }
}

/// Built-in category table mirroring the stock persona templates.
static DEFAULT_TABLE: Lazy<CategoryTable> = Lazy::new(|| CategoryTable {
    categories: vec![
        category(
            "pizza",
            &["pizza", "pizzeria"],
            "echo",
            "casual and enthusiastic",
            &["take_order", "menu_inquiry", "take_reservation"],
            &[
                "Hey there! Welcome to {{ business_name }}! Ready to order some amazing pizza?",
                "What can I get started for you today?",
                "Let me tell you about our daily specials!",
            ],
        ),
        category(
            "restaurant",
            &[
                "restaurant", "dining", "eatery", "cafe", "bistro", "indian", "chinese",
                "italian", "cuisine", "food",
            ],
            "alloy",
            "friendly and welcoming",
            &["take_reservation", "menu_inquiry", "take_order"],
            &[
                "Thank you for calling {{ business_name }}! How can I help you today?",
                "I'd be happy to help you make a reservation.",
                "Let me check our menu for you.",
            ],
        ),
        category(
            "dental",
            &["dental", "dentist", "orthodont", "teeth"],
            "nova",
            "professional and reassuring",
            &["schedule_appointment", "check_insurance", "emergency_info"],
            &[
                "Thank you for calling {{ business_name }}. How may I assist you today?",
                "I can help you schedule an appointment.",
                "Let me check your insurance coverage.",
            ],
        ),
        category(
            "retail",
            &["retail", "store", "shop", "boutique", "market"],
            "alloy",
            "helpful and professional",
            &["check_product_availability", "store_hours"],
            &[
                "Hello and welcome to {{ business_name }}! How can I help you today?",
                "I can help you find what you're looking for.",
                "Let me check if we have that in stock for you.",
            ],
        ),
        category(
            "medical",
            &[
                "medical", "clinic", "doctor", "healthcare", "hospital", "physician", "health",
            ],
            "nova",
            "caring and professional",
            &["schedule_appointment", "check_insurance", "emergency_info"],
            &[
                "Thank you for calling {{ business_name }}. How may I help you today?",
                "I can assist you with scheduling an appointment.",
                "Let me help you with your medical needs.",
            ],
        ),
    ],
    fallback: category(
        "general",
        &[],
        "alloy",
        "friendly and professional",
        &["general_inquiry", "business_hours"],
        &[
            "Hello! Thank you for contacting {{ business_name }}. How can I help you?",
            "I'm here to assist you with any questions you may have.",
            "How can I help you today?",
        ],
    ),
});
