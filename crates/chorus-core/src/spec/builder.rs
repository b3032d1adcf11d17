//! Pure, deterministic derivation of an [`AgentSpec`] from a requirements
//! snapshot and a category table. No I/O, no clocks: invoking the builder
//! twice with the same snapshot yields the same spec.

use super::category::{Category, CategoryTable};
use super::model::{AgentFunction, AgentSpec};
use crate::error::{ChorusError, Result};
use crate::requirements::RequirementsStore;
use minijinja::{context, Environment};
use once_cell::sync::Lazy;

/// Instruction skeleton for a synthesized agent. User-supplied tone,
/// functions and special requirements are layered on as appended sections,
/// never replacing the skeleton itself.
const INSTRUCTIONS_TEMPLATE: &str = "\
You are a {{ tone }} AI assistant for {{ business_name }}.

Your primary responsibilities:
- Assist customers with their needs
- Provide helpful information about our services
- Maintain a {{ tone }} demeanor at all times
{%- if functions %}

Key functions you can help with:
{%- for function in functions %}
- {{ function }}
{%- endfor %}
{%- endif %}
{%- if special_requirements %}

Special requirements:
{%- for item in special_requirements %}
- {{ item }}
{%- endfor %}
{%- endif %}
";

static TEMPLATES: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_template("instructions", INSTRUCTIONS_TEMPLATE)
        .expect("instruction template is valid");
    env
});

/// Builds immutable agent specifications from requirement snapshots.
pub struct SpecBuilder {
    table: CategoryTable,
}

impl SpecBuilder {
    pub fn new(table: CategoryTable) -> Self {
        Self { table }
    }

    /// Derives an [`AgentSpec`] for the given snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error only if template rendering fails, which indicates a
    /// malformed category table rather than bad user input.
    pub fn build(&self, requirements: &RequirementsStore) -> Result<AgentSpec> {
        let category = self.table.resolve(requirements.business_type.as_deref());

        let business_name = requirements
            .business_name
            .clone()
            .unwrap_or_else(|| "our business".to_string());
        let tone = requirements
            .tone
            .clone()
            .unwrap_or_else(|| category.tone.clone());

        let instructions = TEMPLATES
            .get_template("instructions")
            .and_then(|template| {
                template.render(context! {
                    business_name => business_name,
                    tone => tone,
                    functions => requirements.main_functions,
                    special_requirements => requirements.special_requirements,
                })
            })
            .map_err(|e| ChorusError::internal(format!("instruction render failed: {}", e)))?;

        let sample_responses = render_samples(category, &business_name)?;

        let mut title = titlecase(&category.name);
        title.push_str(" Assistant");
        let agent_type = format!(
            "{} {}",
            requirements.business_name.as_deref().unwrap_or("Custom"),
            title
        );

        let mut business_context = std::collections::HashMap::new();
        business_context.insert("category".to_string(), category.name.clone());
        business_context.insert("business_name".to_string(), business_name);
        business_context.insert("tone".to_string(), tone);
        if !requirements.main_functions.is_empty() {
            business_context.insert(
                "user_functions".to_string(),
                requirements.main_functions.join(", "),
            );
        }

        Ok(AgentSpec {
            agent_type,
            instructions,
            voice: category.voice.clone(),
            functions: build_functions(category),
            sample_responses,
            business_context,
        })
    }
}

fn render_samples(category: &Category, business_name: &str) -> Result<Vec<String>> {
    let env = Environment::new();
    category
        .response_templates
        .iter()
        .map(|template| {
            env.render_str(template, context! { business_name => business_name })
                .map_err(|e| ChorusError::internal(format!("sample render failed: {}", e)))
        })
        .collect()
}

/// Known function descriptors for the default category templates.
/// Unknown names still produce a generic descriptor so a custom category
/// never yields an agent with missing functions.
fn build_functions(category: &Category) -> Vec<AgentFunction> {
    category
        .functions
        .iter()
        .map(|name| describe_function(name))
        .collect()
}

fn describe_function(name: &str) -> AgentFunction {
    let (description, parameters): (&str, &[&str]) = match name {
        "take_reservation" => (
            "Take a table reservation",
            &["date", "time", "party_size", "name", "phone"],
        ),
        "take_order" => (
            "Take a food order",
            &["items", "size", "quantity", "customer_info", "delivery_address"],
        ),
        "menu_inquiry" => ("Answer questions about the menu", &["item"]),
        "schedule_appointment" => (
            "Schedule an appointment",
            &["date", "time", "service_type", "patient_name", "phone"],
        ),
        "check_insurance" => (
            "Check insurance coverage",
            &["insurance_provider", "member_id"],
        ),
        "emergency_info" => ("Provide emergency contact information", &[]),
        "check_product_availability" => (
            "Check whether a product is in stock",
            &["product_name"],
        ),
        "store_hours" => ("Provide store opening hours", &[]),
        "general_inquiry" => (
            "Handle a general business inquiry",
            &["topic", "customer_name"],
        ),
        "business_hours" => ("Provide business hours", &[]),
        _ => ("Assist the caller with this request", &[]),
    };
    AgentFunction {
        name: name.to_string(),
        description: description.to_string(),
        parameters: parameters.iter().map(|p| p.to_string()).collect(),
    }
}

fn titlecase(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
