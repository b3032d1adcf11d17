//! Data-driven classification of incoming requirement fields.
//!
//! Tool calls name fields loosely ("business_name", "name", "agent_tone",
//! "contact_phone", ...). An ordered alias table maps those names onto the
//! slots of the [`RequirementsStore`](super::RequirementsStore); anything
//! unrecognized falls through to the generic special-requirement bucket.

/// The requirement slot a field name resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementField {
    BusinessName,
    BusinessType,
    /// Cuisine answers imply a restaurant business type ("{value} Restaurant")
    Cuisine,
    /// Comma-separated list appended to main_functions
    Functions,
    Tone,
    TargetAudience,
    /// Stored as a "Operating hours: {value}" special requirement
    OperatingHours,
    /// Keyed contact info; the key is the field name minus its contact prefix
    Contact,
    SpecialRequirement,
    /// Unrecognized field, kept as "{field}: {value}" so nothing is dropped
    Generic,
}

/// One classification rule: any alias substring-matching the field name wins.
struct FieldRule {
    aliases: &'static [&'static str],
    field: RequirementField,
}

/// Ordered rule table; earlier rules take precedence.
///
/// Order matters: "business_name" must resolve before the bare "name" alias
/// could be shadowed by another rule, and "special"/"requirement" must come
/// after the more specific slots they would otherwise swallow.
const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        aliases: &["business_name", "name"],
        field: RequirementField::BusinessName,
    },
    FieldRule {
        aliases: &["business_type", "industry"],
        field: RequirementField::BusinessType,
    },
    FieldRule {
        aliases: &["cuisine"],
        field: RequirementField::Cuisine,
    },
    FieldRule {
        aliases: &["function"],
        field: RequirementField::Functions,
    },
    FieldRule {
        aliases: &["tone", "personality"],
        field: RequirementField::Tone,
    },
    FieldRule {
        aliases: &["audience", "target"],
        field: RequirementField::TargetAudience,
    },
    FieldRule {
        aliases: &["hours", "operating"],
        field: RequirementField::OperatingHours,
    },
    FieldRule {
        aliases: &["contact"],
        field: RequirementField::Contact,
    },
    FieldRule {
        aliases: &["special", "requirement"],
        field: RequirementField::SpecialRequirement,
    },
];

/// Classifies a raw field name against the alias table.
pub fn classify_field(field_name: &str) -> RequirementField {
    let lowered = field_name.to_lowercase();
    for rule in FIELD_RULES {
        if rule.aliases.iter().any(|alias| lowered.contains(alias)) {
            return rule.field.clone();
        }
    }
    RequirementField::Generic
}

/// Extracts the contact key from a contact-ish field name.
///
/// "contact_phone" -> "phone"; a bare "contact" keeps its own name as key.
pub fn contact_key(field_name: &str) -> String {
    let lowered = field_name.to_lowercase();
    let stripped = lowered
        .strip_prefix("contact_")
        .unwrap_or(lowered.as_str())
        .to_string();
    if stripped.is_empty() {
        lowered
    } else {
        stripped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_name_aliases() {
        assert_eq!(classify_field("business_name"), RequirementField::BusinessName);
        assert_eq!(classify_field("company name"), RequirementField::BusinessName);
    }

    #[test]
    fn classifies_type_and_cuisine() {
        assert_eq!(classify_field("business_type"), RequirementField::BusinessType);
        assert_eq!(classify_field("industry"), RequirementField::BusinessType);
        assert_eq!(classify_field("cuisine_type"), RequirementField::Cuisine);
    }

    #[test]
    fn classifies_tone_audience_and_hours() {
        assert_eq!(classify_field("agent_tone"), RequirementField::Tone);
        assert_eq!(classify_field("personality"), RequirementField::Tone);
        assert_eq!(classify_field("target_audience"), RequirementField::TargetAudience);
        assert_eq!(classify_field("operating_hours"), RequirementField::OperatingHours);
    }

    #[test]
    fn contact_fields_keep_their_key() {
        assert_eq!(classify_field("contact_phone"), RequirementField::Contact);
        assert_eq!(contact_key("contact_phone"), "phone");
        assert_eq!(contact_key("contact_email"), "email");
    }

    #[test]
    fn unknown_fields_are_generic() {
        assert_eq!(classify_field("favourite_colour"), RequirementField::Generic);
        assert_eq!(classify_field(""), RequirementField::Generic);
    }
}
