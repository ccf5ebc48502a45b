//! Validation System - Rule/Policy Separation
//!
//! Rules produce structured violations.
//! Policy maps violations to actions.

use serde::{Deserialize, Serialize};

use crate::card::{CardError, CardRecord, Face};
use crate::class::resolve_class;
use crate::colour::Colour;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub remediation: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ValidationViolation>,
    pub card_name: Option<String>,
    pub face: Face,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    #[default]
    Block,
    Warn,
}

/// Validation rule trait - produces violations
pub trait ValidationRule {
    fn name(&self) -> &'static str;
    fn validate(&self, record: &CardRecord, face: Face) -> Vec<ValidationViolation>;
}

fn violation(
    rule: &dyn ValidationRule,
    severity: ViolationSeverity,
    message: impl Into<String>,
    expected: Option<String>,
    actual: Option<String>,
    remediation: &str,
) -> ValidationViolation {
    ValidationViolation {
        rule: rule.name().to_string(),
        severity,
        message: message.into(),
        expected,
        actual,
        remediation: vec![remediation.to_string()],
    }
}

fn face_mana_cost(record: &CardRecord, face: Face) -> Option<&str> {
    if record.card_faces.is_empty() {
        record.mana_cost.as_deref()
    } else {
        record.card_faces.get(face.index())?.mana_cost.as_deref()
    }
}

// --- Concrete Rules ---

pub struct RequiredFieldsRule;

impl ValidationRule for RequiredFieldsRule {
    fn name(&self) -> &'static str { "required_fields" }

    fn validate(&self, record: &CardRecord, face: Face) -> Vec<ValidationViolation> {
        match record.unpack(face) {
            Err(CardError::MissingField(field)) => vec![violation(
                self,
                ViolationSeverity::Error,
                format!("Missing required field: {}", field),
                Some(field.to_string()),
                None,
                "Fetch the card again or fill the field in the custom card JSON",
            )],
            Err(CardError::MissingFace(face)) => vec![violation(
                self,
                ViolationSeverity::Error,
                format!("Card has no {} face", face),
                Some(format!("{} face", face)),
                Some(format!("{} faces", record.card_faces.len())),
                "Render the front face instead",
            )],
            _ => vec![],
        }
    }
}

pub struct ManaCostSyntaxRule;

impl ValidationRule for ManaCostSyntaxRule {
    fn name(&self) -> &'static str { "mana_cost_syntax" }

    fn validate(&self, record: &CardRecord, face: Face) -> Vec<ValidationViolation> {
        let Some(cost) = face_mana_cost(record, face) else {
            return vec![];
        };

        let mut open = false;
        let mut symbol_len = 0;
        let mut well_formed = true;
        for c in cost.chars() {
            match (c, open) {
                ('{', false) => {
                    open = true;
                    symbol_len = 0;
                }
                ('}', true) if symbol_len > 0 => open = false,
                ('{', true) | ('}', _) => well_formed = false,
                (_, true) => symbol_len += 1,
                // Split cards join their halves with " // ".
                (' ' | '/', false) => {}
                (_, false) => well_formed = false,
            }
        }

        if well_formed && !open {
            vec![]
        } else {
            vec![violation(
                self,
                ViolationSeverity::Error,
                "Malformed mana cost",
                Some("braced symbols such as {2}{W}".to_string()),
                Some(cost.to_string()),
                "Correct the mana cost symbols",
            )]
        }
    }
}

pub struct ColourIdentityRule;

impl ValidationRule for ColourIdentityRule {
    fn name(&self) -> &'static str { "colour_identity" }

    fn validate(&self, record: &CardRecord, face: Face) -> Vec<ValidationViolation> {
        let face_colours = record
            .card_faces
            .get(face.index())
            .and_then(|f| f.colors.as_ref())
            .into_iter()
            .flatten();

        let mut violations = vec![];
        for letter in record.color_identity.iter().chain(face_colours) {
            let mut chars = letter.chars();
            if let (Some(_), None) = (chars.next().and_then(Colour::from_char), chars.next()) {
                continue;
            }
            violations.push(violation(
                self,
                ViolationSeverity::Error,
                "Unknown colour letter",
                Some("one of W, U, B, R, G".to_string()),
                Some(letter.clone()),
                "Use single-letter colour codes",
            ));
        }

        let mut identity = record.color_identity.clone();
        identity.sort();
        if identity.windows(2).any(|w| w[0] == w[1]) {
            violations.push(violation(
                self,
                ViolationSeverity::Warning,
                "Duplicate colour in identity",
                None,
                Some(record.color_identity.join(",")),
                "List each colour once",
            ));
        }
        violations
    }
}

pub struct LayoutRule;

impl ValidationRule for LayoutRule {
    fn name(&self) -> &'static str { "layout" }

    fn validate(&self, record: &CardRecord, face: Face) -> Vec<ValidationViolation> {
        match resolve_class(record, face) {
            Err(CardError::UnsupportedLayout(layout)) => vec![violation(
                self,
                ViolationSeverity::Error,
                format!("Layout {} is not supported", layout),
                None,
                Some(layout),
                "Render this card manually",
            )],
            _ => vec![],
        }
    }
}

/// Validator orchestrates rules and applies policy
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(RequiredFieldsRule),
                Box::new(ManaCostSyntaxRule),
                Box::new(ColourIdentityRule),
                Box::new(LayoutRule),
            ],
        }
    }

    pub fn validate(&self, record: &CardRecord, face: Face, mode: FailureMode) -> ValidationResult {
        let violations: Vec<_> = self
            .rules
            .iter()
            .flat_map(|rule| rule.validate(record, face))
            .collect();

        let has_errors = violations.iter().any(|v| v.severity == ViolationSeverity::Error);
        let valid = match mode {
            FailureMode::Block => !has_errors,
            // Never block, just record
            FailureMode::Warn => true,
        };

        ValidationResult {
            valid,
            violations,
            card_name: record.name.clone(),
            face,
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: &str) -> CardRecord {
        CardRecord::from_json(json).unwrap()
    }

    #[test]
    fn test_clean_record_is_valid() {
        let card = record(
            r#"{"name": "Lightning Helix", "mana_cost": "{R}{W}", "type_line": "Instant",
                "color_identity": ["R", "W"]}"#,
        );
        let result = Validator::new().validate(&card, Face::Front, FailureMode::Block);
        assert!(result.valid);
        assert!(result.violations.is_empty());
    }

    #[test]
    fn test_missing_type_line_blocks() {
        let card = record(r#"{"name": "Nameless", "mana_cost": "{1}"}"#);
        let result = Validator::new().validate(&card, Face::Front, FailureMode::Block);
        assert!(!result.valid);
        assert_eq!(result.violations[0].rule, "required_fields");
        assert_eq!(result.violations[0].expected.as_deref(), Some("type_line"));
    }

    #[test]
    fn test_warn_mode_never_blocks() {
        let card = record(r#"{"name": "Nameless", "mana_cost": "{1}"}"#);
        let result = Validator::new().validate(&card, Face::Front, FailureMode::Warn);
        assert!(result.valid);
        assert!(result.has_errors());
    }

    #[test]
    fn test_mana_cost_syntax() {
        let rule = ManaCostSyntaxRule;
        let ok = record(r#"{"name": "Fire // Ice", "mana_cost": "{1}{R} // {1}{U}", "type_line": "Instant"}"#);
        assert!(rule.validate(&ok, Face::Front).is_empty());
        let hybrid = record(r#"{"name": "Kitchen Finks", "mana_cost": "{1}{G/W}{G/W}", "type_line": "Creature"}"#);
        assert!(rule.validate(&hybrid, Face::Front).is_empty());

        for bad in ["{2}{W", "2W", "{{W}}", "{}"] {
            let card = CardRecord {
                name: Some("Bad".to_string()),
                mana_cost: Some(bad.to_string()),
                type_line: Some("Creature".to_string()),
                ..CardRecord::default()
            };
            assert_eq!(rule.validate(&card, Face::Front).len(), 1, "{}", bad);
        }
    }

    #[test]
    fn test_colour_identity_letters() {
        let card = record(
            r#"{"name": "Odd", "type_line": "Creature", "color_identity": ["W", "Purple", "W"]}"#,
        );
        let violations = ColourIdentityRule.validate(&card, Face::Front);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].severity, ViolationSeverity::Error);
        assert_eq!(violations[1].severity, ViolationSeverity::Warning);
    }

    #[test]
    fn test_unsupported_layout() {
        let card = record(r#"{"name": "Soldier", "layout": "token", "type_line": "Token Creature"}"#);
        let violations = LayoutRule.validate(&card, Face::Front);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].actual.as_deref(), Some("token"));
    }
}
