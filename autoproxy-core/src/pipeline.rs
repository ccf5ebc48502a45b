//! Render Planning Pipeline - Single Entry Point
//!
//! CRITICAL: plan MUST call validate internally. No bypass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::card::{CardAttributes, CardError, CardRecord, Face, UnpackedFace};
use crate::class::{resolve_class, CardClass};
use crate::frame::{classify, FrameSelection};
use crate::hashing::{compute_job_hash, compute_manifest_hash};
use crate::layers::LayerPlan;
use crate::settings::Settings;
use crate::templates::{Template, TemplateRegistry};
use crate::validation::{ValidationResult, Validator};
use crate::ENGINE_VERSION;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No template for card class: {0}")]
    TemplateNotFound(CardClass),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Template version {0} requires engine >= {1}, current is {2}")]
    EngineVersionMismatch(String, String, String),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error(transparent)]
    Card(#[from] CardError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub record: CardRecord,
    #[serde(default)]
    pub face: Face,
    /// Overrides the artist credited by the card record.
    #[serde(default)]
    pub artist: Option<String>,
}

/// Text the renderer writes into the template's text layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFields {
    pub name: String,
    pub mana_cost: String,
    pub type_line: String,
    pub oracle_text: String,
    pub flavour_text: String,
    pub power_toughness: Option<String>,
    pub loyalty: Option<String>,
    pub artist: String,
    pub rarity: String,
    pub set: Option<String>,
    pub collector_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderJob {
    pub id: String,
    pub card_name: String,
    pub face: Face,
    pub card_class: CardClass,
    pub template_id: String,
    pub template_version: String,
    pub template_file: String,
    pub engine_version: String,
    pub created_at: DateTime<Utc>,
    pub frame: FrameSelection,
    pub layers: LayerPlan,
    pub text: TextFields,
    pub output_file_name: String,
    pub job_hash: String,
    pub manifest_hash: String,
    pub validation: ValidationResult,
}

/// The planning pipeline - single entry point for turning cards into render jobs
pub struct ProxyPipeline {
    registry: TemplateRegistry,
    validator: Validator,
    settings: Settings,
}

impl ProxyPipeline {
    pub fn new(registry: TemplateRegistry, settings: Settings) -> Self {
        Self {
            registry,
            validator: Validator::new(),
            settings,
        }
    }

    pub fn list_templates(&self) -> Vec<&Template> {
        self.registry.list()
    }

    pub fn get_template(&self, id: &str) -> Option<&Template> {
        self.registry.get(id)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// This is the ONLY validation entry point.
    pub fn validate_card(&self, record: &CardRecord, face: Face) -> ValidationResult {
        self.validator.validate(record, face, self.settings.failure_mode)
    }

    /// Frame selection only, for callers that already hold checked attributes.
    pub fn classify(&self, card: &CardAttributes) -> FrameSelection {
        classify(card)
    }

    /// Plan a render job.
    ///
    /// CRITICAL: This ALWAYS calls validate_card internally. No bypass possible.
    pub fn plan(&self, request: &PlanRequest) -> Result<RenderJob, PipelineError> {
        let validation = self.validate_card(&request.record, request.face);
        if !validation.valid {
            let messages: Vec<_> = validation
                .violations
                .iter()
                .map(|v| format!("{}: {}", v.rule, v.message))
                .collect();
            return Err(PipelineError::ValidationFailed(messages.join("; ")));
        }

        let face = request.record.unpack(request.face)?;
        let card_class = resolve_class(&request.record, request.face)?;
        let template = self
            .registry
            .select(card_class, self.settings.preferred_template.as_deref())
            .ok_or(PipelineError::TemplateNotFound(card_class))?;
        check_engine_version(template)?;

        let attributes = face.attributes();
        let frame = classify(&attributes);
        let layers = LayerPlan::build(&frame, &face.traits());
        let text = self.text_fields(&face, request.artist.as_deref());

        let job_hash = compute_job_hash(
            &attributes,
            card_class,
            &template.id,
            &template.template_version,
            ENGINE_VERSION,
        )?;

        let mut job = RenderJob {
            id: Uuid::new_v4().to_string(),
            card_name: face.name.clone(),
            face: request.face,
            card_class,
            template_id: template.id.clone(),
            template_version: template.template_version.clone(),
            template_file: template.file_name.clone(),
            engine_version: ENGINE_VERSION.to_string(),
            created_at: Utc::now(),
            frame,
            layers,
            text,
            output_file_name: template.output_file_name(&face.name, &self.settings.file_extension),
            job_hash,
            manifest_hash: String::new(), // Computed after
            validation,
        };

        // Compute manifest hash (includes everything)
        job.manifest_hash = compute_manifest_hash(&job)?;

        info!(
            card = %job.card_name,
            class = %card_class,
            template = %job.template_id,
            background = %frame.background,
            pinlines = %frame.pinlines,
            twins = %frame.twins,
            "planned render job"
        );
        Ok(job)
    }

    fn text_fields(&self, face: &UnpackedFace, artist: Option<&str>) -> TextFields {
        let oracle_text = if self.settings.remove_reminder_text {
            strip_reminder_text(&face.oracle_text)
        } else {
            face.oracle_text.clone()
        };
        let flavour_text = if self.settings.remove_flavour_text {
            String::new()
        } else {
            face.flavour_text.clone()
        };
        let power_toughness = match (&face.power, &face.toughness) {
            (Some(power), Some(toughness)) => Some(format!("{}/{}", power, toughness)),
            _ => None,
        };
        let artist = artist
            .or(face.artist.as_deref())
            .filter(|a| !a.is_empty())
            .unwrap_or("Unknown")
            .to_string();

        TextFields {
            name: face.name.clone(),
            mana_cost: face.mana_cost.clone(),
            type_line: face.type_line.clone(),
            oracle_text,
            flavour_text,
            power_toughness,
            loyalty: face.loyalty.clone(),
            artist,
            rarity: face.rarity.clone(),
            set: face.set.clone(),
            collector_number: face.collector_number.clone(),
        }
    }
}

fn check_engine_version(template: &Template) -> Result<(), PipelineError> {
    let engine_ver = semver::Version::parse(ENGINE_VERSION)
        .map_err(|e| PipelineError::InvalidVersion(format!("engine {}: {}", ENGINE_VERSION, e)))?;
    let min_ver = semver::Version::parse(&template.engine_min_version).map_err(|e| {
        PipelineError::InvalidVersion(format!("template {} minimum: {}", template.id, e))
    })?;

    if engine_ver < min_ver {
        return Err(PipelineError::EngineVersionMismatch(
            template.template_version.clone(),
            template.engine_min_version.clone(),
            ENGINE_VERSION.to_string(),
        ));
    }

    Ok(())
}

/// Drop parenthesised reminder text and the lines it leaves empty.
pub fn strip_reminder_text(text: &str) -> String {
    let mut stripped = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' if depth > 0 => depth -= 1,
            _ if depth == 0 => stripped.push(c),
            _ => {}
        }
    }
    stripped
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

impl Default for ProxyPipeline {
    fn default() -> Self {
        Self::new(TemplateRegistry::default(), Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_reminder_text() {
        assert_eq!(
            strip_reminder_text("Flying (This creature can't be blocked except by creatures with flying or reach.)\nWhen this enters, draw a card."),
            "Flying\nWhen this enters, draw a card."
        );
        assert_eq!(strip_reminder_text("({T}: Add {G}.)"), "");
        assert_eq!(strip_reminder_text("No reminders here."), "No reminders here.");
    }

    #[test]
    fn test_text_fields_respect_settings() {
        let settings = Settings {
            remove_flavour_text: true,
            remove_reminder_text: true,
            ..Settings::default()
        };
        let pipeline = ProxyPipeline::new(TemplateRegistry::builtin(), settings);
        let record = CardRecord::from_json(
            r#"{"name": "Serra Angel", "mana_cost": "{3}{W}{W}", "type_line": "Creature — Angel",
                "oracle_text": "Flying\nVigilance (Attacking doesn't cause this creature to tap.)",
                "flavor_text": "Born with wings of light.", "power": "4", "toughness": "4",
                "color_identity": ["W"]}"#,
        )
        .unwrap();
        let face = record.unpack(Face::Front).unwrap();
        let text = pipeline.text_fields(&face, None);
        assert_eq!(text.oracle_text, "Flying\nVigilance");
        assert_eq!(text.flavour_text, "");
        assert_eq!(text.power_toughness.as_deref(), Some("4/4"));
        assert_eq!(text.artist, "Unknown");

        let credited = pipeline.text_fields(&face, Some("Douglas Shuler"));
        assert_eq!(credited.artist, "Douglas Shuler");
    }

    #[test]
    fn test_engine_version_gate() {
        let mut template = TemplateRegistry::builtin().get("normal").unwrap().clone();
        assert!(check_engine_version(&template).is_ok());

        template.engine_min_version = "99.0.0".to_string();
        assert!(matches!(
            check_engine_version(&template),
            Err(PipelineError::EngineVersionMismatch(..))
        ));

        template.engine_min_version = "one".to_string();
        assert!(matches!(
            check_engine_version(&template),
            Err(PipelineError::InvalidVersion(_))
        ));
    }
}
