//! AutoProxy Core - Card Proxy Frame Compiler
//!
//! Decides which frame layers of a layered card template to show for a
//! card, and packages that decision with the card's text into a render job
//! for an external rendering host.
//!
//! # Ground Rules
//! 1. Classification Is Pure
//! 2. Missing Data Fails Fast
//! 3. Validation Precedes Planning
//! 4. Deterministic Output
//! 5. Job Hashes Enable Reproduction

pub mod colour;
pub mod card;
pub mod class;
pub mod frame;
pub mod layers;
pub mod templates;
pub mod validation;
pub mod hashing;
pub mod settings;
pub mod pipeline;

pub use colour::{canonicalize_pair, Colour, ColourPair, ColourSet, FrameLayer};
pub use card::{CardAttributes, CardError, CardRecord, CardTraits, Face};
pub use class::{resolve_class, CardClass};
pub use frame::{classify, FrameSelection};
pub use layers::{LayerOp, LayerPlan};
pub use templates::{Template, TemplateId, TemplateRegistry};
pub use validation::{FailureMode, ValidationResult, ValidationRule, ValidationViolation, ViolationSeverity};
pub use hashing::{canonical_json, compute_job_hash, compute_manifest_hash};
pub use settings::{Settings, SettingsError};
pub use pipeline::{PipelineError, PlanRequest, ProxyPipeline, RenderJob, TextFields};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
