//! Template System - Layered Template Files Per Card Class

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::class::CardClass;

pub type TemplateId = String;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub template_version: String,
    pub engine_min_version: String,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub superseded_by: Option<String>,
    /// Template document name, without extension.
    pub file_name: String,
    /// Appended to output file names as " (suffix)".
    #[serde(default)]
    pub suffix: String,
    pub card_classes: Vec<CardClass>,
    /// Use this template by default for its card classes.
    #[serde(default)]
    pub is_default: bool,
}

impl Template {
    fn builtin(id: &str, name: &str, classes: Vec<CardClass>, suffix: &str, is_default: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            template_version: "1.0.0".to_string(),
            engine_min_version: "1.0.0".to_string(),
            deprecated: false,
            superseded_by: None,
            file_name: id.to_string(),
            suffix: suffix.to_string(),
            card_classes: classes,
            is_default,
        }
    }

    pub fn supports(&self, class: CardClass) -> bool {
        self.card_classes.contains(&class)
    }

    /// `<card name>[ (<suffix>)].<ext>`
    pub fn output_file_name(&self, card_name: &str, extension: &str) -> String {
        let extension = extension.trim_start_matches('.');
        if self.suffix.is_empty() {
            format!("{}.{}", card_name, extension)
        } else {
            format!("{} ({}).{}", card_name, self.suffix, extension)
        }
    }
}

/// Template registry - loads templates and tracks each class's default
pub struct TemplateRegistry {
    templates: HashMap<TemplateId, Template>,
    defaults: HashMap<CardClass, TemplateId>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
            defaults: HashMap::new(),
        }
    }

    /// One default template per card class, plus the stock alternates.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for class in CardClass::ALL {
            let name = class.as_str().replace('_', " ");
            registry.register(Template::builtin(class.as_str(), &name, vec![class], "", true));
        }
        registry.register(Template::builtin(
            "normal-extended",
            "normal extended",
            vec![CardClass::Normal, CardClass::Snow, CardClass::Miracle],
            "Extended",
            false,
        ));
        registry.register(Template::builtin(
            "normal-classic",
            "normal classic",
            vec![CardClass::Normal],
            "Classic",
            false,
        ));
        registry
    }

    /// Builtin templates overlaid with every `*.json` template in `dir`.
    pub fn load_from_dir(dir: &Path) -> Result<Self, std::io::Error> {
        let mut registry = Self::builtin();
        if dir.exists() {
            for entry in fs::read_dir(dir)? {
                let path = entry?.path();
                if path.extension().map_or(false, |e| e == "json") {
                    let content = fs::read_to_string(&path)?;
                    match serde_json::from_str::<Template>(&content) {
                        Ok(template) => {
                            debug!(id = %template.id, path = %path.display(), "loaded template");
                            registry.register(template);
                        }
                        Err(e) => warn!(path = %path.display(), error = %e, "skipping template"),
                    }
                }
            }
        }
        Ok(registry)
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.get(id)
    }

    pub fn list(&self) -> Vec<&Template> {
        let mut templates: Vec<_> = self.templates.values().collect();
        templates.sort_by(|a, b| a.id.cmp(&b.id));
        templates
    }

    pub fn register(&mut self, template: Template) {
        if template.is_default {
            for class in &template.card_classes {
                self.defaults.insert(*class, template.id.clone());
            }
        }
        self.templates.insert(template.id.clone(), template);
    }

    pub fn default_for(&self, class: CardClass) -> Option<&Template> {
        self.defaults.get(&class).and_then(|id| self.templates.get(id))
    }

    /// The preferred template when it exists and supports the class,
    /// otherwise the class default.
    pub fn select(&self, class: CardClass, preferred: Option<&str>) -> Option<&Template> {
        if let Some(id) = preferred {
            match self.templates.get(id) {
                Some(template) if template.supports(class) && !template.deprecated => {
                    return Some(template);
                }
                Some(_) => debug!(id, %class, "preferred template does not apply"),
                None => warn!(id, "preferred template not found"),
            }
        }
        self.default_for(class)
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
