//! Poster templates supplied by an external catalogue.

use crate::canvas::CanvasSettings;
use crate::elements::Fill;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A template descriptor. Rendering the template's content modules is the
/// job of the renderer named by `renderer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub width: f64,
    pub height: f64,
    pub background_color: Fill,
    #[serde(default)]
    pub visible_module_ids: Vec<String>,
    /// Key of the renderer that draws this template.
    pub renderer: String,
}

impl Template {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reset the canvas size and background to this template's.
    pub fn apply_to(&self, canvas: &mut CanvasSettings) {
        if !canvas.set_dimensions(self.width, self.height) {
            log::warn!("Template '{}' has an unusable size, keeping canvas size", self.id);
        }
        canvas.background = self.background_color.clone();
    }
}

/// Which content modules of the current template are shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleVisibility {
    modules: BTreeMap<String, bool>,
}

impl ModuleVisibility {
    pub fn from_template(template: &Template) -> Self {
        Self {
            modules: template
                .visible_module_ids
                .iter()
                .map(|id| (id.clone(), true))
                .collect(),
        }
    }

    /// Unknown modules are hidden.
    pub fn is_visible(&self, module_id: &str) -> bool {
        self.modules.get(module_id).copied().unwrap_or(false)
    }

    pub fn set(&mut self, module_id: &str, visible: bool) {
        self.modules.insert(module_id.to_string(), visible);
    }

    pub fn toggle(&mut self, module_id: &str) {
        let visible = self.is_visible(module_id);
        self.set(module_id, !visible);
    }
}
