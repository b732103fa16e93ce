//! Page documents
//!
//! A TOML description of a page's elements, standing in for the DOM when
//! running headless:
//!
//! ```toml
//! [viewport]
//! width = 1440
//! height = 900
//!
//! [[element]]
//! id = "heroTitle"
//! classes = ["hero-title"]
//! bounds = { x = 0, y = 320, width = 1440, height = 160 }
//! props = { opacity = 0, y = 40 }
//! ```

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use serde::Deserialize;

use crate::error::{CoreError, Result};
use crate::target::{Element, Property, Rect, TargetStore};

/// Viewport size declared by a page document
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct ViewportSpec {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_width() -> f32 {
    1440.0
}

fn default_height() -> f32 {
    900.0
}

impl Default for ViewportSpec {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

/// One element in a page document
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ElementSpec {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub bounds: Option<Rect>,
    #[serde(default)]
    pub text: Option<String>,
    /// Initial property values keyed by property name
    #[serde(default)]
    pub props: BTreeMap<String, f32>,
    /// Number of identical copies to insert (fragments, letters)
    #[serde(default = "default_repeat")]
    pub repeat: usize,
}

fn default_repeat() -> usize {
    1
}

/// A page's element set
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PageDocument {
    #[serde(default)]
    pub viewport: ViewportSpec,
    #[serde(default, rename = "element")]
    pub elements: Vec<ElementSpec>,
}

impl PageDocument {
    /// Parse a page document from TOML
    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| CoreError::InvalidDocument(e.to_string()))
    }

    /// Build a target store holding every element in document order.
    ///
    /// Property names are validated here so a typo fails loudly instead of
    /// silently animating nothing.
    pub fn build_store(&self) -> Result<TargetStore> {
        let mut store = TargetStore::new();
        let mut seen_ids = FxHashSet::default();

        for spec in &self.elements {
            if let Some(id) = &spec.id {
                if spec.repeat > 1 || !seen_ids.insert(id.clone()) {
                    return Err(CoreError::DuplicateId(id.clone()));
                }
            }

            let mut properties = Vec::with_capacity(spec.props.len());
            for (name, value) in &spec.props {
                properties.push((name.parse::<Property>()?, *value));
            }

            for _ in 0..spec.repeat {
                let mut element = Element::new();
                if let Some(id) = &spec.id {
                    element = element.id(id.clone());
                }
                for class in &spec.classes {
                    element = element.class(class.clone());
                }
                for (property, value) in &properties {
                    element = element.prop(property.clone(), *value);
                }
                if let Some(bounds) = spec.bounds {
                    element = element.bounds(bounds);
                }
                if let Some(text) = &spec.text {
                    element = element.text(text.clone());
                }
                store.insert(element);
            }
        }

        tracing::debug!(elements = store.len(), "page document loaded");
        Ok(store)
    }
}
