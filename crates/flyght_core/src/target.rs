//! Animation targets
//!
//! The page layer owns every element. The motion system only reads and
//! writes numeric properties on elements it can resolve through
//! [`ElementLookup`], and tolerates elements that have been detached.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::error::{CoreError, Result};

new_key_type! {
    /// Handle to an element owned by the page layer
    pub struct TargetId;
}

/// Identifies the tween track that currently drives a (target, property) pair
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(u64);

/// Numeric properties the motion system can animate
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    X,
    Y,
    Left,
    Top,
    /// Translation as a percentage of the element's own width
    XPercent,
    /// Translation as a percentage of the element's own height
    YPercent,
    Scale,
    ScaleX,
    ScaleY,
    /// Rotation in degrees
    Rotation,
    Opacity,
    Width,
    Height,
    /// Vertical background position in percent (title shimmer)
    BackgroundPositionY,
    /// CSS custom property, stored with its leading `--`
    Custom(Arc<str>),
}

impl Property {
    /// Create a custom property. A leading `--` is added if missing.
    pub fn custom(name: &str) -> Self {
        if name.starts_with("--") {
            Property::Custom(Arc::from(name))
        } else {
            Property::Custom(Arc::from(format!("--{name}")))
        }
    }

    /// Value an element reports for a property that was never written
    pub fn neutral_value(&self) -> f32 {
        match self {
            Property::Opacity | Property::Scale | Property::ScaleX | Property::ScaleY => 1.0,
            _ => 0.0,
        }
    }

    /// Canonical name, matching the `FromStr` spelling
    pub fn name(&self) -> &str {
        match self {
            Property::X => "x",
            Property::Y => "y",
            Property::Left => "left",
            Property::Top => "top",
            Property::XPercent => "xPercent",
            Property::YPercent => "yPercent",
            Property::Scale => "scale",
            Property::ScaleX => "scaleX",
            Property::ScaleY => "scaleY",
            Property::Rotation => "rotation",
            Property::Opacity => "opacity",
            Property::Width => "width",
            Property::Height => "height",
            Property::BackgroundPositionY => "backgroundPositionY",
            Property::Custom(name) => name.as_ref(),
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Property {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let property = match s {
            "x" => Property::X,
            "y" => Property::Y,
            "left" => Property::Left,
            "top" => Property::Top,
            "xPercent" => Property::XPercent,
            "yPercent" => Property::YPercent,
            "scale" => Property::Scale,
            "scaleX" => Property::ScaleX,
            "scaleY" => Property::ScaleY,
            "rotation" | "rotate" => Property::Rotation,
            "opacity" => Property::Opacity,
            "width" => Property::Width,
            "height" => Property::Height,
            "backgroundPositionY" => Property::BackgroundPositionY,
            custom if custom.len() > 2 && custom.starts_with("--") => {
                Property::Custom(Arc::from(custom))
            }
            other => return Err(CoreError::UnknownProperty(other.to_string())),
        };
        Ok(property)
    }
}

/// Layout box of an element in document coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Description of an element to insert into a [`TargetStore`]
#[derive(Clone, Debug, Default)]
pub struct Element {
    id: Option<String>,
    classes: SmallVec<[String; 2]>,
    properties: Vec<(Property, f32)>,
    bounds: Option<Rect>,
    text: Option<String>,
}

impl Element {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the element id (matched by `#id` selectors)
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder: add a class (matched by `.class` selectors)
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Builder: set an initial property value
    pub fn prop(mut self, property: Property, value: f32) -> Self {
        self.properties.push((property, value));
        self
    }

    /// Builder: set layout bounds
    pub fn bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Builder: set text content
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// Live state of a single element
#[derive(Clone, Debug)]
struct TargetState {
    element_id: Option<String>,
    classes: SmallVec<[String; 2]>,
    properties: FxHashMap<Property, f32>,
    bounds: Option<Rect>,
    text: Option<String>,
    attached: bool,
}

impl TargetState {
    fn matches(&self, selector: &str) -> bool {
        if let Some(id) = selector.strip_prefix('#') {
            self.element_id.as_deref() == Some(id)
        } else if let Some(class) = selector.strip_prefix('.') {
            self.classes.iter().any(|c| c == class)
        } else {
            // Bare names resolve like getElementById
            self.element_id.as_deref() == Some(selector)
        }
    }
}

/// Resolves selectors to element handles.
///
/// Supported forms: `#id`, `.class`, a bare id, and comma-separated lists of
/// those. Lookups never fail; an unmatched selector yields an empty set.
pub trait ElementLookup {
    fn select(&self, selector: &str) -> SmallVec<[TargetId; 8]>;

    fn select_one(&self, selector: &str) -> Option<TargetId> {
        self.select(selector).first().copied()
    }
}

/// Snapshot of one element's animated state, used for traces
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TargetSnapshot {
    pub element_id: Option<String>,
    pub properties: std::collections::BTreeMap<String, f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// The page's element set.
///
/// Besides property values the store tracks which tween track owns each
/// (target, property) pair. The most recent claimant wins; writes from any
/// other owner are dropped.
#[derive(Clone, Debug, Default)]
pub struct TargetStore {
    targets: SlotMap<TargetId, TargetState>,
    order: Vec<TargetId>,
    claims: FxHashMap<(TargetId, Property), OwnerId>,
    next_owner: u64,
}

impl TargetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an element and return its handle
    pub fn insert(&mut self, element: Element) -> TargetId {
        let Element {
            id,
            classes,
            properties,
            bounds,
            text,
        } = element;

        let id = self.targets.insert(TargetState {
            element_id: id,
            classes,
            properties: properties.into_iter().collect(),
            bounds,
            text,
            attached: true,
        });
        self.order.push(id);
        id
    }

    /// Remove an element from the page.
    ///
    /// The handle stays valid but every later read, write and lookup treats
    /// it as missing.
    pub fn detach(&mut self, id: TargetId) {
        if let Some(state) = self.targets.get_mut(id) {
            state.attached = false;
            tracing::debug!(element = ?state.element_id, "element detached");
        }
        self.claims.retain(|(target, _), _| *target != id);
    }

    pub fn is_attached(&self, id: TargetId) -> bool {
        self.targets.get(id).is_some_and(|s| s.attached)
    }

    /// Number of attached elements
    pub fn len(&self) -> usize {
        self.targets.values().filter(|s| s.attached).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn live(&self, id: TargetId) -> Option<&TargetState> {
        self.targets.get(id).filter(|s| s.attached)
    }

    fn live_mut(&mut self, id: TargetId) -> Option<&mut TargetState> {
        self.targets.get_mut(id).filter(|s| s.attached)
    }

    /// Current value of a property, falling back to its neutral value.
    ///
    /// Returns `None` only when the element is gone.
    pub fn get(&self, id: TargetId, property: &Property) -> Option<f32> {
        let state = self.live(id)?;
        Some(
            state
                .properties
                .get(property)
                .copied()
                .unwrap_or_else(|| property.neutral_value()),
        )
    }

    /// Write a property directly, bypassing ownership.
    ///
    /// Used by continuous loops that are not tweens (cursor follow).
    /// Returns false if the element is gone.
    pub fn set(&mut self, id: TargetId, property: Property, value: f32) -> bool {
        match self.live_mut(id) {
            Some(state) => {
                state.properties.insert(property, value);
                true
            }
            None => false,
        }
    }

    /// Allocate a fresh owner token for a tween track
    pub fn allocate_owner(&mut self) -> OwnerId {
        self.next_owner += 1;
        OwnerId(self.next_owner)
    }

    /// Take ownership of a (target, property) pair
    pub fn claim(&mut self, id: TargetId, property: &Property, owner: OwnerId) {
        if self.is_attached(id) {
            self.claims.insert((id, property.clone()), owner);
        }
    }

    /// Current owner of a (target, property) pair
    pub fn owner_of(&self, id: TargetId, property: &Property) -> Option<OwnerId> {
        self.claims.get(&(id, property.clone())).copied()
    }

    /// Write a property on behalf of `owner`.
    ///
    /// The write is dropped if another owner has claimed the pair since.
    pub fn write_owned(
        &mut self,
        id: TargetId,
        property: &Property,
        owner: OwnerId,
        value: f32,
    ) -> bool {
        match self.owner_of(id, property) {
            Some(current) if current != owner => false,
            _ => self.set(id, property.clone(), value),
        }
    }

    pub fn bounds(&self, id: TargetId) -> Option<Rect> {
        self.live(id)?.bounds
    }

    pub fn set_bounds(&mut self, id: TargetId, bounds: Rect) {
        if let Some(state) = self.live_mut(id) {
            state.bounds = Some(bounds);
        }
    }

    pub fn text(&self, id: TargetId) -> Option<&str> {
        self.live(id)?.text.as_deref()
    }

    pub fn set_text(&mut self, id: TargetId, text: impl Into<String>) -> bool {
        match self.live_mut(id) {
            Some(state) => {
                state.text = Some(text.into());
                true
            }
            None => false,
        }
    }

    /// The element id an element was inserted with
    pub fn element_id(&self, id: TargetId) -> Option<&str> {
        self.live(id)?.element_id.as_deref()
    }

    /// Snapshot every attached element in document order
    pub fn snapshot(&self) -> Vec<TargetSnapshot> {
        self.order
            .iter()
            .filter_map(|&id| self.live(id))
            .map(|state| TargetSnapshot {
                element_id: state.element_id.clone(),
                properties: state
                    .properties
                    .iter()
                    .map(|(p, v)| (p.name().to_string(), *v))
                    .collect(),
                text: state.text.clone(),
            })
            .collect()
    }
}

impl ElementLookup for TargetStore {
    fn select(&self, selector: &str) -> SmallVec<[TargetId; 8]> {
        let mut found = SmallVec::new();
        for part in selector.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            for &id in &self.order {
                let Some(state) = self.live(id) else { continue };
                if state.matches(part) && !found.contains(&id) {
                    found.push(id);
                }
            }
        }
        if found.is_empty() {
            tracing::debug!(selector, "selector matched no elements");
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_frags() -> (TargetStore, TargetId, TargetId) {
        let mut store = TargetStore::new();
        let a = store.insert(Element::new().id("fragA").class("frag"));
        let b = store.insert(
            Element::new()
                .id("fragB")
                .class("frag")
                .prop(Property::Opacity, 0.0),
        );
        (store, a, b)
    }

    #[test]
    fn test_neutral_values() {
        let (store, a, b) = store_with_frags();
        assert_eq!(store.get(a, &Property::Opacity), Some(1.0));
        assert_eq!(store.get(a, &Property::Scale), Some(1.0));
        assert_eq!(store.get(a, &Property::X), Some(0.0));
        assert_eq!(store.get(b, &Property::Opacity), Some(0.0));
    }

    #[test]
    fn test_selectors() {
        let (store, a, b) = store_with_frags();
        assert_eq!(store.select(".frag").as_slice(), &[a, b]);
        assert_eq!(store.select("#fragB").as_slice(), &[b]);
        assert_eq!(store.select("fragA").as_slice(), &[a]);
        assert_eq!(store.select("#fragB, #fragA").as_slice(), &[b, a]);
        assert!(store.select(".missing").is_empty());
    }

    #[test]
    fn test_detached_elements_are_inert() {
        let (mut store, a, b) = store_with_frags();
        store.detach(a);

        assert_eq!(store.get(a, &Property::X), None);
        assert!(!store.set(a, Property::X, 5.0));
        assert_eq!(store.select(".frag").as_slice(), &[b]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_latest_claim_wins() {
        let (mut store, a, _) = store_with_frags();
        let first = store.allocate_owner();
        let second = store.allocate_owner();

        store.claim(a, &Property::X, first);
        assert!(store.write_owned(a, &Property::X, first, 10.0));

        store.claim(a, &Property::X, second);
        assert!(!store.write_owned(a, &Property::X, first, 20.0));
        assert!(store.write_owned(a, &Property::X, second, 30.0));
        assert_eq!(store.get(a, &Property::X), Some(30.0));
    }

    #[test]
    fn test_property_names() {
        assert_eq!("xPercent".parse::<Property>().unwrap(), Property::XPercent);
        assert_eq!("--s".parse::<Property>().unwrap(), Property::custom("s"));
        assert!("--".parse::<Property>().is_err());
        assert!("colour".parse::<Property>().is_err());
        assert_eq!(Property::custom("counter").to_string(), "--counter");
    }
}
