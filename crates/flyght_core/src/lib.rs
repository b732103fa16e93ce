//! FLYGHT Core
//!
//! Foundational pieces shared by the motion crates:
//!
//! - **Targets**: the page's element set, property values and ownership
//! - **Documents**: TOML page descriptions loaded into a target store
//! - **Events**: pointer, click, scroll and resize input
//! - **State Machines**: flat statecharts with guards and actions
//!
//! # Example
//!
//! ```rust
//! use flyght_core::{Element, ElementLookup, Property, TargetStore};
//!
//! let mut store = TargetStore::new();
//! let title = store.insert(Element::new().id("heroTitle").prop(Property::Opacity, 0.0));
//!
//! assert_eq!(store.select_one("#heroTitle"), Some(title));
//! assert_eq!(store.get(title, &Property::Opacity), Some(0.0));
//! assert_eq!(store.get(title, &Property::Scale), Some(1.0));
//! ```

pub mod document;
pub mod error;
pub mod events;
pub mod fsm;
pub mod target;

pub use document::{ElementSpec, PageDocument, ViewportSpec};
pub use error::{CoreError, Result};
pub use events::{event_types, Event, EventData, EventType};
pub use fsm::{StateMachine, StateMachineBuilder, Transition};
pub use target::{
    Element, ElementLookup, OwnerId, Property, Rect, TargetId, TargetSnapshot, TargetStore,
};
