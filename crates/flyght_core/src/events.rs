//! Input events
//!
//! The page layer forwards pointer, click, scroll and resize input to the
//! motion system as [`Event`] values.

use crate::target::TargetId;

/// Event type identifier
pub type EventType = u32;

/// Event types the motion system reacts to
pub mod event_types {
    use super::EventType;

    pub const POINTER_MOVE: EventType = 3;
    pub const POINTER_ENTER: EventType = 4;
    pub const POINTER_LEAVE: EventType = 5;
    pub const CLICK: EventType = 8;
    pub const SCROLL: EventType = 30;
    pub const RESIZE: EventType = 40;
}

/// An input event with associated data
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub event_type: EventType,
    /// Element the event happened on, if any
    pub target: Option<TargetId>,
    pub data: EventData,
}

/// Event-specific data
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EventData {
    Pointer { x: f32, y: f32 },
    /// Absolute vertical scroll offset of the page
    Scroll { offset_y: f32 },
    Resize { width: f32, height: f32 },
    None,
}

impl Event {
    pub fn pointer_move(x: f32, y: f32) -> Self {
        Self {
            event_type: event_types::POINTER_MOVE,
            target: None,
            data: EventData::Pointer { x, y },
        }
    }

    pub fn pointer_enter(target: TargetId) -> Self {
        Self {
            event_type: event_types::POINTER_ENTER,
            target: Some(target),
            data: EventData::None,
        }
    }

    pub fn pointer_leave(target: TargetId) -> Self {
        Self {
            event_type: event_types::POINTER_LEAVE,
            target: Some(target),
            data: EventData::None,
        }
    }

    pub fn click(x: f32, y: f32) -> Self {
        Self {
            event_type: event_types::CLICK,
            target: None,
            data: EventData::Pointer { x, y },
        }
    }

    pub fn scroll(offset_y: f32) -> Self {
        Self {
            event_type: event_types::SCROLL,
            target: None,
            data: EventData::Scroll { offset_y },
        }
    }

    pub fn resize(width: f32, height: f32) -> Self {
        Self {
            event_type: event_types::RESIZE,
            target: None,
            data: EventData::Resize { width, height },
        }
    }

    pub fn is(&self, event_type: EventType) -> bool {
        self.event_type == event_type
    }
}
