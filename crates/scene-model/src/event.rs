//! Host input events.
//!
//! Input scripts are JSONL: one event per line, lines starting with `#`
//! are comments. A first-line comment of the form `# {...}` may carry a
//! [`ScriptHeader`] describing the host the script was captured on.

use serde::{Deserialize, Serialize};
use vitrine_common::{VitrineError, VitrineResult};

use crate::geometry::{Point2D, ViewportSize};

/// Monotonic timestamp in nanoseconds since stage setup.
pub type TimestampNs = u64;

/// A single input event with timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    /// Monotonic nanoseconds since stage setup.
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    /// The event payload.
    #[serde(flatten)]
    pub kind: EventKind,
}

/// Discriminated union of host events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// Pointer moved, viewport coordinates.
    PointerMove { x: f64, y: f64 },

    /// Pointer entered an element (host-reported).
    HoverEnter { element: String },

    /// Pointer left an element (host-reported).
    HoverLeave { element: String },

    /// Wheel or trackpad scroll, in pixels.
    Wheel { dy: f64 },

    /// Viewport resized.
    Resize { width: f64, height: f64 },

    /// Navigation link activated: scroll to a named element, or to the
    /// top of the page when `element` is absent.
    ScrollTo {
        #[serde(default)]
        element: Option<String>,
    },

    /// Mobile menu button pressed.
    MenuToggle,
}

/// Description of the host an input script targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Initial viewport size.
    pub viewport: ViewportSize,

    /// Whether the primary input can hover (a mouse or trackpad).
    #[serde(default = "default_true")]
    pub hover_capable: bool,

    /// Display refresh rate the script was captured at.
    #[serde(default = "default_refresh_hz")]
    pub refresh_hz: u32,
}

fn default_true() -> bool {
    true
}

fn default_refresh_hz() -> u32 {
    60
}

impl InputEvent {
    /// Create a pointer-move event.
    pub fn pointer(timestamp_ns: TimestampNs, x: f64, y: f64) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::PointerMove { x, y },
        }
    }

    /// Create a wheel event.
    pub fn wheel(timestamp_ns: TimestampNs, dy: f64) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::Wheel { dy },
        }
    }

    pub fn hover_enter(timestamp_ns: TimestampNs, element: impl Into<String>) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::HoverEnter {
                element: element.into(),
            },
        }
    }

    pub fn hover_leave(timestamp_ns: TimestampNs, element: impl Into<String>) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::HoverLeave {
                element: element.into(),
            },
        }
    }

    /// Timestamp as fractional seconds.
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp_ns as f64 / 1_000_000_000.0
    }

    /// Extract pointer position if this event carries one.
    pub fn pointer_position(&self) -> Option<Point2D> {
        match &self.kind {
            EventKind::PointerMove { x, y } => Some(Point2D::new(*x, *y)),
            _ => None,
        }
    }
}

/// Parse events from JSONL content (one JSON object per line).
///
/// Errors name the offending line (1-based).
pub fn parse_events(jsonl: &str) -> VitrineResult<Vec<InputEvent>> {
    jsonl
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(lineno, line)| {
            serde_json::from_str(line)
                .map_err(|e| VitrineError::input(format!("line {lineno}: {e}")))
        })
        .collect()
}

/// Parse a full input script: optional header comment plus events.
///
/// Events must be in non-decreasing timestamp order.
pub fn parse_script(content: &str) -> VitrineResult<(Option<ScriptHeader>, Vec<InputEvent>)> {
    let header = content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .and_then(|line| line.strip_prefix("# "))
        .filter(|rest| rest.trim_start().starts_with('{'))
        .map(serde_json::from_str::<ScriptHeader>)
        .transpose()
        .map_err(|e| VitrineError::input(format!("header: {e}")))?;

    let events = parse_events(content)?;
    if let Some(pair) = events
        .windows(2)
        .find(|pair| pair[1].timestamp_ns < pair[0].timestamp_ns)
    {
        return Err(VitrineError::input(format!(
            "timestamps go backwards: {} after {}",
            pair[1].timestamp_ns, pair[0].timestamp_ns
        )));
    }

    Ok((header, events))
}

/// Serialize events to JSONL format.
pub fn serialize_events(events: &[InputEvent]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for event in events {
        output.push_str(&serde_json::to_string(event)?);
        output.push('\n');
    }
    Ok(output)
}
