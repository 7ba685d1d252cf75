//! Gesture events delivered by the host's touch recognizers.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Lifecycle phase reported by a recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GesturePhase {
    Began,
    Active,
    Ended,
    /// Treated exactly like `Ended`: the last value is kept.
    Cancelled,
}

impl GesturePhase {
    /// Whether the gesture is finished (ended or cancelled).
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Ended | Self::Cancelled)
    }
}

/// One independent transform channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureAxis {
    Pan,
    Rotation,
    Pinch,
}

/// Recognizer payload. Values are cumulative since the gesture began.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "axis", rename_all = "snake_case")]
pub enum GestureInput {
    Pan {
        /// Translation since the gesture began.
        translation: Vec2,
        /// Absolute pointer position on the canvas.
        absolute: Point,
    },
    Rotation {
        /// Rotation in radians since the gesture began.
        rotation: f64,
    },
    Pinch {
        /// Scale factor since the gesture began.
        scale: f64,
    },
}

impl GestureInput {
    pub fn axis(&self) -> GestureAxis {
        match self {
            Self::Pan { .. } => GestureAxis::Pan,
            Self::Rotation { .. } => GestureAxis::Rotation,
            Self::Pinch { .. } => GestureAxis::Pinch,
        }
    }

    /// The neutral payload for an axis (no movement yet).
    pub fn identity(axis: GestureAxis) -> Self {
        match axis {
            GestureAxis::Pan => Self::Pan {
                translation: Vec2::ZERO,
                absolute: Point::ZERO,
            },
            GestureAxis::Rotation => Self::Rotation { rotation: 0.0 },
            GestureAxis::Pinch => Self::Pinch { scale: 1.0 },
        }
    }
}

/// Single-pointer event on the drawing canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawEvent {
    Began { position: Point },
    Moved { position: Point },
    Ended,
    Cancelled,
}
