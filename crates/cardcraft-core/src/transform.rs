//! Per-element transform state driven by concurrent gesture recognizers.
//!
//! Pan, rotation and pinch recognizers run simultaneously on the same
//! element and each one reports values relative to its own start. Every axis
//! therefore snapshots its field when its gesture begins and composes the
//! reported delta onto that snapshot, so concurrent gestures combine instead
//! of overwriting each other.

use crate::gesture::{GestureAxis, GestureInput, GesturePhase};
use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Cumulative transform of a placed element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformState {
    /// Horizontal offset from the element origin.
    pub translate_x: f64,
    /// Vertical offset from the element origin.
    pub translate_y: f64,
    /// Rotation in radians.
    pub rotation: f64,
    /// Multiplicative scale, always positive.
    pub scale: f64,
}

impl Default for TransformState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TransformState {
    pub const IDENTITY: Self = Self {
        translate_x: 0.0,
        translate_y: 0.0,
        rotation: 0.0,
        scale: 1.0,
    };

    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.translate_x, self.translate_y)
    }

    /// Rotation in degrees, as consumed by view styles.
    pub fn rotation_degrees(&self) -> f64 {
        self.rotation.to_degrees()
    }

    /// Render transform: translate, then rotate, then scale.
    pub fn affine(&self) -> Affine {
        Affine::translate(self.translation()) * Affine::rotate(self.rotation) * Affine::scale(self.scale)
    }
}

/// New translation from the pan baseline.
pub fn pan_reducer(baseline: Vec2, translation: Vec2) -> Vec2 {
    baseline + translation
}

/// New rotation from the rotation baseline.
pub fn rotation_reducer(baseline: f64, rotation: f64) -> f64 {
    baseline + rotation
}

/// New scale from the pinch baseline. Pinch composes multiplicatively.
pub fn pinch_reducer(baseline: f64, scale: f64) -> f64 {
    baseline * scale
}

/// Field values captured when each axis' gesture began.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct AxisBaselines {
    pan: Option<Vec2>,
    rotation: Option<f64>,
    scale: Option<f64>,
}

/// Declarative style for the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    pub translate_x: f64,
    pub translate_y: f64,
    /// Rotation in degrees.
    pub rotate_degrees: f64,
    pub scale: f64,
    /// Element box width (`base width * scale`).
    pub width: f64,
    /// Element box height (`base height * scale`).
    pub height: f64,
    /// Font size for text elements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Flip horizontally (front camera captures).
    #[serde(default)]
    pub mirrored: bool,
}

/// Transform state owned by a placed element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementTransform {
    state: TransformState,
    /// Unscaled element box size.
    base_size: Size,
    baselines: AxisBaselines,
}

impl ElementTransform {
    /// Create an identity transform for an element of the given base size.
    pub fn new(base_size: Size) -> Self {
        Self::with_state(TransformState::IDENTITY, base_size)
    }

    /// Create from an existing state.
    pub fn with_state(state: TransformState, base_size: Size) -> Self {
        Self {
            state,
            base_size,
            baselines: AxisBaselines::default(),
        }
    }

    pub fn state(&self) -> TransformState {
        self.state
    }

    pub fn base_size(&self) -> Size {
        self.base_size
    }

    /// Box size after scaling. Recomputed from the base so images grow in
    /// pixels instead of being stretched.
    pub fn size(&self) -> Size {
        self.base_size * self.state.scale
    }

    /// Whether a gesture on the axis is in progress.
    pub fn is_active(&self, axis: GestureAxis) -> bool {
        match axis {
            GestureAxis::Pan => self.baselines.pan.is_some(),
            GestureAxis::Rotation => self.baselines.rotation.is_some(),
            GestureAxis::Pinch => self.baselines.scale.is_some(),
        }
    }

    /// Snapshot the axis' field at gesture start.
    pub fn begin(&mut self, axis: GestureAxis) {
        match axis {
            GestureAxis::Pan => self.baselines.pan = Some(self.state.translation()),
            GestureAxis::Rotation => self.baselines.rotation = Some(self.state.rotation),
            GestureAxis::Pinch => self.baselines.scale = Some(self.state.scale),
        }
    }

    /// Compose a recognizer delta onto the axis baseline.
    ///
    /// An update without a prior `begin` snapshots the current value first.
    pub fn update(&mut self, input: GestureInput) {
        if !self.is_active(input.axis()) {
            self.begin(input.axis());
        }

        match input {
            GestureInput::Pan { translation, .. } => {
                if !(translation.x.is_finite() && translation.y.is_finite()) {
                    log::warn!("Ignoring non-finite translation {:?}", translation);
                    return;
                }
                let baseline = self.baselines.pan.unwrap_or_else(|| self.state.translation());
                let translated = pan_reducer(baseline, translation);
                self.state.translate_x = translated.x;
                self.state.translate_y = translated.y;
            }
            GestureInput::Rotation { rotation } => {
                if !rotation.is_finite() {
                    log::warn!("Ignoring non-finite rotation {}", rotation);
                    return;
                }
                let baseline = self.baselines.rotation.unwrap_or(self.state.rotation);
                self.state.rotation = rotation_reducer(baseline, rotation);
            }
            GestureInput::Pinch { scale } => {
                if !(scale.is_finite() && scale > 0.0) {
                    log::warn!("Ignoring pinch scale {}", scale);
                    return;
                }
                let baseline = self.baselines.scale.unwrap_or(self.state.scale);
                let scaled = pinch_reducer(baseline, scale);
                if !(scaled.is_finite() && scaled > 0.0) {
                    log::warn!("Ignoring pinch scale {} that overflows to {}", scale, scaled);
                    return;
                }
                self.state.scale = scaled;
            }
        }
    }

    /// Finish the axis' gesture. The last value stays in place.
    pub fn end(&mut self, axis: GestureAxis) {
        match axis {
            GestureAxis::Pan => self.baselines.pan = None,
            GestureAxis::Rotation => self.baselines.rotation = None,
            GestureAxis::Pinch => self.baselines.scale = None,
        }
    }

    /// Dispatch one recognizer callback by phase.
    pub fn handle(&mut self, phase: GesturePhase, input: GestureInput) {
        match phase {
            GesturePhase::Began => {
                self.begin(input.axis());
                self.update(input);
            }
            GesturePhase::Active => self.update(input),
            GesturePhase::Ended | GesturePhase::Cancelled => self.end(input.axis()),
        }
    }

    /// Style for the rendering layer.
    pub fn render_style(&self) -> RenderStyle {
        let size = self.size();
        RenderStyle {
            translate_x: self.state.translate_x,
            translate_y: self.state.translate_y,
            rotate_degrees: self.state.rotation_degrees(),
            scale: self.state.scale,
            width: size.width,
            height: size.height,
            font_size: None,
            mirrored: false,
        }
    }

    /// Full render transform.
    pub fn affine(&self) -> Affine {
        self.state.affine()
    }

    /// Map a point in element space to canvas space.
    pub fn to_canvas(&self, point: Point) -> Point {
        self.affine() * point
    }
}
