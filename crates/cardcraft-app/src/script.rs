//! Recorded gesture scripts.
//!
//! A script names the background and lists user intents in order. Elements
//! are referred to by labels chosen in the script, since their ids are only
//! known once they are created.

use cardcraft_core::{
    Background, CardConfig, ClearRequest, Composition, ConfirmChoice, DrawEvent, DrawingSession, ElementId,
    GestureInput, GesturePhase, ImageDescriptor, RenderScene, Sticker, TextContent, ToolKind,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Replay errors.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Step {step}: unknown element label '{label}'")]
    UnknownLabel { step: usize, label: String },
    #[error("Step {step}: label '{label}' is already in use")]
    DuplicateLabel { step: usize, label: String },
    #[error("Step {step}: the draw tool is not open")]
    NotDrawing { step: usize },
    #[error("Step {step}: the draw tool is already open")]
    AlreadyDrawing { step: usize },
    #[error("Step {step}: '{label}' is not a text element")]
    NotText { step: usize, label: String },
}

/// One user intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    AddText { label: String, text: TextContent },
    UpdateText { label: String, text: TextContent },
    AddImage { label: String, image: ImageDescriptor },
    AddCameraPhoto { label: String, image: ImageDescriptor },
    AddSticker { label: String, sticker: Sticker },
    Remove { label: String },
    Gesture { label: String, phase: GesturePhase, input: GestureInput },
    SelectTool { tool: ToolKind },
    StartDrawing,
    Draw { event: DrawEvent },
    Brush {
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        thickness: Option<f64>,
        #[serde(default)]
        opacity: Option<f64>,
    },
    ToggleMenu,
    Undo,
    /// Ask to clear; `confirm` is the user's answer to the prompt.
    Clear { confirm: bool },
    FinishDrawing,
}

/// A recorded session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    pub background: Background,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Replays a script against a fresh composition.
#[derive(Debug)]
pub struct Replay {
    composition: Composition,
    drawing: Option<DrawingSession>,
    labels: HashMap<String, ElementId>,
}

impl Replay {
    pub fn new(background: Background, config: &CardConfig) -> Self {
        Self {
            composition: Composition::with_config(background, config),
            drawing: None,
            labels: HashMap::new(),
        }
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    fn bind(&mut self, step: usize, label: String, id: ElementId) -> Result<(), ScriptError> {
        if self.labels.contains_key(&label) {
            return Err(ScriptError::DuplicateLabel { step, label });
        }
        self.labels.insert(label, id);
        Ok(())
    }

    fn lookup(&self, step: usize, label: &str) -> Result<ElementId, ScriptError> {
        self.labels.get(label).copied().ok_or_else(|| ScriptError::UnknownLabel {
            step,
            label: label.to_string(),
        })
    }

    fn session(&mut self, step: usize) -> Result<&mut DrawingSession, ScriptError> {
        self.drawing.as_mut().ok_or(ScriptError::NotDrawing { step })
    }

    /// Apply one step.
    pub fn apply(&mut self, step: usize, action: Step) -> Result<(), ScriptError> {
        log::debug!("Step {}: {:?}", step, action);
        match action {
            Step::AddText { label, text } => {
                let id = self.composition.add_text(text);
                self.bind(step, label, id)?;
            }
            Step::UpdateText { label, text } => {
                let id = self.lookup(step, &label)?;
                if !self.composition.update_text(id, text) {
                    return Err(ScriptError::NotText { step, label });
                }
            }
            Step::AddImage { label, image } => {
                let id = self.composition.add_image(image);
                self.bind(step, label, id)?;
            }
            Step::AddCameraPhoto { label, image } => {
                let id = self.composition.add_camera_photo(image);
                self.bind(step, label, id)?;
            }
            Step::AddSticker { label, sticker } => {
                let id = self.composition.add_sticker(sticker);
                self.bind(step, label, id)?;
            }
            Step::Remove { label } => {
                let id = self.lookup(step, &label)?;
                self.composition.remove_element(id);
                self.labels.remove(&label);
            }
            Step::Gesture { label, phase, input } => {
                let id = self.lookup(step, &label)?;
                if self.composition.handle_gesture(id, phase, input).is_some() {
                    log::info!("'{}' dropped on the delete target", label);
                    self.labels.remove(&label);
                }
            }
            Step::SelectTool { tool } => self.composition.select_tool(tool),
            Step::StartDrawing => {
                if self.drawing.is_some() {
                    return Err(ScriptError::AlreadyDrawing { step });
                }
                self.drawing = Some(self.composition.start_drawing());
            }
            Step::Draw { event } => self.session(step)?.handle_pointer(event),
            Step::Brush {
                color,
                thickness,
                opacity,
            } => {
                let session = self.session(step)?;
                if let Some(color) = color {
                    session.set_color_str(&color);
                }
                if let Some(thickness) = thickness {
                    session.set_thickness(thickness);
                }
                if let Some(opacity) = opacity {
                    session.set_opacity(opacity);
                }
            }
            Step::ToggleMenu => self.session(step)?.toggle_menu(),
            Step::Undo => self.session(step)?.undo(),
            Step::Clear { confirm } => {
                let session = self.session(step)?;
                if let ClearRequest::Confirm(prompt) = session.request_clear() {
                    log::info!("{}: {} -> {}", prompt.title, prompt.message, if confirm { "Yes" } else { "No" });
                    session.resolve_clear(if confirm { ConfirmChoice::Yes } else { ConfirmChoice::No });
                }
            }
            Step::FinishDrawing => {
                let session = self.drawing.take().ok_or(ScriptError::NotDrawing { step })?;
                self.composition.finish_drawing(session);
            }
        }
        Ok(())
    }

    /// Run every step of a script and return the final scene.
    ///
    /// A draw tool left open at the end is confirmed.
    pub fn run(mut self, steps: Vec<Step>) -> Result<RenderScene, ScriptError> {
        for (i, step) in steps.into_iter().enumerate() {
            self.apply(i + 1, step)?;
        }
        if let Some(session) = self.drawing.take() {
            self.composition.finish_drawing(session);
        }
        Ok(self.composition.render_scene())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r##"{
        "background": {"occasion": "birthday", "template": "balloons", "color": "#ffcc00"},
        "steps": [
            {"op": "add_image", "label": "photo", "image": {"uri": "file://a.jpg", "width": 1200, "height": 600}},
            {"op": "gesture", "label": "photo", "phase": "began", "input": {"axis": "pinch", "scale": 1.0}},
            {"op": "gesture", "label": "photo", "phase": "active", "input": {"axis": "pinch", "scale": 2.0}},
            {"op": "gesture", "label": "photo", "phase": "ended", "input": {"axis": "pinch", "scale": 2.0}},
            {"op": "start_drawing"},
            {"op": "brush", "thickness": 10},
            {"op": "draw", "event": {"kind": "began", "position": {"x": 0, "y": 0}}},
            {"op": "draw", "event": {"kind": "moved", "position": {"x": 5, "y": 5}}},
            {"op": "draw", "event": {"kind": "moved", "position": {"x": 10, "y": 0}}},
            {"op": "draw", "event": {"kind": "ended"}},
            {"op": "finish_drawing"}
        ]
    }"##;

    #[test]
    fn test_replay_script() {
        let script: Script = serde_json::from_str(SCRIPT).unwrap();
        let scene = Replay::new(script.background, &CardConfig::default()).run(script.steps).unwrap();

        assert_eq!(scene.strokes.len(), 1);
        assert!((scene.strokes[0].thickness - 10.0).abs() < f64::EPSILON);
        assert_eq!(scene.elements.len(), 1);
        assert!((scene.elements[0].style.width - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_label() {
        let mut replay = Replay::new(Background::new("birthday", "plain"), &CardConfig::default());
        let result = replay.apply(1, Step::Remove { label: "ghost".to_string() });
        assert!(matches!(result, Err(ScriptError::UnknownLabel { .. })));
    }

    #[test]
    fn test_draw_requires_open_tool() {
        let mut replay = Replay::new(Background::new("birthday", "plain"), &CardConfig::default());
        assert!(matches!(replay.apply(1, Step::Undo), Err(ScriptError::NotDrawing { step: 1 })));
    }

    #[test]
    fn test_declined_clear_keeps_strokes() {
        let mut replay = Replay::new(Background::new("birthday", "plain"), &CardConfig::default());
        let steps = vec![
            Step::StartDrawing,
            Step::Draw { event: DrawEvent::Began { position: kurbo::Point::new(0.0, 0.0) } },
            Step::Draw { event: DrawEvent::Moved { position: kurbo::Point::new(9.0, 9.0) } },
            Step::Draw { event: DrawEvent::Ended },
            Step::Clear { confirm: false },
        ];
        for (i, step) in steps.into_iter().enumerate() {
            replay.apply(i + 1, step).unwrap();
        }
        assert_eq!(replay.drawing.as_ref().unwrap().get_paths().len(), 1);

        replay.apply(6, Step::Clear { confirm: true }).unwrap();
        assert!(replay.drawing.as_ref().unwrap().get_paths().is_empty());
    }
}
