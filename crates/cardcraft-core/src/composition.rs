//! The card being composed.
//!
//! Holds the chosen background, the placed elements in z-order, the
//! committed strokes and the active tool, and produces the declarative scene
//! the host renders each frame.

use crate::color::SerializableColor;
use crate::config::CardConfig;
use crate::drawing::{Brush, DrawingSession};
use crate::element::{ElementContent, ElementId, ImageDescriptor, PlacedElement, Sticker, TextContent};
use crate::gesture::{GestureInput, GesturePhase};
use crate::path::{SimplifyOptions, StrokePath};
use crate::removal::{DeleteTargetSink, DeleteTargetTracker};
use crate::transform::RenderStyle;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Tools available on the composition screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Main,
    Text,
    Image,
    Camera,
    Emoji,
    Draw,
}

/// Vertical placement of the background template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalPosition {
    #[default]
    FlexStart,
    Center,
    FlexEnd,
}

/// Occasion and template chosen before composing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Background {
    /// Occasion key, e.g. `birthday`.
    pub occasion: String,
    /// Background template key.
    pub template: String,
    /// Fill behind the template image.
    pub color: SerializableColor,
    /// Square template box instead of full height.
    #[serde(default)]
    pub boxed: bool,
    #[serde(default)]
    pub vertical_position: VerticalPosition,
    /// Draw the curved gradient strip over the template.
    #[serde(default)]
    pub curved_gradient: bool,
}

impl Background {
    pub fn new(occasion: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            occasion: occasion.into(),
            template: template.into(),
            color: SerializableColor::white(),
            boxed: false,
            vertical_position: VerticalPosition::default(),
            curved_gradient: false,
        }
    }
}

/// Placed element as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedElement {
    pub id: ElementId,
    pub content: ElementContent,
    pub style: RenderStyle,
}

/// Everything the host needs to draw one frame, back to front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderScene {
    pub background: Background,
    /// Stroke overlay above the background. Empty while the draw tool is
    /// open, since the draw tool renders its own strokes.
    pub strokes: Vec<StrokePath>,
    pub elements: Vec<RenderedElement>,
    /// Whether the delete target should be visible.
    pub show_delete_target: bool,
}

/// An in-progress greeting card.
pub struct Composition {
    background: Background,
    /// Elements back to front.
    elements: Vec<PlacedElement>,
    strokes: Vec<StrokePath>,
    tool: ToolKind,
    canvas: Size,
    delete_zone_percent: f64,
    brush: Brush,
    simplify: SimplifyOptions,
    /// Trackers for pans in progress.
    delete_trackers: HashMap<ElementId, DeleteTargetTracker>,
    delete_sink: Option<Box<dyn DeleteTargetSink>>,
}

impl fmt::Debug for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composition")
            .field("background", &self.background)
            .field("elements", &self.elements.len())
            .field("strokes", &self.strokes.len())
            .field("tool", &self.tool)
            .field("canvas", &self.canvas)
            .finish_non_exhaustive()
    }
}

impl Composition {
    /// Start a composition with default settings.
    pub fn new(background: Background) -> Self {
        Self::with_config(background, &CardConfig::default())
    }

    /// Start a composition from a config.
    pub fn with_config(background: Background, config: &CardConfig) -> Self {
        Self {
            background,
            elements: Vec::new(),
            strokes: config.brush.paths.clone(),
            tool: ToolKind::Main,
            canvas: Size::new(config.canvas.width, config.canvas.height),
            delete_zone_percent: config.canvas.delete_zone_percent,
            brush: Brush::from(&config.brush),
            simplify: config.simplify,
            delete_trackers: HashMap::new(),
            delete_sink: None,
        }
    }

    /// Register the receiver of the delete-target signal.
    pub fn set_delete_target_sink(&mut self, sink: Box<dyn DeleteTargetSink>) {
        self.delete_sink = Some(sink);
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    /// Replace the background selection.
    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Switch tools. The emoji tray toggles back to the main toolbar.
    pub fn select_tool(&mut self, tool: ToolKind) {
        self.tool = if tool == ToolKind::Emoji && self.tool == ToolKind::Emoji {
            ToolKind::Main
        } else {
            tool
        };
    }

    /// Committed strokes.
    pub fn strokes(&self) -> &[StrokePath] {
        &self.strokes
    }

    /// Elements back to front.
    pub fn elements(&self) -> &[PlacedElement] {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> Option<&PlacedElement> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut PlacedElement> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    fn insert(&mut self, content: ElementContent) -> ElementId {
        let element = PlacedElement::new(content, self.canvas.width);
        let id = element.id();
        self.elements.push(element);
        self.tool = ToolKind::Main;
        id
    }

    /// Add a text element on top.
    pub fn add_text(&mut self, text: TextContent) -> ElementId {
        self.insert(ElementContent::Text(text))
    }

    /// Replace a text element's payload and raise it to the top.
    ///
    /// Returns false when the id is unknown or not a text element.
    pub fn update_text(&mut self, id: ElementId, text: TextContent) -> bool {
        let Some(index) = self.elements.iter().position(|e| e.id() == id) else {
            return false;
        };
        if !matches!(self.elements[index].content, ElementContent::Text(_)) {
            return false;
        }

        let mut element = self.elements.remove(index);
        element.set_content(ElementContent::Text(text), self.canvas.width);
        self.elements.push(element);
        self.tool = ToolKind::Main;
        true
    }

    /// Add a photo picked from the gallery.
    pub fn add_image(&mut self, image: ImageDescriptor) -> ElementId {
        self.insert(ElementContent::Image(image))
    }

    /// Add a photo from the front camera. Rendered mirrored.
    pub fn add_camera_photo(&mut self, mut image: ImageDescriptor) -> ElementId {
        image.mirrored = true;
        self.insert(ElementContent::Image(image))
    }

    /// Add a sticker from the tray.
    pub fn add_sticker(&mut self, sticker: Sticker) -> ElementId {
        self.insert(ElementContent::Sticker(sticker))
    }

    /// Remove an element.
    pub fn remove_element(&mut self, id: ElementId) -> Option<PlacedElement> {
        let index = self.elements.iter().position(|e| e.id() == id)?;
        self.delete_trackers.remove(&id);
        log::debug!("Removed element {}", id);
        Some(self.elements.remove(index))
    }

    /// Route a recognizer callback to an element.
    ///
    /// Pans on elements that support drag removal drive the delete-target
    /// signal. A pan released over the target removes the element, which is
    /// returned.
    pub fn handle_gesture(&mut self, id: ElementId, phase: GesturePhase, input: GestureInput) -> Option<PlacedElement> {
        let canvas_height = self.canvas.height;
        let threshold = self.delete_zone_percent;

        let element = match self.elements.iter_mut().find(|e| e.id() == id) {
            Some(element) => element,
            None => {
                log::warn!("Gesture for unknown element {}", id);
                return None;
            }
        };
        element.handle_gesture(phase, input);

        if !element.supports_drag_removal() {
            return None;
        }
        let GestureInput::Pan { absolute, .. } = input else {
            return None;
        };

        let mut released_over_target = false;
        {
            let mut noop = |_: bool| {};
            let sink: &mut dyn DeleteTargetSink = match self.delete_sink.as_mut() {
                Some(sink) => sink.as_mut(),
                None => &mut noop,
            };

            if phase.is_finished() {
                if let Some(mut tracker) = self.delete_trackers.remove(&id) {
                    released_over_target = tracker.release(sink);
                }
            } else {
                self.delete_trackers
                    .entry(id)
                    .or_insert_with(|| DeleteTargetTracker::new(canvas_height, threshold))
                    .update(absolute.y, sink);
            }
        }

        if released_over_target {
            self.remove_element(id)
        } else {
            None
        }
    }

    /// Open the draw tool with the strokes drawn so far.
    pub fn start_drawing(&mut self) -> DrawingSession {
        self.tool = ToolKind::Draw;
        DrawingSession::with_paths(self.brush, self.simplify, self.strokes.clone())
    }

    /// Store the strokes confirmed in the draw tool and return to the main toolbar.
    ///
    /// The brush is remembered for the next time the tool opens.
    pub fn finish_drawing(&mut self, session: DrawingSession) {
        self.brush = session.brush();
        self.strokes = session.confirm();
        self.tool = ToolKind::Main;
        log::debug!("Drawing confirmed with {} stroke(s)", self.strokes.len());
    }

    /// Close the draw tool without keeping its changes.
    pub fn discard_drawing(&mut self, session: DrawingSession) {
        drop(session);
        self.tool = ToolKind::Main;
    }

    /// Scene to render, back to front.
    pub fn render_scene(&self) -> RenderScene {
        let strokes = if self.tool == ToolKind::Draw {
            Vec::new()
        } else {
            self.strokes.clone()
        };

        RenderScene {
            background: self.background.clone(),
            strokes,
            elements: self
                .elements
                .iter()
                .map(|element| RenderedElement {
                    id: element.id(),
                    content: element.content.clone(),
                    style: element.render_style(),
                })
                .collect(),
            show_delete_target: self.delete_trackers.values().any(|t| t.is_active()),
        }
    }
}
