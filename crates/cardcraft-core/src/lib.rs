//! CardCraft Core Library
//!
//! Platform-agnostic drawing and gesture-transform logic for the CardCraft
//! greeting card composer. Rendering, pickers and navigation live in the host
//! shell; this crate only owns state and emits declarative render data.

pub mod color;
pub mod composition;
pub mod config;
pub mod drawing;
pub mod element;
pub mod gesture;
pub mod path;
pub mod removal;
pub mod storage;
pub mod transform;

pub use color::SerializableColor;
pub use composition::{Background, Composition, RenderScene, ToolKind};
pub use config::{BrushDefaults, CanvasConfig, CardConfig, ConfigError};
pub use drawing::{Brush, ClearRequest, ConfirmChoice, ConfirmationPrompt, DrawingSession, PenMode};
pub use element::{ElementContent, ElementId, ImageDescriptor, PlacedElement, Sticker, TextAlign, TextContent};
pub use gesture::{DrawEvent, GestureAxis, GestureInput, GesturePhase};
pub use path::{SimplifyOptions, StrokePath, create_svg_path};
pub use removal::{ChannelSink, DeleteTargetSink, DeleteTargetTracker};
pub use transform::{ElementTransform, RenderStyle, TransformState};
