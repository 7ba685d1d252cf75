//! Freehand drawing session.
//!
//! Collects touch samples for the stroke being drawn, commits finished
//! strokes with the current brush, and manages the committed stroke stack.

use crate::color::SerializableColor;
use crate::config::BrushDefaults;
use crate::gesture::DrawEvent;
use crate::path::{SimplifyOptions, StrokePath, create_svg_path};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Input mode of the drawing canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PenMode {
    /// Canvas input draws.
    #[default]
    Idle,
    /// The pen menu is open; the next canvas input only closes it.
    MenuOpen,
}

/// Answer to a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfirmChoice {
    No,
    Yes,
}

/// A Yes/No question the host must put to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationPrompt {
    pub title: String,
    pub message: String,
    pub cancel_label: String,
    pub confirm_label: String,
}

impl ConfirmationPrompt {
    fn delete_drawing() -> Self {
        Self {
            title: "Delete drawing".to_string(),
            message: "Are you sure you want to delete your masterpiece?".to_string(),
            cancel_label: "No".to_string(),
            confirm_label: "Yes".to_string(),
        }
    }
}

/// Result of asking to clear the drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearRequest {
    /// Nothing committed, nothing to confirm.
    Nothing,
    /// Show the prompt and call [`DrawingSession::resolve_clear`] with the answer.
    Confirm(ConfirmationPrompt),
}

/// Brush applied to the next committed stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    pub color: SerializableColor,
    pub thickness: f64,
    pub opacity: f64,
}

impl From<&BrushDefaults> for Brush {
    fn from(defaults: &BrushDefaults) -> Self {
        Self {
            color: defaults.color,
            thickness: defaults.thickness,
            opacity: defaults.opacity.clamp(0.0, 1.0),
        }
    }
}

impl Default for Brush {
    fn default() -> Self {
        Self::from(&BrushDefaults::default())
    }
}

/// Callback invoked with the committed strokes whenever they change.
pub type PathsObserver = Box<dyn FnMut(&[StrokePath]) + Send>;

/// State of the draw tool while it is open.
pub struct DrawingSession {
    /// Committed strokes in draw order.
    paths: Vec<StrokePath>,
    /// Samples of the stroke being drawn.
    current: Vec<Point>,
    brush: Brush,
    options: SimplifyOptions,
    mode: PenMode,
    /// Set while a clear confirmation is outstanding.
    clear_pending: bool,
    observer: Option<PathsObserver>,
}

impl fmt::Debug for DrawingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawingSession")
            .field("paths", &self.paths.len())
            .field("current", &self.current.len())
            .field("brush", &self.brush)
            .field("options", &self.options)
            .field("mode", &self.mode)
            .field("clear_pending", &self.clear_pending)
            .finish()
    }
}

impl Default for DrawingSession {
    fn default() -> Self {
        Self::new(Brush::default(), SimplifyOptions::default())
    }
}

impl DrawingSession {
    /// Create an empty session.
    pub fn new(brush: Brush, options: SimplifyOptions) -> Self {
        Self {
            paths: Vec::new(),
            current: Vec::new(),
            brush,
            options,
            mode: PenMode::Idle,
            clear_pending: false,
            observer: None,
        }
    }

    /// Create a session that already shows the given strokes.
    pub fn with_paths(brush: Brush, options: SimplifyOptions, paths: Vec<StrokePath>) -> Self {
        Self {
            paths,
            ..Self::new(brush, options)
        }
    }

    /// Register a callback for stroke list changes.
    pub fn set_observer(&mut self, observer: PathsObserver) {
        self.observer = Some(observer);
    }

    fn notify(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&self.paths);
        }
    }

    pub fn mode(&self) -> PenMode {
        self.mode
    }

    pub fn brush(&self) -> Brush {
        self.brush
    }

    pub fn options(&self) -> SimplifyOptions {
        self.options
    }

    /// Whether a stroke is being drawn.
    pub fn is_drawing(&self) -> bool {
        !self.current.is_empty()
    }

    /// Samples of the stroke being drawn.
    pub fn current_points(&self) -> &[Point] {
        &self.current
    }

    /// Open or close the pen menu.
    pub fn toggle_menu(&mut self) {
        self.mode = match self.mode {
            PenMode::Idle => PenMode::MenuOpen,
            PenMode::MenuOpen => PenMode::Idle,
        };
    }

    /// Return focus to the canvas. Returns whether the menu was open.
    pub fn close_menu(&mut self) -> bool {
        let was_open = self.mode == PenMode::MenuOpen;
        self.mode = PenMode::Idle;
        was_open
    }

    /// Route one canvas pointer event.
    ///
    /// With the pen menu open the event only closes the menu, except the
    /// release of a stroke that was already under way.
    pub fn handle_pointer(&mut self, event: DrawEvent) {
        match self.mode {
            // A stroke that was under way when the menu opened still ends here.
            PenMode::MenuOpen
                if self.is_drawing() && matches!(event, DrawEvent::Ended | DrawEvent::Cancelled) =>
            {
                self.commit_stroke();
            }
            PenMode::MenuOpen => {
                log::debug!("Canvas input closed the pen menu");
                self.mode = PenMode::Idle;
            }
            PenMode::Idle => match event {
                DrawEvent::Began { position } | DrawEvent::Moved { position } => self.begin_or_extend(position),
                DrawEvent::Ended | DrawEvent::Cancelled => self.commit_stroke(),
            },
        }
    }

    /// Append a sample to the stroke being drawn.
    pub fn begin_or_extend(&mut self, point: Point) {
        if self.mode == PenMode::MenuOpen {
            self.mode = PenMode::Idle;
            return;
        }
        if !(point.x.is_finite() && point.y.is_finite()) {
            log::warn!("Ignoring non-finite sample {:?}", point);
            return;
        }
        self.current.push(self.options.prepare_point(point));
    }

    /// Commit the stroke being drawn with the current brush.
    ///
    /// Strokes of fewer than two samples produce no path and are dropped.
    pub fn commit_stroke(&mut self) {
        if self.current.is_empty() {
            return;
        }

        let points = std::mem::take(&mut self.current);
        let stroke = StrokePath::from_points(
            points,
            self.brush.color,
            self.brush.thickness,
            self.brush.opacity,
            self.options.committed_tolerance(),
            self.options.round_points,
        );

        if stroke.path.is_empty() {
            log::debug!("Dropping stroke with {} sample(s)", stroke.data.len());
            return;
        }

        log::debug!("Committed stroke #{} ({} samples)", self.paths.len() + 1, stroke.data.len());
        self.paths.push(stroke);
        self.notify();
    }

    /// Live preview of the stroke being drawn.
    pub fn current_path(&self) -> String {
        create_svg_path(&self.current, self.options.live_tolerance(), self.options.round_points)
    }

    /// Remove the last committed stroke.
    pub fn undo(&mut self) {
        self.close_menu();
        if self.paths.pop().is_some() {
            log::debug!("Undo, {} stroke(s) left", self.paths.len());
            self.notify();
        }
    }

    /// Remove every stroke, committed and in progress, without asking.
    pub fn clear(&mut self) {
        let had_paths = !self.paths.is_empty();
        self.paths.clear();
        self.current.clear();
        self.clear_pending = false;
        if had_paths {
            log::debug!("Cleared drawing");
            self.notify();
        }
    }

    /// Ask to clear the drawing.
    ///
    /// An empty drawing needs no confirmation and is left untouched.
    pub fn request_clear(&mut self) -> ClearRequest {
        self.close_menu();
        if self.paths.is_empty() {
            return ClearRequest::Nothing;
        }
        self.clear_pending = true;
        ClearRequest::Confirm(ConfirmationPrompt::delete_drawing())
    }

    /// Apply the user's answer to a pending clear. Returns whether it cleared.
    pub fn resolve_clear(&mut self, choice: ConfirmChoice) -> bool {
        if !std::mem::take(&mut self.clear_pending) {
            return false;
        }
        match choice {
            ConfirmChoice::Yes => {
                self.clear();
                true
            }
            ConfirmChoice::No => false,
        }
    }

    /// Whether a clear confirmation is outstanding.
    pub fn is_clear_pending(&self) -> bool {
        self.clear_pending
    }

    /// Set the color of the next stroke.
    pub fn set_color(&mut self, color: SerializableColor) {
        self.brush.color = color;
    }

    /// Set the color of the next stroke from a CSS color string.
    pub fn set_color_str(&mut self, color: &str) {
        match SerializableColor::parse(color) {
            Ok(parsed) => self.brush.color = parsed,
            Err(e) => log::warn!("{}", e),
        }
    }

    /// Set the thickness of the next stroke. Non-positive values are ignored.
    pub fn set_thickness(&mut self, thickness: f64) {
        if thickness.is_finite() && thickness > 0.0 {
            self.brush.thickness = thickness;
        } else {
            log::warn!("Ignoring stroke thickness {}", thickness);
        }
    }

    /// Set the opacity of the next stroke, clamped into [0, 1].
    pub fn set_opacity(&mut self, opacity: f64) {
        if opacity.is_nan() {
            log::warn!("Ignoring NaN opacity");
            return;
        }
        self.brush.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Committed strokes in draw order.
    pub fn get_paths(&self) -> &[StrokePath] {
        &self.paths
    }

    /// Append an already built stroke, e.g. one restored from an earlier session.
    pub fn append_external_path(&mut self, path: StrokePath) {
        self.paths.push(path);
        self.notify();
    }

    /// Finish the session and hand the strokes to the composition.
    pub fn confirm(mut self) -> Vec<StrokePath> {
        self.commit_stroke();
        self.paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn draw(session: &mut DrawingSession, points: &[(f64, f64)]) {
        let mut iter = points.iter();
        if let Some(&(x, y)) = iter.next() {
            session.handle_pointer(DrawEvent::Began { position: Point::new(x, y) });
        }
        for &(x, y) in iter {
            session.handle_pointer(DrawEvent::Moved { position: Point::new(x, y) });
        }
        session.handle_pointer(DrawEvent::Ended);
    }

    #[test]
    fn test_thickness_applies_to_next_stroke_only() {
        let mut session = DrawingSession::default();
        session.set_thickness(10.0);
        draw(&mut session, &[(0.0, 0.0), (5.0, 5.0), (10.0, 0.0)]);

        assert_eq!(session.get_paths().len(), 1);
        assert!((session.get_paths()[0].thickness - 10.0).abs() < f64::EPSILON);
        assert!(!session.get_paths()[0].path.is_empty());

        session.set_thickness(20.0);
        draw(&mut session, &[(0.0, 10.0), (5.0, 15.0), (10.0, 10.0)]);

        assert_eq!(session.get_paths().len(), 2);
        assert!((session.get_paths()[0].thickness - 10.0).abs() < f64::EPSILON);
        assert!((session.get_paths()[1].thickness - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_undo_to_floor() {
        let mut session = DrawingSession::default();
        for i in 0..4 {
            let y = i as f64 * 10.0;
            draw(&mut session, &[(0.0, y), (20.0, y + 5.0)]);
        }
        assert_eq!(session.get_paths().len(), 4);

        for _ in 0..4 {
            session.undo();
        }
        assert!(session.get_paths().is_empty());

        session.undo();
        assert!(session.get_paths().is_empty());
    }

    #[test]
    fn test_commit_without_points_is_noop() {
        let mut session = DrawingSession::default();
        session.commit_stroke();
        assert!(session.get_paths().is_empty());
    }

    #[test]
    fn test_single_point_stroke_dropped() {
        let mut session = DrawingSession::default();
        draw(&mut session, &[(4.0, 4.0)]);
        assert!(session.get_paths().is_empty());
        assert!(!session.is_drawing());
    }

    #[test]
    fn test_cancelled_stroke_still_commits() {
        let mut session = DrawingSession::default();
        session.handle_pointer(DrawEvent::Began { position: Point::new(0.0, 0.0) });
        session.handle_pointer(DrawEvent::Moved { position: Point::new(8.0, 3.0) });
        session.handle_pointer(DrawEvent::Cancelled);

        assert_eq!(session.get_paths().len(), 1);
        assert!(!session.is_drawing());
    }

    #[test]
    fn test_menu_open_consumes_input() {
        let mut session = DrawingSession::default();
        session.toggle_menu();
        assert_eq!(session.mode(), PenMode::MenuOpen);

        session.handle_pointer(DrawEvent::Began { position: Point::new(1.0, 1.0) });
        assert_eq!(session.mode(), PenMode::Idle);
        assert!(!session.is_drawing());

        session.handle_pointer(DrawEvent::Moved { position: Point::new(2.0, 2.0) });
        assert!(session.is_drawing());
    }

    #[test]
    fn test_menu_toggled_mid_stroke_commits_on_release() {
        let mut session = DrawingSession::default();
        session.handle_pointer(DrawEvent::Began { position: Point::new(0.0, 0.0) });
        session.handle_pointer(DrawEvent::Moved { position: Point::new(50.0, 50.0) });
        session.toggle_menu();
        session.handle_pointer(DrawEvent::Ended);

        assert!(!session.is_drawing());
        assert_eq!(session.mode(), PenMode::MenuOpen);
        assert_eq!(session.get_paths().len(), 1);
        assert_eq!(session.get_paths()[0].data, vec![Point::new(0.0, 0.0), Point::new(50.0, 50.0)]);

        session.close_menu();
        draw(&mut session, &[(100.0, 100.0), (120.0, 100.0)]);
        assert_eq!(session.get_paths().len(), 2);
        assert_eq!(session.get_paths()[1].data, vec![Point::new(100.0, 100.0), Point::new(120.0, 100.0)]);
    }

    #[test]
    fn test_points_are_rounded() {
        let mut session = DrawingSession::default();
        session.begin_or_extend(Point::new(1.7, 2.2));
        assert_eq!(session.current_points(), &[Point::new(1.0, 2.0)]);

        let mut precise = DrawingSession::new(
            Brush::default(),
            SimplifyOptions {
                round_points: false,
                ..SimplifyOptions::default()
            },
        );
        precise.begin_or_extend(Point::new(1.7, 2.2));
        assert_eq!(precise.current_points(), &[Point::new(1.7, 2.2)]);
    }

    #[test]
    fn test_live_preview() {
        let mut session = DrawingSession::default();
        assert!(session.current_path().is_empty());
        session.begin_or_extend(Point::new(0.0, 0.0));
        session.begin_or_extend(Point::new(3.0, 4.0));
        assert!(!session.current_path().is_empty());
        assert!(session.get_paths().is_empty());
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let mut session = DrawingSession::default();
        assert_eq!(session.request_clear(), ClearRequest::Nothing);
        assert!(!session.is_clear_pending());

        draw(&mut session, &[(0.0, 0.0), (10.0, 10.0)]);
        draw(&mut session, &[(0.0, 5.0), (10.0, 15.0)]);

        assert!(matches!(session.request_clear(), ClearRequest::Confirm(_)));
        assert!(!session.resolve_clear(ConfirmChoice::No));
        assert_eq!(session.get_paths().len(), 2);

        assert!(matches!(session.request_clear(), ClearRequest::Confirm(_)));
        session.begin_or_extend(Point::new(50.0, 50.0));
        assert!(session.resolve_clear(ConfirmChoice::Yes));
        assert!(session.get_paths().is_empty());
        assert!(!session.is_drawing());
    }

    #[test]
    fn test_resolve_without_request_does_nothing() {
        let mut session = DrawingSession::default();
        draw(&mut session, &[(0.0, 0.0), (10.0, 10.0)]);
        assert!(!session.resolve_clear(ConfirmChoice::Yes));
        assert_eq!(session.get_paths().len(), 1);
    }

    #[test]
    fn test_brush_setters_are_permissive() {
        let mut session = DrawingSession::default();
        let before = session.brush();

        session.set_thickness(0.0);
        session.set_thickness(-3.0);
        session.set_thickness(f64::INFINITY);
        assert!((session.brush().thickness - before.thickness).abs() < f64::EPSILON);

        session.set_opacity(1.5);
        assert!((session.brush().opacity - 1.0).abs() < f64::EPSILON);
        session.set_opacity(-0.5);
        assert!(session.brush().opacity.abs() < f64::EPSILON);

        session.set_color_str("not a color");
        assert_eq!(session.brush().color, before.color);
        session.set_color_str("#ff0000");
        assert_eq!(session.brush().color, SerializableColor::new(255, 0, 0, 255));
    }

    #[test]
    fn test_brush_change_does_not_touch_committed() {
        let mut session = DrawingSession::default();
        session.set_color(SerializableColor::white());
        session.set_opacity(0.5);
        draw(&mut session, &[(0.0, 0.0), (10.0, 10.0)]);

        session.set_color(SerializableColor::black());
        session.set_opacity(1.0);

        let stroke = &session.get_paths()[0];
        assert_eq!(stroke.color, SerializableColor::white());
        assert!((stroke.opacity - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_append_external_path() {
        let mut session = DrawingSession::default();
        let restored = StrokePath::from_points(
            vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
            SerializableColor::black(),
            7.0,
            1.0,
            0.0,
            false,
        );
        session.append_external_path(restored.clone());
        assert_eq!(session.get_paths(), &[restored]);
    }

    #[test]
    fn test_observer_sees_changes() {
        let lengths = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&lengths);

        let mut session = DrawingSession::default();
        session.set_observer(Box::new(move |paths: &[StrokePath]| {
            seen.lock().unwrap().push(paths.len());
        }));

        draw(&mut session, &[(0.0, 0.0), (10.0, 10.0)]);
        draw(&mut session, &[(0.0, 5.0), (10.0, 15.0)]);
        session.undo();
        session.undo(); // back to empty
        session.undo(); // nothing to notify

        assert_eq!(*lengths.lock().unwrap(), vec![1, 2, 1, 0]);
    }

    #[test]
    fn test_confirm_commits_pending_stroke() {
        let mut session = DrawingSession::default();
        draw(&mut session, &[(0.0, 0.0), (10.0, 10.0)]);
        session.begin_or_extend(Point::new(20.0, 20.0));
        session.begin_or_extend(Point::new(30.0, 25.0));

        let paths = session.confirm();
        assert_eq!(paths.len(), 2);
    }
}
