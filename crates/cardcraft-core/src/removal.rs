//! Drag-to-delete advisory signal.
//!
//! While an element that supports drag removal is being panned, the host is
//! told whether the pointer is over the delete target near the bottom of the
//! canvas. The signal is advisory; the host decides how to show it.

use std::sync::mpsc::Sender;

/// Default threshold, as a percentage of canvas height from the top.
pub const DEFAULT_DELETE_ZONE_PERCENT: f64 = 75.0;

/// Receiver of the "show delete target" signal.
///
/// Gesture callbacks run on the UI thread; sinks must be `Send` so the
/// signal can be handed over to application code on another thread.
pub trait DeleteTargetSink: Send {
    fn show_delete_target(&mut self, visible: bool);
}

impl<F> DeleteTargetSink for F
where
    F: FnMut(bool) + Send,
{
    fn show_delete_target(&mut self, visible: bool) {
        self(visible)
    }
}

/// Forwards the signal over a channel to another thread.
#[derive(Debug, Clone)]
pub struct ChannelSink(pub Sender<bool>);

impl DeleteTargetSink for ChannelSink {
    fn show_delete_target(&mut self, visible: bool) {
        if self.0.send(visible).is_err() {
            log::warn!("Delete target receiver dropped");
        }
    }
}

/// Edge-detecting tracker for one pan gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeleteTargetTracker {
    /// Canvas height used to normalize the pointer position.
    canvas_height: f64,
    /// Threshold in percent from the top.
    threshold_percent: f64,
    /// Last value reported to the sink.
    last_reported: Option<bool>,
}

impl DeleteTargetTracker {
    pub fn new(canvas_height: f64, threshold_percent: f64) -> Self {
        Self {
            canvas_height,
            threshold_percent,
            last_reported: None,
        }
    }

    /// Whether an absolute canvas Y position is over the delete target.
    pub fn is_over_target(&self, absolute_y: f64) -> bool {
        if self.canvas_height.is_nan() || self.canvas_height <= 0.0 {
            return false;
        }
        let percentage_from_top = absolute_y / self.canvas_height * 100.0;
        percentage_from_top > self.threshold_percent
    }

    /// Whether the last reported state was "over the target".
    pub fn is_active(&self) -> bool {
        self.last_reported == Some(true)
    }

    /// Report a pan update. Only changes reach the sink.
    pub fn update(&mut self, absolute_y: f64, sink: &mut dyn DeleteTargetSink) -> bool {
        let over = self.is_over_target(absolute_y);
        if self.last_reported != Some(over) {
            self.last_reported = Some(over);
            sink.show_delete_target(over);
        }
        over
    }

    /// Report the end of the pan. Always sends `false` once and resets.
    ///
    /// Returns whether the pointer was over the target at release.
    pub fn release(&mut self, sink: &mut dyn DeleteTargetSink) -> bool {
        let was_over = self.is_active();
        self.last_reported = None;
        sink.show_delete_target(false);
        was_over
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_threshold() {
        let tracker = DeleteTargetTracker::new(800.0, DEFAULT_DELETE_ZONE_PERCENT);
        assert!(!tracker.is_over_target(600.0)); // exactly 75%
        assert!(tracker.is_over_target(601.0));
        assert!(!tracker.is_over_target(100.0));
    }

    #[test]
    fn test_zero_height_never_triggers() {
        let tracker = DeleteTargetTracker::new(0.0, DEFAULT_DELETE_ZONE_PERCENT);
        assert!(!tracker.is_over_target(1000.0));
    }

    #[test]
    fn test_drag_and_release_sequence() {
        let mut events = Vec::new();
        let mut tracker = DeleteTargetTracker::new(1000.0, DEFAULT_DELETE_ZONE_PERCENT);
        {
            let mut sink = |visible: bool| events.push(visible);
            tracker.update(900.0, &mut sink);
            tracker.update(950.0, &mut sink);
            assert!(tracker.release(&mut sink));
        }
        assert_eq!(events, vec![true, false]);
    }

    #[test]
    fn test_leaving_zone_reports_false() {
        let mut events = Vec::new();
        let mut tracker = DeleteTargetTracker::new(1000.0, DEFAULT_DELETE_ZONE_PERCENT);
        {
            let mut sink = |visible: bool| events.push(visible);
            tracker.update(100.0, &mut sink);
            tracker.update(900.0, &mut sink);
            tracker.update(200.0, &mut sink);
            assert!(!tracker.release(&mut sink));
        }
        assert_eq!(events, vec![false, true, false, false]);
    }

    #[test]
    fn test_channel_sink_crosses_threads() {
        let (tx, rx) = mpsc::channel();
        let mut sink = ChannelSink(tx);
        let mut tracker = DeleteTargetTracker::new(100.0, DEFAULT_DELETE_ZONE_PERCENT);

        tracker.update(90.0, &mut sink);
        tracker.release(&mut sink);
        drop(sink);

        let handle = std::thread::spawn(move || rx.iter().collect::<Vec<bool>>());
        assert_eq!(handle.join().unwrap(), vec![true, false]);
    }
}
