//! Pointer normalization.
//!
//! Mouse and touch streams are folded into a single begin/update/end gesture
//! with one drag in flight at a time. The first event decides the gesture
//! kind and locks the tracker to it until the gesture ends, so a stray mouse
//! move during a touch drag (or vice versa) cannot corrupt the delta.

use crate::gate::InteractionGate;
use iced::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// Outcome of feeding a move event to the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureUpdate {
    /// Idle tracker, kind mismatch, or an event the gesture does not own.
    Ignored,
    Moved { dx: f32, dy: f32, position: Point },
    /// A multi-touch or non-primary event ended the gesture in place.
    Ended { position: Point },
}

#[derive(Debug, Default)]
pub struct PointerTracker {
    start: Option<(PointerKind, Point)>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }

    pub fn start_position(&self) -> Option<Point> {
        self.start.map(|(_, position)| position)
    }

    /// Starts a gesture. No-op when one is already in flight or the gate is
    /// not accepting input.
    pub fn begin(&mut self, kind: PointerKind, position: Point, gate: &InteractionGate) -> bool {
        if self.start.is_some() || !gate.accepts() {
            return false;
        }
        self.start = Some((kind, position));
        true
    }

    /// Feeds a move event. `primary` is false for a second finger or a
    /// non-primary pointer, which ends the gesture immediately.
    pub fn update(&mut self, kind: PointerKind, position: Point, primary: bool) -> GestureUpdate {
        let Some((owned_kind, start)) = self.start else {
            return GestureUpdate::Ignored;
        };
        if kind != owned_kind {
            return GestureUpdate::Ignored;
        }
        if !primary {
            self.start = None;
            return GestureUpdate::Ended { position };
        }
        GestureUpdate::Moved {
            dx: position.x - start.x,
            dy: position.y - start.y,
            position,
        }
    }

    /// Finalizes the gesture, yielding the release position.
    pub fn end(&mut self, kind: PointerKind, position: Point) -> Option<Point> {
        match self.start {
            Some((owned_kind, _)) if owned_kind == kind => {
                self.start = None;
                Some(position)
            }
            _ => None,
        }
    }

    /// Drops the gesture without a completion notification. Used when the
    /// collaborator that would consume it rejected the start.
    pub fn cancel(&mut self) {
        self.start = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{GestureUpdate, PointerKind, PointerTracker};
    use crate::gate::{GateState, InteractionGate};
    use iced::Point;

    fn active_gate() -> InteractionGate {
        InteractionGate::new(GateState::Active)
    }

    #[test]
    fn one_gesture_at_a_time() {
        let mut tracker = PointerTracker::new();
        assert!(tracker.begin(PointerKind::Mouse, Point::new(10.0, 10.0), &active_gate()));
        assert!(!tracker.begin(PointerKind::Touch, Point::new(0.0, 0.0), &active_gate()));
        assert!(tracker.is_active());
    }

    #[test]
    fn gate_blocks_begin() {
        let mut tracker = PointerTracker::new();
        let gate = InteractionGate::new(GateState::Disabled);
        assert!(!tracker.begin(PointerKind::Mouse, Point::new(1.0, 1.0), &gate));
        assert!(!tracker.is_active());
    }

    #[test]
    fn kind_is_locked_for_the_gesture() {
        let mut tracker = PointerTracker::new();
        tracker.begin(PointerKind::Touch, Point::new(0.0, 0.0), &active_gate());
        assert_eq!(
            tracker.update(PointerKind::Mouse, Point::new(5.0, 5.0), true),
            GestureUpdate::Ignored
        );
        assert_eq!(tracker.end(PointerKind::Mouse, Point::new(5.0, 5.0)), None);
        assert!(tracker.is_active());
    }

    #[test]
    fn moves_report_delta_from_start() {
        let mut tracker = PointerTracker::new();
        tracker.begin(PointerKind::Mouse, Point::new(100.0, 40.0), &active_gate());
        match tracker.update(PointerKind::Mouse, Point::new(130.0, 30.0), true) {
            GestureUpdate::Moved { dx, dy, .. } => {
                assert_eq!(dx, 30.0);
                assert_eq!(dy, -10.0);
            }
            other => panic!("expected Moved, got {other:?}"),
        }
    }

    #[test]
    fn second_finger_ends_the_gesture() {
        let mut tracker = PointerTracker::new();
        tracker.begin(PointerKind::Touch, Point::new(0.0, 0.0), &active_gate());
        let update = tracker.update(PointerKind::Touch, Point::new(3.0, 3.0), false);
        assert!(matches!(update, GestureUpdate::Ended { .. }));
        assert!(!tracker.is_active());
    }

    #[test]
    fn events_while_idle_are_ignored() {
        let mut tracker = PointerTracker::new();
        assert_eq!(
            tracker.update(PointerKind::Mouse, Point::new(1.0, 1.0), true),
            GestureUpdate::Ignored
        );
        assert_eq!(tracker.end(PointerKind::Mouse, Point::new(1.0, 1.0)), None);
    }
}
