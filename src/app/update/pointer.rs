//! Pointer handlers: one gesture in flight, owned by either the page flip
//! or a carried building item.

use super::super::state::{App, DragTarget};
use super::Effect;
use crate::gesture::{GestureUpdate, PointerKind};
use iced::Point;
use tracing::debug;

impl App {
    pub(super) fn handle_pointer_pressed(&mut self, effects: &mut Vec<Effect>) {
        self.begin_gesture(PointerKind::Mouse, self.cursor, effects);
    }

    pub(super) fn handle_pointer_moved(&mut self, position: Point, effects: &mut Vec<Effect>) {
        self.cursor = position;
        match self.tracker.update(PointerKind::Mouse, position, true) {
            GestureUpdate::Moved { position, .. } => self.drag_to(position),
            GestureUpdate::Ended { position } => self.finish_gesture(position, effects),
            GestureUpdate::Ignored => {}
        }
    }

    pub(super) fn handle_pointer_released(&mut self, effects: &mut Vec<Effect>) {
        if let Some(position) = self.tracker.end(PointerKind::Mouse, self.cursor) {
            self.finish_gesture(position, effects);
        }
    }

    pub(super) fn handle_touch_started(
        &mut self,
        finger: u64,
        position: Point,
        effects: &mut Vec<Effect>,
    ) {
        if self.tracker.is_active() {
            // A second finger ends the gesture where it stands.
            if let GestureUpdate::Ended { position } =
                self.tracker.update(PointerKind::Touch, position, false)
            {
                self.finish_gesture(position, effects);
            }
            self.active_finger = None;
            return;
        }
        self.active_finger = Some(finger);
        self.begin_gesture(PointerKind::Touch, position, effects);
    }

    pub(super) fn handle_touch_moved(&mut self, finger: u64, position: Point) {
        if self.active_finger != Some(finger) {
            return;
        }
        if let GestureUpdate::Moved { position, .. } =
            self.tracker.update(PointerKind::Touch, position, true)
        {
            self.drag_to(position);
        }
    }

    pub(super) fn handle_touch_ended(
        &mut self,
        finger: u64,
        position: Point,
        effects: &mut Vec<Effect>,
    ) {
        if self.active_finger != Some(finger) {
            return;
        }
        self.active_finger = None;
        if let Some(position) = self.tracker.end(PointerKind::Touch, position) {
            self.finish_gesture(position, effects);
        }
    }

    /// The platform dropped the finger without a lift event. The flip still
    /// has to land somewhere, so it finishes from its current position; a
    /// carried item is simply put back.
    pub(super) fn handle_touch_lost(&mut self, finger: u64) {
        if self.active_finger != Some(finger) {
            return;
        }
        self.active_finger = None;
        self.tracker.cancel();
        if self.drag_target.take() == Some(DragTarget::Flip) {
            self.book.end_drag();
        }
    }

    fn begin_gesture(&mut self, kind: PointerKind, position: Point, effects: &mut Vec<Effect>) {
        // A press on a building item claims the gesture outright; while the
        // game refuses input it still must not turn the page.
        if let Some(item) = self.item_at(position) {
            if self.gate.accepts() && self.tracker.begin(kind, position, self.building.gate()) {
                debug!(item, "Picked up a building item");
                self.drag_target = Some(DragTarget::Item { item, position });
            }
            return;
        }
        if !self.tracker.begin(kind, position, &self.gate) {
            return;
        }
        let x = self.flip_coordinate(position.x);
        let mut events = Vec::new();
        if self.book.begin_drag(x, &mut events) {
            self.drag_target = Some(DragTarget::Flip);
            self.drain_book_events(events, effects);
        } else {
            self.tracker.cancel();
        }
    }

    fn drag_to(&mut self, position: Point) {
        match &mut self.drag_target {
            Some(DragTarget::Flip) => {
                let x = self.flip_coordinate(position.x);
                self.book.drag(x);
            }
            Some(DragTarget::Item {
                position: carried, ..
            }) => *carried = position,
            None => {}
        }
    }

    fn finish_gesture(&mut self, position: Point, effects: &mut Vec<Effect>) {
        match self.drag_target.take() {
            Some(DragTarget::Flip) => self.book.end_drag(),
            Some(DragTarget::Item { item, .. }) => {
                if self.platform_contains(position) {
                    let actions = self.building.drop_item(item);
                    if let Some(page) = self.building_page {
                        self.route_media(page, actions, effects);
                    }
                } else {
                    debug!(item, "Item released off the platform");
                }
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::app::state::{App, DragTarget};
    use crate::config::AppConfig;
    use crate::story::builtin_story;
    use iced::Point;

    fn app_on_building_spread() -> App {
        let mut app = App::bootstrap(builtin_story(), AppConfig::default()).0;
        for _ in 0..2 {
            let mut events = Vec::new();
            assert!(app.book.begin_drag(0.5, &mut events));
            app.book.drag(-0.5);
            app.book.end_drag();
            while app.book.is_turning() {
                app.book.tick(&mut events);
            }
            let mut effects = Vec::new();
            app.drain_book_events(events, &mut effects);
            for effect in effects {
                let _ = app.run_effect(effect);
            }
        }
        app.started = true;
        app.refresh_gate();
        assert!(app.building_spread_open());
        app
    }

    #[test]
    fn item_press_with_a_closed_game_gate_does_not_turn_the_page() {
        let mut app = app_on_building_spread();
        // A drop closes the game gate while its segment plays out.
        app.building.drop_item(0);
        assert!(!app.building.gate().accepts());

        // Press inside the item strip, far enough from the spine that it
        // would otherwise read as a backward flip.
        let mut effects = Vec::new();
        let in_strip = Point::new(100.0, 700.0);
        app.handle_pointer_moved(in_strip, &mut effects);
        app.handle_pointer_pressed(&mut effects);

        assert!(app.drag_target.is_none());
        assert!(!app.tracker.is_active());
        assert!(!app.book.is_turning());
    }

    #[test]
    fn item_press_with_an_open_gate_starts_an_item_drag() {
        let mut app = app_on_building_spread();
        let mut effects = Vec::new();
        let in_strip = Point::new(100.0, 700.0);
        app.handle_pointer_moved(in_strip, &mut effects);
        app.handle_pointer_pressed(&mut effects);

        assert!(matches!(
            app.drag_target,
            Some(DragTarget::Item { item: 0, .. })
        ));
        assert!(!app.book.is_turning());
    }
}
