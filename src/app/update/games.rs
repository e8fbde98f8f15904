//! The periodic tick: player clocks, the flip animation, and the media-time
//! polls that drive both mini-games.

use super::super::state::App;
use super::Effect;
use crate::book::FINISHING_DELAY_MS;
use std::time::{Duration, Instant};

impl App {
    pub(super) fn handle_tick(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        if !self.started {
            self.started = true;
        }

        for runtime in &mut self.pages {
            if let Some(player) = runtime.player.as_mut() {
                player.advance(now);
            }
        }

        if self.book.is_finishing()
            && now.duration_since(self.last_flip_step_at)
                >= Duration::from_millis(FINISHING_DELAY_MS)
        {
            self.last_flip_step_at = now;
            let mut events = Vec::new();
            self.book.tick(&mut events);
            self.drain_book_events(events, effects);
        }

        if let Some(page) = self.building_page {
            if let Some(player) = self.pages[page].player.as_ref() {
                let time = player.position();
                let playing = player.is_playing();
                let actions = self.building.poll(time, playing);
                self.route_media(page, actions, effects);
            }
        }

        if let Some(page) = self.control_page {
            if let Some(player) = self.pages[page].player.as_ref() {
                let ready = player.is_ready();
                let time = player.position();
                let mut actions = self.control.try_start(ready, time);
                actions.extend(self.control.poll(time, now));
                self.route_media(page, actions, effects);
            }
        }

        if now.duration_since(self.last_sync_at)
            >= Duration::from_millis(self.config.sync_interval_ms)
        {
            self.last_sync_at = now;
            self.sync_dependants(effects);
        }
    }

    pub(super) fn handle_control_button(&mut self, effects: &mut Vec<Effect>) {
        if !self.control_spread_open() {
            return;
        }
        let Some(page) = self.control_page else {
            return;
        };
        let Some(player) = self.pages[page].player.as_ref() else {
            return;
        };
        let time = player.position();
        let actions = self.control.press_button(time, Instant::now());
        self.route_media(page, actions, effects);
    }
}
