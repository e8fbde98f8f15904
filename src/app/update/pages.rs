//! Page lifecycle: lazy media loads on first visibility, playback tied to
//! the visible window, and lead/dependant clip synchronization.

use super::super::state::App;
use super::Effect;
use crate::book::BookEvent;
use crate::media::MediaAction;
use tracing::{debug, info};

impl App {
    /// Applies the events a book mutation produced: visibility changes feed
    /// the media lifecycle, spread changes open and close the mini-games.
    pub(in crate::app) fn drain_book_events(
        &mut self,
        events: Vec<BookEvent>,
        effects: &mut Vec<Effect>,
    ) {
        for event in events {
            match event {
                BookEvent::PageVisibility { index, visible } => {
                    if visible {
                        self.handle_page_shown(index, effects);
                    } else {
                        self.handle_page_hidden(index, effects);
                    }
                }
                BookEvent::CurrentPageChanged { current, previous } => {
                    info!(current, previous, "Turned to a new spread");
                    self.handle_spread_changed(current, previous, effects);
                }
            }
        }
    }

    /// The spread changed. The outgoing pair is paused and rewound, ambient
    /// clips on the incoming pair start, and the control room opens or
    /// closes with its page.
    fn handle_spread_changed(&mut self, current: i32, previous: i32, effects: &mut Vec<Effect>) {
        for index in [previous, previous + 1] {
            let Ok(index) = usize::try_from(index) else {
                continue;
            };
            if self.book.is_current(index) {
                continue;
            }
            if self
                .pages
                .get(index)
                .is_some_and(|runtime| runtime.player.is_some())
            {
                effects.push(Effect::Media {
                    page: index,
                    action: MediaAction::Pause,
                });
                effects.push(Effect::Media {
                    page: index,
                    action: MediaAction::SeekTo(0.0),
                });
            }
        }

        for index in [current, current + 1] {
            let Ok(index) = usize::try_from(index) else {
                continue;
            };
            // The game pages own their players and start themselves.
            let is_game_page =
                self.building_page == Some(index) || self.control_page == Some(index);
            if !is_game_page
                && self
                    .pages
                    .get(index)
                    .is_some_and(|runtime| runtime.player.is_some())
            {
                effects.push(Effect::Media {
                    page: index,
                    action: MediaAction::Play,
                });
            }
        }

        if let Some(page) = self.control_page {
            let open = self.book.is_current(page);
            if open != self.control.is_open() {
                let actions = self.control.set_open(open);
                self.route_media(page, actions, effects);
            }
        }

        // The building game follows its spread the same way: any flip away
        // restarts the script, and coming back re-arms it.
        if let Some(page) = self.building_page {
            if self.book.is_current(page) {
                if !self.building.is_started()
                    && self
                        .pages
                        .get(page)
                        .and_then(|runtime| runtime.player.as_ref())
                        .is_some_and(|player| player.is_ready())
                {
                    self.building.media_ready();
                }
            } else if self.building.is_started() {
                let actions = self.building.reset();
                self.route_media(page, actions, effects);
            }
        }
    }

    /// A page entered the render window. Media is loaded the first time the
    /// page comes near the visible spread, never before.
    fn handle_page_shown(&mut self, index: usize, _effects: &mut Vec<Effect>) {
        let Some(runtime) = self.pages.get_mut(index) else {
            return;
        };
        if !runtime.opened {
            runtime.opened = true;
            if let Some(player) = runtime.player.as_mut() {
                player.load();
                debug!(page = index, "Loaded page media");
            }
            if self.building_page == Some(index) && self.book.is_current(index) {
                self.building.media_ready();
            }
        }
    }

    /// A page left the render window: its clip stops and rewinds so the next
    /// visit starts clean, and any game bound to it returns to its start.
    fn handle_page_hidden(&mut self, index: usize, effects: &mut Vec<Effect>) {
        if self
            .pages
            .get(index)
            .is_some_and(|runtime| runtime.player.is_some())
        {
            effects.push(Effect::Media {
                page: index,
                action: MediaAction::Pause,
            });
            effects.push(Effect::Media {
                page: index,
                action: MediaAction::SeekTo(0.0),
            });
        }
        if self.building_page == Some(index) && self.building.is_started() {
            let actions = self.building.reset();
            self.route_media(index, actions, effects);
        }
        if self.control_page == Some(index) && self.control.is_open() {
            let actions = self.control.set_open(false);
            self.route_media(index, actions, effects);
        }
    }

    /// Keeps each dependant clip within the configured tolerance of its
    /// lead. Only running pairs are compared; a paused side is left alone.
    pub(super) fn sync_dependants(&mut self, effects: &mut Vec<Effect>) {
        for (index, spec) in self.story.pages.iter().enumerate() {
            let Some(target) = spec.media.as_ref().and_then(|media| media.lead_of) else {
                continue;
            };
            let lead = self.pages[index].player.as_ref();
            let dependant = self.pages[target].player.as_ref();
            let (Some(lead), Some(dependant)) = (lead, dependant) else {
                continue;
            };
            if !lead.is_playing() || !dependant.is_playing() {
                continue;
            }
            let drift = (lead.position() - dependant.position()).abs();
            if drift > self.config.sync_tolerance_secs {
                debug!(lead = index, dependant = target, drift, "Resyncing dependant clip");
                effects.push(Effect::Media {
                    page: target,
                    action: MediaAction::SeekTo(lead.position()),
                });
            }
        }
    }

    pub(super) fn route_media(
        &self,
        page: usize,
        actions: Vec<MediaAction>,
        effects: &mut Vec<Effect>,
    ) {
        effects.extend(
            actions
                .into_iter()
                .map(|action| Effect::Media { page, action }),
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::app::state::App;
    use crate::config::AppConfig;
    use crate::story::builtin_story;

    fn opened_app() -> App {
        App::bootstrap(builtin_story(), AppConfig::default()).0
    }

    /// Drives a full flip through the book and feeds the resulting events
    /// through the reducer plumbing, the way a live drag would.
    fn flip(app: &mut App, x: f64) {
        let mut events = Vec::new();
        assert!(app.book.begin_drag(x, &mut events));
        app.book.drag(-x);
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

    #[test]
    fn leaving_the_building_spread_resets_the_game_mid_script() {
        let mut app = opened_app();
        flip(&mut app, 0.5);
        flip(&mut app, 0.5);
        assert!(app.building_spread_open());
        assert!(app.building.is_started());

        app.building.drop_item(0);
        assert_eq!(app.building.phase(), 2);

        // One spread forward: the game goes back to its first prompt.
        flip(&mut app, 0.5);
        assert!(!app.building_spread_open());
        assert_eq!(app.building.phase(), 0);
        assert!(!app.building.is_started());

        // And coming back re-arms it from the top.
        flip(&mut app, -0.5);
        assert!(app.building_spread_open());
        assert!(app.building.is_started());
        assert_eq!(app.building.phase(), 0);
    }
}
