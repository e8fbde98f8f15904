mod constants;
mod pages;

use crate::book::Book;
use crate::config::AppConfig;
use crate::gate::{GateState, InteractionGate};
use crate::gesture::PointerTracker;
use crate::media::Player;
use crate::story::{GameKind, Story};
use crate::timeline::building::{BuildingGame, ItemId};
use crate::timeline::control::ControlGame;
use iced::{Point, Size, Task};
use std::time::Instant;

use super::messages::Message;

pub(crate) use constants::*;
pub(in crate::app) use pages::PageRuntime;

/// What the in-flight pointer gesture is manipulating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(in crate::app) enum DragTarget {
    /// Turning a page; the flip position tracks the pointer.
    Flip,
    /// Carrying a building item; `position` is the item's current spot.
    Item { item: ItemId, position: Point },
}

/// Core application state composed of sub-models.
pub struct App {
    pub(super) config: AppConfig,
    pub(super) story: Story,
    pub(super) book: Book,
    pub(super) gate: InteractionGate,
    pub(super) tracker: PointerTracker,
    pub(super) drag_target: Option<DragTarget>,
    pub(super) active_finger: Option<u64>,
    pub(super) cursor: Point,
    pub(super) window: Size,
    pub(super) pages: Vec<PageRuntime>,
    pub(super) building: BuildingGame,
    pub(super) building_page: Option<usize>,
    pub(super) control: ControlGame,
    pub(super) control_page: Option<usize>,
    pub(super) started: bool,
    pub(super) last_flip_step_at: Instant,
    pub(super) last_sync_at: Instant,
}

impl App {
    pub(super) fn bootstrap(story: Story, config: AppConfig) -> (App, Task<Message>) {
        let pages = story.pages.iter().map(PageRuntime::from_spec).collect();
        let mut events = Vec::new();
        let book = Book::new(story.page_count(), &mut events);
        let now = Instant::now();

        let mut app = App {
            window: Size::new(config.window_width, config.window_height),
            config,
            book,
            gate: InteractionGate::new(GateState::Loading),
            tracker: PointerTracker::new(),
            drag_target: None,
            active_finger: None,
            cursor: Point::ORIGIN,
            pages,
            building: BuildingGame::default(),
            building_page: story.game_page(GameKind::Building),
            control: ControlGame::new(),
            control_page: story.game_page(GameKind::Control),
            story,
            started: false,
            last_flip_step_at: now,
            last_sync_at: now,
        };

        let mut effects = Vec::new();
        app.drain_book_events(events, &mut effects);
        for effect in effects {
            let _ = app.run_effect(effect);
        }

        tracing::info!(
            title = %app.story.title,
            pages = app.story.page_count(),
            building_page = ?app.building_page,
            control_page = ?app.control_page,
            "Opened story"
        );
        (app, Task::none())
    }

    /// True while the book spread bound to the building game is the one the
    /// reader is looking at.
    pub(super) fn building_spread_open(&self) -> bool {
        self.building_page
            .is_some_and(|page| self.book.is_current(page))
    }

    pub(super) fn control_spread_open(&self) -> bool {
        self.control_page
            .is_some_and(|page| self.book.is_current(page))
    }

    /// Maps a window x coordinate into the book's `[-1, 1]` range with 0 at
    /// the spine and ±1 at the outer edges.
    pub(super) fn flip_coordinate(&self, x: f32) -> f64 {
        let half = (self.window.width / 2.0).max(1.0);
        f64::from((x - half) / half)
    }

    /// The building item under `point`, if the point falls in the item strip
    /// while the building spread is open.
    pub(super) fn item_at(&self, point: Point) -> Option<ItemId> {
        if !self.building_spread_open() {
            return None;
        }
        let strip_top = self.window.height * (1.0 - ITEM_STRIP_FRACTION);
        if point.y < strip_top || point.y > self.window.height {
            return None;
        }
        let slot_width = self.window.width / ITEM_NAMES.len() as f32;
        let slot = (point.x / slot_width.max(1.0)).floor();
        if slot < 0.0 {
            return None;
        }
        let slot = slot as usize;
        (slot < ITEM_NAMES.len()).then_some(slot)
    }

    pub(super) fn platform_contains(&self, point: Point) -> bool {
        let [left, right, top, bottom] = PLATFORM_RECT;
        point.x >= self.window.width * left
            && point.x <= self.window.width * right
            && point.y >= self.window.height * top
            && point.y <= self.window.height * bottom
    }

    /// Reflects the book's transient state onto the page-interaction gate.
    /// Stays `Loading` until the first tick has run the initial load.
    pub(super) fn refresh_gate(&mut self) {
        if !self.started {
            return;
        }
        if self.book.is_turning() || self.book.is_finishing() {
            self.gate.set(GateState::Disabled);
        } else {
            self.gate.set(GateState::Active);
        }
    }

    /// Whether the periodic tick subscription needs to run.
    pub(super) fn needs_ticks(&self) -> bool {
        !self.started
            || self.book.is_turning()
            || self.book.is_finishing()
            || self.building_spread_open()
            || self.control_spread_open()
            || self
                .pages
                .iter()
                .any(|page| page.player.as_ref().is_some_and(Player::is_playing))
    }
}
