//! Page-flip engine.
//!
//! The book is a fixed ordered sequence of pages shown as spreads (pairs).
//! `current_page` is the left slot of the open spread and ranges over
//! `[-1, page_count - 1]`, where -1 means the book is closed on its cover
//! (the spread before the first sheet). A flip drags the `active` pair over
//! a continuous position in `[-1, 1]`; releasing hands the position to a
//! fixed-step finishing ticker which commits the flip when the position
//! lands exactly on a terminal value.
//!
//! The engine owns no rendering. It reports committed spread changes and
//! page visibility changes as [`BookEvent`]s; everything else (media
//! control, lazy loading) is the caller's concern.

use tracing::debug;

/// Normalized horizontal distance from the spine below which a press is not
/// treated as a flip.
pub const DEAD_ZONE: f64 = 0.25;
/// Position step applied on every finishing tick.
pub const FINISHING_STEP: f64 = 0.1;
/// Cadence of finishing ticks, in milliseconds of host time.
pub const FINISHING_DELAY_MS: u64 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BookEvent {
    /// A flip committed and the open spread changed.
    CurrentPageChanged { current: i32, previous: i32 },
    /// A page entered or left the visible window around the open spread.
    PageVisibility { index: usize, visible: bool },
}

/// Role flags a page derives from its distance to the open spread and to an
/// in-flight flip. A page with no flag set is outside the visible window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRoles {
    pub first_previous: bool,
    pub second_previous: bool,
    pub current: bool,
    pub first_next: bool,
    pub second_next: bool,
    pub first_active: bool,
    pub second_active: bool,
    pub future: bool,
}

impl PageRoles {
    pub fn previous(&self) -> bool {
        self.first_previous || self.second_previous
    }

    pub fn next(&self) -> bool {
        self.first_next || self.second_next
    }

    pub fn active(&self) -> bool {
        self.first_active || self.second_active
    }

    pub fn any(&self) -> bool {
        self.previous() || self.current || self.next() || self.active() || self.future
    }
}

pub struct Book {
    page_count: usize,
    current_page: i32,
    active_page: Option<i32>,
    future_page: Option<i32>,
    /// Normalized x of the press that started the drag. `Some` only while a
    /// drag is in flight.
    drag_origin: Option<f64>,
    /// Flip position. Defined iff a page is active.
    position: Option<f64>,
    /// Finishing direction, +1 or -1. `Some` only while finishing.
    finishing: Option<f64>,
    visible: Vec<bool>,
}

impl Book {
    pub fn new(page_count: usize, events: &mut Vec<BookEvent>) -> Self {
        let mut book = Self {
            page_count,
            current_page: -1,
            active_page: None,
            future_page: None,
            drag_origin: None,
            position: None,
            finishing: None,
            visible: vec![false; page_count],
        };
        book.sync_visibility(events);
        book
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn current_page(&self) -> i32 {
        self.current_page
    }

    pub fn active_page(&self) -> Option<i32> {
        self.active_page
    }

    pub fn future_page(&self) -> Option<i32> {
        self.future_page
    }

    pub fn position(&self) -> Option<f64> {
        self.position
    }

    pub fn active_side(&self) -> Option<ActiveSide> {
        self.position.map(|position| {
            if position > 0.0 {
                ActiveSide::Right
            } else {
                ActiveSide::Left
            }
        })
    }

    /// True while a drag or the finishing animation is in flight.
    pub fn is_turning(&self) -> bool {
        self.active_page.is_some()
    }

    pub fn is_finishing(&self) -> bool {
        self.finishing.is_some()
    }

    /// True when `index` belongs to the open spread.
    pub fn is_current(&self, index: usize) -> bool {
        let idx = index as i32;
        idx == self.current_page || idx == self.current_page + 1
    }

    pub fn roles_of(&self, index: usize) -> PageRoles {
        let idx = index as i32;
        let c = self.current_page;
        let mut roles = PageRoles {
            first_previous: idx == c - 2,
            second_previous: idx == c - 1,
            current: idx == c || idx == c + 1,
            first_next: idx == c + 2,
            second_next: idx == c + 3,
            ..PageRoles::default()
        };
        if let Some(active) = self.active_page {
            roles.first_active = idx == active;
            roles.second_active = idx == active + 1;
        }
        if let Some(future) = self.future_page {
            roles.future = idx == future || idx == future + 1;
        }
        roles
    }

    pub fn visible_pages(&self) -> Vec<usize> {
        (0..self.page_count)
            .filter(|index| self.visible[*index])
            .collect()
    }

    /// Starts a drag from normalized book coordinate `x` in `[-1, 1]`
    /// (0 = spine, ±1 = outer edges). Rejected inside the dead zone, while
    /// another flip is in flight, or past either end of the book.
    pub fn begin_drag(&mut self, x: f64, events: &mut Vec<BookEvent>) -> bool {
        if self.drag_origin.is_some() || self.active_page.is_some() {
            return false;
        }
        if x.abs() < DEAD_ZONE {
            return false;
        }

        if x > 0.0 {
            if self.current_page + 2 >= self.page_count as i32 {
                return false;
            }
            self.active_page = Some(self.current_page + 1);
            self.future_page = Some(self.current_page + 2);
            // Seed at the terminal value so the first frame already renders
            // with the drag's direction; the next `drag` call overwrites it.
            self.set_position(1.0);
        } else {
            if self.current_page == -1 {
                return false;
            }
            self.active_page = Some(self.current_page - 1);
            self.future_page = Some(self.current_page - 2);
            self.set_position(-1.0);
        }

        self.drag_origin = Some(x);
        self.sync_visibility(events);
        true
    }

    /// Re-derives the flip position from the raw pointer coordinate. Not an
    /// accumulator: each call maps `x` against the drag origin afresh.
    pub fn drag(&mut self, x: f64) {
        let Some(origin) = self.drag_origin else {
            return;
        };
        self.set_position(x / origin.abs());
    }

    /// Releases the drag and starts the finishing animation toward the
    /// terminal value on the current position's side (backward at exactly 0).
    pub fn end_drag(&mut self) {
        if self.drag_origin.take().is_none() {
            return;
        }
        let direction = match self.position {
            Some(position) if position > 0.0 => 1.0,
            _ => -1.0,
        };
        self.finishing = Some(direction);
    }

    /// One finishing step. Call every [`FINISHING_DELAY_MS`] of host time
    /// while [`is_finishing`](Self::is_finishing) holds. On landing exactly
    /// on ±1 the flip commits and the transient state is cleared.
    pub fn tick(&mut self, events: &mut Vec<BookEvent>) {
        let Some(direction) = self.finishing else {
            return;
        };
        let Some(position) = self.position else {
            self.finishing = None;
            return;
        };

        if position == 1.0 {
            self.commit(-1, events);
        } else if position == -1.0 {
            self.commit(1, events);
        } else {
            self.set_position(position + direction * FINISHING_STEP);
        }
    }

    /// Finalizes the flip: the landed spread is `active + offset`.
    fn commit(&mut self, offset: i32, events: &mut Vec<BookEvent>) {
        self.finishing = None;
        let Some(active) = self.active_page.take() else {
            return;
        };
        self.future_page = None;
        self.position = None;

        let previous = self.current_page;
        self.current_page = active + offset;
        if self.current_page != previous {
            debug!(
                current = self.current_page,
                previous, "Committed page flip"
            );
            events.push(BookEvent::CurrentPageChanged {
                current: self.current_page,
                previous,
            });
        }
        self.sync_visibility(events);
    }

    fn set_position(&mut self, position: f64) {
        self.position = Some(position.clamp(-1.0, 1.0));
    }

    fn sync_visibility(&mut self, events: &mut Vec<BookEvent>) {
        for index in 0..self.page_count {
            let now_visible = self.roles_of(index).any();
            if now_visible != self.visible[index] {
                self.visible[index] = now_visible;
                events.push(BookEvent::PageVisibility {
                    index,
                    visible: now_visible,
                });
            }
        }
    }
}
