//! Media-time-driven mini-game state machines.
//!
//! Both games are static directed graphs of phases with a single "current
//! phase" pointer. The source-of-truth clock is the page's media position;
//! instead of one-shot timers the machines are polled every host tick and
//! re-derive their armed checks from the current phase config, so a check
//! can never fire on behalf of a phase that is no longer current, and a
//! paused or seeked clock defers a check instead of desynchronizing it.

pub mod building;
pub mod control;

/// Interval of the media timeline a phase plays over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}
