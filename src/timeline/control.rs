//! Mission-control mini-game.
//!
//! The page plays a rocket flight; one big button has to be pressed at the
//! right moments. Holding phases loop a segment of the media (rewinding it
//! when it runs past the window) until the press lands inside the ready
//! window; cruising phases auto-advance once the clock passes their
//! boundary. Feedback for a press is transient and the button locks until
//! the feedback clears.

use crate::media::MediaAction;
use std::time::{Duration, Instant};
use tracing::debug;

/// How long press feedback stays up and the button stays locked.
pub const FEEDBACK_TIMEOUT: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPhase {
    Closed,
    OnStart,
    Launch,
    AroundEarth,
    WayToMoon,
    AroundMoon,
    Landing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Empty,
    Success,
    Early,
    Late,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum EnterSeek {
    To(f64),
    By(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PhaseSpec {
    /// Closed or landed; ignores time and input.
    Idle,
    /// Loops a segment awaiting the press. Past `rewind_after` the media is
    /// seeked back by `rewind_by` and the ready flag re-derived; the flag
    /// arms once the clock passes `ready_from`. A not-ready press before
    /// `late_before` reads as early, past it as late.
    Hold {
        enter_seek: Option<EnterSeek>,
        rewind_after: f64,
        rewind_by: f64,
        ready_from: f64,
        late_before: Option<f64>,
        next: ControlPhase,
    },
    /// Plays through and advances on its own past `advance_after`.
    Cruise {
        enter_seek: Option<EnterSeek>,
        advance_after: f64,
        next: ControlPhase,
    },
}

/// The flight script: press to launch, cruise to orbit, press to leave
/// Earth orbit, cruise to the Moon, press to land.
fn spec_of(phase: ControlPhase) -> PhaseSpec {
    match phase {
        ControlPhase::Closed | ControlPhase::Landing => PhaseSpec::Idle,
        ControlPhase::OnStart => PhaseSpec::Hold {
            enter_seek: None,
            rewind_after: 1.25,
            rewind_by: -0.75,
            ready_from: 0.0,
            late_before: None,
            next: ControlPhase::Launch,
        },
        ControlPhase::Launch => PhaseSpec::Cruise {
            enter_seek: Some(EnterSeek::To(1.25)),
            advance_after: 2.75,
            next: ControlPhase::AroundEarth,
        },
        ControlPhase::AroundEarth => PhaseSpec::Hold {
            enter_seek: Some(EnterSeek::By(10.25)),
            rewind_after: 20.75,
            rewind_by: -10.0,
            ready_from: 20.0,
            late_before: Some(15.0),
            next: ControlPhase::WayToMoon,
        },
        ControlPhase::WayToMoon => PhaseSpec::Cruise {
            enter_seek: None,
            advance_after: 23.75,
            next: ControlPhase::AroundMoon,
        },
        ControlPhase::AroundMoon => PhaseSpec::Hold {
            enter_seek: Some(EnterSeek::By(3.75)),
            rewind_after: 29.75,
            rewind_by: -3.5,
            ready_from: 29.0,
            late_before: Some(27.5),
            next: ControlPhase::Landing,
        },
    }
}

pub struct ControlGame {
    phase: ControlPhase,
    feedback: Feedback,
    pressed: bool,
    ready: bool,
    rewound: bool,
    open: bool,
    clear_feedback_at: Option<Instant>,
}

impl ControlGame {
    pub fn new() -> Self {
        Self {
            phase: ControlPhase::Closed,
            feedback: Feedback::Empty,
            pressed: false,
            ready: false,
            rewound: false,
            open: false,
            clear_feedback_at: None,
        }
    }

    pub fn phase(&self) -> ControlPhase {
        self.phase
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// True once the current holding phase has looped at least once.
    pub fn is_rewound(&self) -> bool {
        self.rewound
    }

    /// Tracks whether the page is on the open spread. Leaving it resets the
    /// whole machine and stops the media.
    pub fn set_open(&mut self, open: bool) -> Vec<MediaAction> {
        self.open = open;
        if open { Vec::new() } else { self.reset() }
    }

    /// Leaves `Closed` once the page is open and its media is playable.
    pub fn try_start(&mut self, media_ready: bool, time: f64) -> Vec<MediaAction> {
        if !self.open || !media_ready || self.phase != ControlPhase::Closed {
            return Vec::new();
        }
        let mut actions = self.enter(ControlPhase::OnStart, time);
        actions.push(MediaAction::Play);
        actions
    }

    /// Runs the armed checks against the media clock. Checks are re-derived
    /// from the current phase each call, so nothing stale can fire.
    pub fn poll(&mut self, time: f64, now: Instant) -> Vec<MediaAction> {
        if let Some(clear_at) = self.clear_feedback_at {
            if now >= clear_at {
                self.clear_feedback_at = None;
                self.pressed = false;
                self.feedback = Feedback::Empty;
            }
        }

        match spec_of(self.phase) {
            PhaseSpec::Idle => Vec::new(),
            PhaseSpec::Cruise {
                advance_after,
                next,
                ..
            } => {
                if time >= advance_after {
                    self.enter(next, time)
                } else {
                    Vec::new()
                }
            }
            PhaseSpec::Hold {
                rewind_after,
                rewind_by,
                ready_from,
                ..
            } => {
                if !self.ready && time >= ready_from {
                    self.ready = true;
                }
                if time >= rewind_after {
                    let rewound_to = time + rewind_by;
                    self.ready = rewound_to >= ready_from;
                    self.rewound = true;
                    vec![MediaAction::SeekBy(rewind_by)]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// The big button. Evaluated against the ready flag and, when not
    /// ready, the phase's lateness threshold; feedback locks the button
    /// until it clears [`FEEDBACK_TIMEOUT`] later.
    pub fn press_button(&mut self, time: f64, now: Instant) -> Vec<MediaAction> {
        let (next, late_before) = match spec_of(self.phase) {
            PhaseSpec::Idle => return Vec::new(),
            PhaseSpec::Hold {
                next, late_before, ..
            } => (next, late_before),
            PhaseSpec::Cruise { next, .. } => (next, None),
        };
        if self.pressed {
            return Vec::new();
        }

        self.pressed = true;
        self.clear_feedback_at = Some(now + FEEDBACK_TIMEOUT);

        if self.ready {
            self.feedback = Feedback::Success;
            debug!(?next, "Button pressed in the ready window");
            return self.enter(next, time);
        }
        self.feedback = match late_before {
            Some(late_before) if time >= late_before => Feedback::Late,
            _ => Feedback::Early,
        };
        debug!(feedback = ?self.feedback, time, "Button pressed outside the ready window");
        Vec::new()
    }

    fn enter(&mut self, phase: ControlPhase, time: f64) -> Vec<MediaAction> {
        if phase == self.phase {
            return Vec::new();
        }
        debug!(from = ?self.phase, to = ?phase, "Control phase transition");
        self.phase = phase;
        self.rewound = false;

        let mut actions = Vec::new();
        let mut landed_time = time;
        let enter_seek = match spec_of(phase) {
            PhaseSpec::Hold { enter_seek, .. } | PhaseSpec::Cruise { enter_seek, .. } => enter_seek,
            PhaseSpec::Idle => None,
        };
        match enter_seek {
            Some(EnterSeek::To(target)) => {
                actions.push(MediaAction::SeekTo(target));
                landed_time = target;
            }
            Some(EnterSeek::By(delta)) => {
                actions.push(MediaAction::SeekBy(delta));
                landed_time += delta;
            }
            None => {}
        }

        self.ready = match spec_of(phase) {
            PhaseSpec::Hold { ready_from, .. } => landed_time >= ready_from,
            _ => false,
        };
        actions
    }

    /// Back to `Closed` with every transient flag cleared; the media stops.
    pub fn reset(&mut self) -> Vec<MediaAction> {
        self.phase = ControlPhase::Closed;
        self.feedback = Feedback::Empty;
        self.pressed = false;
        self.ready = false;
        self.rewound = false;
        self.clear_feedback_at = None;
        vec![MediaAction::Pause, MediaAction::SeekTo(0.0)]
    }
}

impl Default for ControlGame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{ControlGame, ControlPhase, FEEDBACK_TIMEOUT, Feedback};
    use crate::media::MediaAction;
    use std::time::Instant;

    fn opened_game() -> ControlGame {
        let mut game = ControlGame::new();
        game.set_open(true);
        game
    }

    #[test]
    fn starts_only_when_open_and_ready() {
        let mut game = ControlGame::new();
        assert!(game.try_start(true, 0.0).is_empty());

        game.set_open(true);
        assert!(game.try_start(false, 0.0).is_empty());
        let actions = game.try_start(true, 0.0);
        assert_eq!(game.phase(), ControlPhase::OnStart);
        assert_eq!(actions, vec![MediaAction::Play]);
        // ready_from is 0: the launch press is honored immediately.
        assert!(game.is_ready());
    }

    #[test]
    fn ready_press_succeeds_and_advances() {
        let now = Instant::now();
        let mut game = opened_game();
        game.try_start(true, 0.0);

        let actions = game.press_button(0.5, now);
        assert_eq!(game.phase(), ControlPhase::Launch);
        assert_eq!(game.feedback(), Feedback::Success);
        assert_eq!(actions, vec![MediaAction::SeekTo(1.25)]);
    }

    #[test]
    fn cruise_advances_past_its_boundary() {
        let now = Instant::now();
        let mut game = opened_game();
        game.try_start(true, 0.0);
        game.press_button(0.5, now);

        assert!(game.poll(2.0, now).is_empty());
        let actions = game.poll(2.8, now);
        assert_eq!(game.phase(), ControlPhase::AroundEarth);
        assert_eq!(actions, vec![MediaAction::SeekBy(10.25)]);
        assert!(!game.is_ready());
    }

    #[test]
    fn press_before_the_lateness_threshold_reads_early() {
        let now = Instant::now();
        let mut game = opened_game();
        game.enter(ControlPhase::AroundEarth, 0.5);

        game.press_button(12.0, now);
        assert_eq!(game.feedback(), Feedback::Early);
        assert_eq!(game.phase(), ControlPhase::AroundEarth);
    }

    #[test]
    fn press_past_the_lateness_threshold_reads_late() {
        let now = Instant::now();
        let mut game = opened_game();
        game.enter(ControlPhase::AroundEarth, 0.5);

        game.press_button(16.0, now);
        assert_eq!(game.feedback(), Feedback::Late);
    }

    #[test]
    fn ready_window_opens_at_ready_from() {
        let now = Instant::now();
        let mut game = opened_game();
        game.enter(ControlPhase::AroundEarth, 0.5);

        game.poll(19.9, now);
        assert!(!game.is_ready());
        game.poll(20.1, now);
        assert!(game.is_ready());

        let actions = game.press_button(20.2, now);
        assert_eq!(game.feedback(), Feedback::Success);
        assert_eq!(game.phase(), ControlPhase::WayToMoon);
        assert!(actions.is_empty());
    }

    #[test]
    fn overrunning_the_window_rewinds_and_disarms_ready() {
        let now = Instant::now();
        let mut game = opened_game();
        game.enter(ControlPhase::AroundEarth, 0.5);

        game.poll(20.5, now);
        assert!(game.is_ready());
        let actions = game.poll(20.8, now);
        assert_eq!(actions, vec![MediaAction::SeekBy(-10.0)]);
        assert!(!game.is_ready());
        assert!(game.rewound);
    }

    #[test]
    fn feedback_and_button_lock_clear_together_after_the_timeout() {
        let now = Instant::now();
        let mut game = opened_game();
        game.enter(ControlPhase::AroundEarth, 0.5);

        game.press_button(12.0, now);
        assert!(game.is_pressed());
        // A second press while locked is swallowed.
        game.press_button(16.0, now);
        assert_eq!(game.feedback(), Feedback::Early);

        game.poll(12.5, now + FEEDBACK_TIMEOUT / 2);
        assert!(game.is_pressed());
        game.poll(13.0, now + FEEDBACK_TIMEOUT);
        assert!(!game.is_pressed());
        assert_eq!(game.feedback(), Feedback::Empty);

        game.press_button(16.0, now + FEEDBACK_TIMEOUT);
        assert_eq!(game.feedback(), Feedback::Late);
    }

    #[test]
    fn presses_while_closed_or_landed_are_ignored() {
        let now = Instant::now();
        let mut game = ControlGame::new();
        assert!(game.press_button(1.0, now).is_empty());
        assert_eq!(game.feedback(), Feedback::Empty);

        game.set_open(true);
        game.enter(ControlPhase::Landing, 30.0);
        assert!(game.press_button(31.0, now).is_empty());
    }

    #[test]
    fn leaving_the_spread_resets_and_stops_the_media() {
        let now = Instant::now();
        let mut game = opened_game();
        game.try_start(true, 0.0);
        game.press_button(0.5, now);

        let actions = game.set_open(false);
        assert_eq!(game.phase(), ControlPhase::Closed);
        assert_eq!(game.feedback(), Feedback::Empty);
        assert!(!game.is_pressed());
        assert!(!game.is_open());
        assert_eq!(actions, vec![MediaAction::Pause, MediaAction::SeekTo(0.0)]);

        // Reopening restarts from the top.
        game.set_open(true);
        game.try_start(true, 0.0);
        assert_eq!(game.phase(), ControlPhase::OnStart);
    }
}
