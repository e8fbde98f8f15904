//! Construction mini-game.
//!
//! The page shows a building site: the media plays a construction segment,
//! pauses at the end of the current phase's window, and waits for the child
//! to drag the right item onto the platform. The expected item advances the
//! script; a wrong one plays a short rejection segment that returns to the
//! same prompt. Art (the spread's background pair) follows the phase.

use crate::gate::{GateState, InteractionGate};
use crate::media::MediaAction;
use crate::timeline::TimeWindow;
use tracing::debug;

pub type PhaseId = usize;
pub type ItemId = usize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuildingPhase {
    /// Pauses at `window.end` with the gate open, awaiting an item drop.
    /// `on_wrong: None` replays the prompt segment on a wrong item.
    Prompt {
        window: TimeWindow,
        expected_item: ItemId,
        on_correct: PhaseId,
        on_wrong: Option<PhaseId>,
        art: usize,
    },
    /// Transient wrong-item segment; returns to `resume` when it runs out.
    Rejection { window: TimeWindow, resume: PhaseId },
    /// Plays out and pauses for good.
    Finale { window: TimeWindow, art: usize },
}

impl BuildingPhase {
    fn window(&self) -> TimeWindow {
        match *self {
            BuildingPhase::Prompt { window, .. }
            | BuildingPhase::Rejection { window, .. }
            | BuildingPhase::Finale { window, .. } => window,
        }
    }

    fn art(&self) -> Option<usize> {
        match *self {
            BuildingPhase::Prompt { art, .. } | BuildingPhase::Finale { art, .. } => Some(art),
            BuildingPhase::Rejection { .. } => None,
        }
    }

    /// Gate applied when the media pauses at this phase's end.
    fn pause_gate(&self) -> GateState {
        match self {
            BuildingPhase::Prompt { .. } => GateState::Active,
            BuildingPhase::Rejection { .. } | BuildingPhase::Finale { .. } => GateState::Disabled,
        }
    }
}

/// The construction script shipped with the built-in story: foundation,
/// cement, walls, roof, light, then the windows finale. Prompts alternate
/// with their rejection segments exactly as the video was cut.
pub fn default_script() -> Vec<BuildingPhase> {
    vec![
        BuildingPhase::Prompt {
            window: TimeWindow::new(0.0, 0.0),
            expected_item: 0,
            on_correct: 2,
            on_wrong: Some(1),
            art: 0,
        },
        BuildingPhase::Rejection {
            window: TimeWindow::new(0.0, 1.0),
            resume: 0,
        },
        BuildingPhase::Prompt {
            window: TimeWindow::new(1.2, 7.8),
            expected_item: 1,
            on_correct: 4,
            on_wrong: Some(3),
            art: 1,
        },
        BuildingPhase::Rejection {
            window: TimeWindow::new(8.0, 9.0),
            resume: 2,
        },
        BuildingPhase::Prompt {
            window: TimeWindow::new(9.4, 14.4),
            expected_item: 2,
            on_correct: 6,
            on_wrong: Some(5),
            art: 2,
        },
        BuildingPhase::Rejection {
            window: TimeWindow::new(14.4, 15.4),
            resume: 4,
        },
        BuildingPhase::Prompt {
            window: TimeWindow::new(15.6, 18.0),
            expected_item: 3,
            on_correct: 8,
            on_wrong: Some(7),
            art: 3,
        },
        BuildingPhase::Rejection {
            window: TimeWindow::new(18.0, 19.0),
            resume: 6,
        },
        BuildingPhase::Prompt {
            window: TimeWindow::new(19.2, 23.2),
            expected_item: 4,
            on_correct: 9,
            on_wrong: None,
            art: 4,
        },
        BuildingPhase::Finale {
            window: TimeWindow::new(23.4, 40.2),
            art: 5,
        },
    ]
}

pub struct BuildingGame {
    phases: Vec<BuildingPhase>,
    phase: PhaseId,
    gate: InteractionGate,
    art: usize,
    started: bool,
}

impl BuildingGame {
    pub fn new(phases: Vec<BuildingPhase>) -> Self {
        let art = phases.first().and_then(BuildingPhase::art).unwrap_or(0);
        Self {
            phases,
            phase: 0,
            gate: InteractionGate::new(GateState::Active),
            art,
            started: false,
        }
    }

    pub fn phase(&self) -> PhaseId {
        self.phase
    }

    pub fn art(&self) -> usize {
        self.art
    }

    pub fn gate(&self) -> &InteractionGate {
        &self.gate
    }

    /// Item the current prompt is waiting for, if a prompt is current.
    pub fn expected_item(&self) -> Option<ItemId> {
        match self.phases[self.phase] {
            BuildingPhase::Prompt { expected_item, .. } => Some(expected_item),
            _ => None,
        }
    }

    /// True while the game is armed against its media clock.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Arms the enter-frame polling once the page's media is playable.
    pub fn media_ready(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.gate.set(self.phases[self.phase].pause_gate());
    }

    fn set_phase(&mut self, phase: PhaseId) {
        if phase != self.phase {
            debug!(from = self.phase, to = phase, "Building phase transition");
        }
        self.phase = phase;
    }

    /// Advances the script against the playing media clock. While the media
    /// is paused (waiting on a drop) there is nothing to check.
    pub fn poll(&mut self, time: f64, playing: bool) -> Vec<MediaAction> {
        if !self.started || !playing {
            return Vec::new();
        }
        let current = self.phases[self.phase];
        if time < current.window().end {
            return Vec::new();
        }

        let landed = match current {
            BuildingPhase::Rejection { resume, .. } => resume,
            BuildingPhase::Prompt { .. } | BuildingPhase::Finale { .. } => self.phase,
        };
        self.set_phase(landed);
        let landed = self.phases[self.phase];
        self.gate.set(landed.pause_gate());
        if let Some(art) = landed.art() {
            self.art = art;
        }
        vec![MediaAction::Pause, MediaAction::SeekTo(landed.window().end)]
    }

    /// An item landed on the platform. Refused unless the gate is open and
    /// the current phase is a prompt.
    pub fn drop_item(&mut self, item: ItemId) -> Vec<MediaAction> {
        if !self.gate.accepts() {
            return Vec::new();
        }
        let BuildingPhase::Prompt {
            expected_item,
            on_correct,
            on_wrong,
            ..
        } = self.phases[self.phase]
        else {
            return Vec::new();
        };

        let target = if item == expected_item {
            on_correct
        } else {
            on_wrong.unwrap_or(self.phase)
        };
        debug!(
            item,
            expected_item, target, "Item dropped on the building platform"
        );
        self.set_phase(target);
        self.gate.set(GateState::Disabled);
        vec![
            MediaAction::Play,
            MediaAction::SeekTo(self.phases[self.phase].window().start),
        ]
    }

    /// Back to the initial prompt; issued when the page leaves the visible
    /// spread. Stops and rewinds the media.
    pub fn reset(&mut self) -> Vec<MediaAction> {
        self.started = false;
        self.phase = 0;
        self.art = self.phases.first().and_then(BuildingPhase::art).unwrap_or(0);
        self.gate.set(GateState::Active);
        vec![MediaAction::Pause, MediaAction::SeekTo(0.0)]
    }
}

impl Default for BuildingGame {
    fn default() -> Self {
        Self::new(default_script())
    }
}

#[cfg(test)]
mod tests {
    use super::{BuildingGame, BuildingPhase};
    use crate::gate::GateState;
    use crate::media::MediaAction;

    fn started_game() -> BuildingGame {
        let mut game = BuildingGame::default();
        game.media_ready();
        game
    }

    #[test]
    fn correct_item_enters_the_yes_phase_and_plays_its_segment() {
        let mut game = started_game();
        let actions = game.drop_item(0);
        assert_eq!(game.phase(), 2);
        assert_eq!(actions, vec![MediaAction::Play, MediaAction::SeekTo(1.2)]);
        assert_eq!(game.gate().state(), GateState::Disabled);
    }

    #[test]
    fn wrong_item_detours_through_the_rejection_and_returns_unchanged() {
        let mut game = started_game();
        game.drop_item(0);
        // Let the cement segment run out so the prompt re-opens.
        game.poll(7.8, true);
        assert_eq!(game.phase(), 2);
        assert!(game.gate().accepts());

        let actions = game.drop_item(3);
        assert_eq!(game.phase(), 3);
        assert_eq!(actions, vec![MediaAction::Play, MediaAction::SeekTo(8.0)]);

        // The rejection segment ends and the machine falls back to the
        // pre-branch prompt, paused at its end with the gate open again.
        let actions = game.poll(9.0, true);
        assert_eq!(game.phase(), 2);
        assert_eq!(actions, vec![MediaAction::Pause, MediaAction::SeekTo(7.8)]);
        assert!(game.gate().accepts());
        assert_eq!(game.art(), 1);
    }

    #[test]
    fn prompt_without_rejection_branch_replays_on_wrong_item() {
        let mut game = started_game();
        for item in [0, 1, 2, 3] {
            game.drop_item(item);
            let end = match game_phase_end(&game) {
                Some(end) => end,
                None => panic!("expected a windowed phase"),
            };
            game.poll(end, true);
        }
        assert_eq!(game.phase(), 8);

        let actions = game.drop_item(0);
        assert_eq!(game.phase(), 8);
        assert_eq!(actions, vec![MediaAction::Play, MediaAction::SeekTo(19.2)]);
    }

    #[test]
    fn full_script_runs_to_the_finale() {
        let mut game = started_game();
        for item in [0, 1, 2, 3, 4] {
            game.drop_item(item);
            if let Some(end) = game_phase_end(&game) {
                game.poll(end, true);
            }
        }
        assert_eq!(game.phase(), 9);
        assert_eq!(game.art(), 5);
        assert_eq!(game.gate().state(), GateState::Disabled);
    }

    fn game_phase_end(game: &BuildingGame) -> Option<f64> {
        match game.phases[game.phase] {
            BuildingPhase::Prompt { window, .. }
            | BuildingPhase::Rejection { window, .. }
            | BuildingPhase::Finale { window, .. } => Some(window.end),
        }
    }

    #[test]
    fn segment_end_pauses_at_the_boundary_and_opens_the_gate() {
        let mut game = started_game();
        game.drop_item(0);
        let actions = game.poll(8.1, true);
        assert_eq!(actions, vec![MediaAction::Pause, MediaAction::SeekTo(7.8)]);
        assert_eq!(game.gate().state(), GateState::Active);
        assert_eq!(game.art(), 1);
    }

    #[test]
    fn polls_are_inert_while_paused_or_before_the_boundary() {
        let mut game = started_game();
        game.drop_item(0);
        assert!(game.poll(3.0, true).is_empty());
        assert!(game.poll(30.0, false).is_empty());
        assert_eq!(game.phase(), 2);
    }

    #[test]
    fn drop_is_refused_while_the_gate_is_closed() {
        let mut game = started_game();
        game.drop_item(0);
        // Segment still playing: gate is Disabled.
        assert!(game.drop_item(1).is_empty());
        assert_eq!(game.phase(), 2);
    }

    #[test]
    fn reset_returns_to_the_first_prompt_with_an_open_gate() {
        let mut game = started_game();
        game.drop_item(0);
        game.poll(7.8, true);
        game.drop_item(1);

        let actions = game.reset();
        assert_eq!(game.phase(), 0);
        assert_eq!(game.art(), 0);
        assert_eq!(game.gate().state(), GateState::Active);
        assert_eq!(actions, vec![MediaAction::Pause, MediaAction::SeekTo(0.0)]);

        // Not started again until the media reports ready.
        assert!(game.poll(50.0, true).is_empty());
    }
}
