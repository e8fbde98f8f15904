//! Media transport stand-in.
//!
//! [`Player`] models the host media element the interaction engines drive:
//! readiness, play/pause, absolute and relative seeks, and a playback
//! position derived from host time. The position is folded on explicit
//! [`advance`](Player::advance) calls so the timelines poll a stable value
//! within one tick.

use std::time::Instant;

/// Command issued by a timeline against its page's player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaAction {
    Play,
    Pause,
    SeekTo(f64),
    SeekBy(f64),
}

#[derive(Debug, Clone)]
pub struct Player {
    duration: f64,
    looping: bool,
    ready: bool,
    playing: bool,
    position: f64,
    synced_at: Option<Instant>,
}

impl Player {
    pub fn new(duration: f64, looping: bool) -> Self {
        Self {
            duration: duration.max(0.0),
            looping,
            ready: false,
            playing: false,
            position: 0.0,
            synced_at: None,
        }
    }

    /// Marks the media loaded and playable. The real host raises
    /// `canplaythrough`; with no network the wait collapses to load time.
    pub fn load(&mut self) {
        self.ready = true;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Playback position as of the last fold.
    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn play(&mut self, now: Instant) {
        if !self.ready || self.playing {
            return;
        }
        self.playing = true;
        self.synced_at = Some(now);
    }

    pub fn pause(&mut self, now: Instant) {
        self.advance(now);
        self.playing = false;
        self.synced_at = None;
    }

    pub fn seek_to(&mut self, position: f64, now: Instant) {
        self.advance(now);
        self.position = position.clamp(0.0, self.duration);
    }

    pub fn seek_by(&mut self, delta: f64, now: Instant) {
        self.advance(now);
        self.position = (self.position + delta).clamp(0.0, self.duration);
    }

    pub fn apply(&mut self, action: MediaAction, now: Instant) {
        match action {
            MediaAction::Play => self.play(now),
            MediaAction::Pause => self.pause(now),
            MediaAction::SeekTo(position) => self.seek_to(position, now),
            MediaAction::SeekBy(delta) => self.seek_by(delta, now),
        }
    }

    /// Folds elapsed host time into the position and returns it. A
    /// non-looping player stops at its duration; a looping one wraps.
    pub fn advance(&mut self, now: Instant) -> f64 {
        if let Some(synced_at) = self.synced_at {
            let elapsed = now.saturating_duration_since(synced_at).as_secs_f64();
            self.synced_at = Some(now);
            let mut position = self.position + elapsed;
            if self.duration > 0.0 {
                if self.looping {
                    position %= self.duration;
                } else if position >= self.duration {
                    position = self.duration;
                    self.playing = false;
                    self.synced_at = None;
                }
            }
            self.position = position;
        }
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::Player;
    use std::time::{Duration, Instant};

    #[test]
    fn position_advances_only_while_playing() {
        let t0 = Instant::now();
        let mut player = Player::new(30.0, false);
        player.load();
        player.play(t0);
        assert_eq!(player.advance(t0 + Duration::from_secs(2)), 2.0);

        player.pause(t0 + Duration::from_secs(3));
        assert_eq!(player.advance(t0 + Duration::from_secs(10)), 3.0);
    }

    #[test]
    fn play_before_ready_is_refused() {
        let mut player = Player::new(30.0, false);
        player.play(Instant::now());
        assert!(!player.is_playing());
    }

    #[test]
    fn non_looping_player_stops_at_the_end() {
        let t0 = Instant::now();
        let mut player = Player::new(5.0, false);
        player.load();
        player.play(t0);
        assert_eq!(player.advance(t0 + Duration::from_secs(9)), 5.0);
        assert!(!player.is_playing());
    }

    #[test]
    fn looping_player_wraps() {
        let t0 = Instant::now();
        let mut player = Player::new(4.0, true);
        player.load();
        player.play(t0);
        let position = player.advance(t0 + Duration::from_secs(9));
        assert!((position - 1.0).abs() < 1e-6);
        assert!(player.is_playing());
    }

    #[test]
    fn seeks_are_clamped_to_the_duration() {
        let t0 = Instant::now();
        let mut player = Player::new(10.0, false);
        player.load();
        player.seek_to(25.0, t0);
        assert_eq!(player.position(), 10.0);
        player.seek_by(-40.0, t0);
        assert_eq!(player.position(), 0.0);
    }
}
