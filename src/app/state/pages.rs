use crate::media::Player;
use crate::story::PageSpec;

/// Runtime companion of a manifest page: its player, if the page carries a
/// clip, and whether the page has been opened at least once.
pub(in crate::app) struct PageRuntime {
    pub player: Option<Player>,
    pub opened: bool,
}

impl PageRuntime {
    pub fn from_spec(spec: &PageSpec) -> Self {
        Self {
            player: spec
                .media
                .as_ref()
                .map(|media| Player::new(media.duration, media.looping)),
            opened: false,
        }
    }
}
