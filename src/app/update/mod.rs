use crate::media::MediaAction;

mod core;
mod games;
mod pages;
mod pointer;

/// Describes work that must be performed outside the pure reducer.
pub(super) enum Effect {
    /// Routes a transport command to the player owned by `page`.
    Media { page: usize, action: MediaAction },
}
