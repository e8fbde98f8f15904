//! Layout constants shared between hit-testing and the view.

/// Items the building game offers, in drop order.
pub(crate) const ITEM_NAMES: [&str; 5] = ["Foundation", "Cement", "Walls", "Roof", "Light"];

/// Spread art captions indexed by the building game's art index.
pub(crate) const ART_NAMES: [&str; 6] = [
    "An empty lot under the stars",
    "The foundation is poured",
    "Walls rise from the slab",
    "The roof goes on",
    "A lamp glows over the door",
    "Windows catch the moonlight",
];

/// Height of the top control bar, in logical pixels.
pub(crate) const HEADER_HEIGHT: f32 = 64.0;

/// Fraction of the window height occupied by the item strip at the bottom.
pub(crate) const ITEM_STRIP_FRACTION: f32 = 0.18;

/// The drop platform as fractions of the window: `[left, right, top, bottom]`.
pub(crate) const PLATFORM_RECT: [f32; 4] = [0.30, 0.70, 0.35, 0.75];
