//! Built-in game music and sound effects.

mod effects;
mod tracks;

pub use effects::builtin_effects;
pub use tracks::builtin_tracks;

/// Names of the built-in tracks.
pub const TRACK_NAMES: [&str; 6] = [
    "title",
    "overworld",
    "overworld_dark",
    "cavern",
    "boss",
    "victory",
];

/// Names of the built-in effects.
pub const EFFECT_NAMES: [&str; 9] = [
    "jump",
    "coin",
    "hit",
    "powerup",
    "menu_move",
    "menu_select",
    "toggle",
    "level_complete",
    "game_over",
];
