#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod coord;
pub mod countdown;
pub mod error;
pub mod event;
pub mod player_id;
pub mod scrambled_words;
pub mod socketio;
pub mod surface;
pub mod team;
pub mod team_guess;
pub mod test_util;
pub mod tile_board;


// Text of the confirmation every game asks for before discarding the current board.
pub const NEW_GAME_CONFIRMATION: &str =
    "Do you want to start a new game? The current board will be cleared.";
