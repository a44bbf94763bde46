pub mod game_state;
pub mod message;
pub mod response;
pub mod save;
