pub mod achievements;
pub mod config;
pub mod dates;
pub mod error;
pub mod game_api;
pub mod journal;
pub mod level;
pub mod model;
pub mod roller;
pub mod rollover;
pub mod storage;
pub mod streak;
