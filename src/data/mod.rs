pub mod config;
pub mod game_data;
pub mod loader;

pub use config::{load_request, ConfigError, SimulationRequest, DEFAULT_TRIALS, MAX_TRIALS};
pub use game_data::{GameData, GameDataOverlay, GameDataSource, ModData};
pub use loader::{load_game_data, load_game_data_from, GAME_DATA_ENV};
