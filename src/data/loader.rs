//! Game-data tables: built-ins, optionally patched by a JSON overlay. A missing or broken
//! overlay is logged and ignored.

use std::env;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::data::config::ConfigError;
use crate::data::game_data::{GameData, GameDataOverlay};

/// Path to a JSON [GameDataOverlay].
pub const GAME_DATA_ENV: &str = "DUELSIM_GAME_DATA";

/// Built-in tables merged with the overlay at `path`.
pub fn load_game_data_from(path: &Path) -> Result<GameData, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let overlay: GameDataOverlay = serde_json::from_str(&raw)?;
    let mut data = GameData::builtin();
    data.merge(overlay);
    Ok(data)
}

/// Built-in tables, patched by the file named in `DUELSIM_GAME_DATA` when it is set.
pub fn load_game_data() -> GameData {
    let Ok(path) = env::var(GAME_DATA_ENV) else {
        return GameData::builtin();
    };
    match load_game_data_from(Path::new(&path)) {
        Ok(data) => {
            info!(path = %path, "loaded game data overlay");
            data
        }
        Err(err) => {
            warn!(path = %path, error = %err, "ignoring game data overlay");
            GameData::builtin()
        }
    }
}
