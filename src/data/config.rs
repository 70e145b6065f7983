//! Simulation requests read from JSON or YAML files.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::combatant::Combatant;

pub const DEFAULT_TRIALS: u32 = 1000;
pub const MAX_TRIALS: u32 = 100_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("trials must be between 1 and {max}, got {got}")]
    Trials { got: u32, max: u32 },
    #[error("{side}.max_life must be greater than 0")]
    MaxLife { side: &'static str },
}

/// Two combatants and how many fights to run between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationRequest {
    pub attacker: Combatant,
    pub defender: Combatant,
    pub trials: u32,
    /// Drawn from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for SimulationRequest {
    fn default() -> Self {
        Self {
            attacker: Combatant::named("Attacker"),
            defender: Combatant::named("Defender"),
            trials: DEFAULT_TRIALS,
            seed: None,
        }
    }
}

impl SimulationRequest {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_TRIALS).contains(&self.trials) {
            return Err(ConfigError::Trials {
                got: self.trials,
                max: MAX_TRIALS,
            });
        }
        for (side, combatant) in [("attacker", &self.attacker), ("defender", &self.defender)] {
            if combatant.max_life == 0 {
                return Err(ConfigError::MaxLife { side });
            }
        }
        Ok(())
    }
}

/// Reads a request file. `.yaml`/`.yml` files are parsed as YAML, everything else as JSON.
pub fn load_request(path: &Path) -> Result<SimulationRequest, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    if is_yaml {
        SimulationRequest::from_yaml(&raw)
    } else {
        SimulationRequest::from_json(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::slots::WeaponSlot;

    #[test]
    fn empty_request_gets_defaults() {
        let request = SimulationRequest::from_json("{}").expect("empty object parses");
        assert_eq!(request.trials, DEFAULT_TRIALS);
        assert_eq!(request.seed, None);
        assert_eq!(request.attacker.name, "Attacker");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn yaml_and_json_describe_the_same_request() {
        let json = r#"{
            "attacker": { "name": "A", "stats": { "strength": 500.0 } },
            "trials": 10,
            "seed": 7
        }"#;
        let yaml = "attacker:\n  name: A\n  stats:\n    strength: 500.0\ntrials: 10\nseed: 7\n";
        let from_json = SimulationRequest::from_json(json).expect("json");
        let from_yaml = SimulationRequest::from_yaml(yaml).expect("yaml");
        assert_eq!(from_json, from_yaml);
        assert_eq!(from_json.attacker.stats.strength, 500.0);
        assert!(from_json.attacker.weapons.get(WeaponSlot::Primary).is_none());
    }

    #[test]
    fn trial_bounds_are_enforced() {
        let mut request = SimulationRequest {
            trials: 0,
            ..SimulationRequest::default()
        };
        assert!(matches!(
            request.validate(),
            Err(ConfigError::Trials { got: 0, .. })
        ));
        request.trials = MAX_TRIALS + 1;
        assert!(request.validate().is_err());
        request.trials = MAX_TRIALS;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn lifeless_combatants_are_rejected() {
        let mut request = SimulationRequest::default();
        request.defender.max_life = 0;
        assert!(matches!(
            request.validate(),
            Err(ConfigError::MaxLife { side: "defender" })
        ));
        request.defender.max_life = 1;
        request.attacker.max_life = 0;
        assert!(matches!(
            request.validate(),
            Err(ConfigError::MaxLife { side: "attacker" })
        ));
    }
}
