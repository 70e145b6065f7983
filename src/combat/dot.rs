//! Damage-over-time channels a fighter has inflicted on its opponent.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DotChannel {
    Burn,
    Poison,
    Laceration,
    SevereBurn,
}

impl DotChannel {
    pub const ALL: [DotChannel; 4] = [
        DotChannel::Burn,
        DotChannel::Poison,
        DotChannel::Laceration,
        DotChannel::SevereBurn,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Total ticks before the channel expires.
    pub const fn duration(self) -> u32 {
        match self {
            Self::Burn => 3,
            Self::SevereBurn => 5,
            Self::Poison | Self::Laceration => 9,
        }
    }

    /// Fraction of the magnitude dealt on the first tick.
    pub const fn peak_fraction(self) -> f64 {
        match self {
            Self::Burn => 0.15,
            Self::SevereBurn => 0.25,
            Self::Poison => 0.09,
            Self::Laceration => 0.18,
        }
    }

    /// Fraction dealt on tick `elapsed` (0-based); decays linearly to zero at the end.
    pub fn fraction_at(self, elapsed: u32) -> f64 {
        let duration = self.duration();
        if elapsed >= duration {
            return 0.0;
        }
        self.peak_fraction() * f64::from(duration - elapsed) / f64::from(duration)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Burn => "burning",
            Self::Poison => "poison",
            Self::Laceration => "laceration",
            Self::SevereBurn => "severe burning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DotEffect {
    pub magnitude: f64,
    pub elapsed_ticks: u32,
}

impl DotEffect {
    pub fn next_tick_damage(&self, channel: DotChannel) -> f64 {
        self.magnitude * channel.fraction_at(self.elapsed_ticks)
    }
}

/// One DOT tick that landed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotTick {
    pub channel: DotChannel,
    pub damage: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DotState {
    channels: [Option<DotEffect>; 4],
}

impl DotState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, channel: DotChannel) -> Option<DotEffect> {
        self.channels[channel.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.channels.iter().all(Option::is_none)
    }

    /// Starts `channel` at `magnitude` unless the running application's next tick would hit harder.
    /// Returns whether the channel was (re)started.
    pub fn apply(&mut self, channel: DotChannel, magnitude: f64) -> bool {
        if !magnitude.is_finite() || magnitude <= 0.0 {
            return false;
        }
        let incoming = DotEffect {
            magnitude,
            elapsed_ticks: 0,
        };
        let slot = &mut self.channels[channel.index()];
        let replace = match slot {
            Some(current) => {
                incoming.next_tick_damage(channel) >= current.next_tick_damage(channel)
            }
            None => true,
        };
        if replace {
            *slot = Some(incoming);
        }
        replace
    }

    /// Advances every channel one tick against an opponent at `target_life`.
    /// Damage never takes the opponent below 1 life.
    pub fn tick(&mut self, target_life: u32) -> Vec<DotTick> {
        let mut ticks = Vec::new();
        let mut life = target_life;
        for channel in DotChannel::ALL {
            let slot = &mut self.channels[channel.index()];
            let Some(effect) = slot.as_mut() else {
                continue;
            };
            let raw = effect.next_tick_damage(channel).round();
            let raw = if raw.is_finite() { raw.max(0.0) } else { 0.0 };
            let damage = (raw as u32).min(life.saturating_sub(1));
            effect.elapsed_ticks += 1;
            if effect.elapsed_ticks >= channel.duration() {
                *slot = None;
            }
            if damage > 0 {
                life -= damage;
                ticks.push(DotTick { channel, damage });
            }
        }
        ticks
    }
}
