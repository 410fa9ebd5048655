use std::fmt;
use std::str::FromStr;

/// The two fermentation phases a dough can go through.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LegKind {
    Room,
    Fridge,
}

impl fmt::Display for LegKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LegKind::Room => "Room",
            LegKind::Fridge => "Fridge",
        };
        f.write_str(label)
    }
}

/// Temperature and whole hours of one leg.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LegSetting {
    pub temperature: f64,
    pub hours: u32,
}

impl LegSetting {
    pub const OFF: LegSetting = LegSetting {
        temperature: 0.0,
        hours: 0,
    };

    pub fn new(temperature: f64, hours: u32) -> Self {
        LegSetting { temperature, hours }
    }
}

/// Which legs a schedule uses.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProofingMode {
    Both,
    RoomOnly,
    ColdOnly,
}

impl ProofingMode {
    pub const ALL: &'static [ProofingMode] = &[
        ProofingMode::Both,
        ProofingMode::RoomOnly,
        ProofingMode::ColdOnly,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProofingMode::Both => "Both",
            ProofingMode::RoomOnly => "Room proof only",
            ProofingMode::ColdOnly => "Cold proof only",
        }
    }

    /// Mode implied by which legs have non-zero hours. A schedule with no
    /// hours on either leg reports `Both`.
    pub fn from_hours(room_hours: u32, fridge_hours: u32) -> Self {
        match (room_hours > 0, fridge_hours > 0) {
            (true, false) => ProofingMode::RoomOnly,
            (false, true) => ProofingMode::ColdOnly,
            _ => ProofingMode::Both,
        }
    }

    pub fn uses(self, leg: LegKind) -> bool {
        !matches!(
            (self, leg),
            (ProofingMode::RoomOnly, LegKind::Fridge) | (ProofingMode::ColdOnly, LegKind::Room)
        )
    }
}

impl fmt::Display for ProofingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProofingMode {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "both" | "Both" => Ok(ProofingMode::Both),
            "room" | "Room proof only" => Ok(ProofingMode::RoomOnly),
            "cold" | "Cold proof only" => Ok(ProofingMode::ColdOnly),
            _ => Err(()),
        }
    }
}
