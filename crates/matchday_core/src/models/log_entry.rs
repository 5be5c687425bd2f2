use super::fixture::MatchRef;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

vocabulary! {
    /// Half of the match an action happened in.
    Period {
        FirstHalf => "1er tiempo" | "first half",
        SecondHalf => "2do tiempo" | "second half",
    }
}

impl Default for Period {
    fn default() -> Self {
        Period::FirstHalf
    }
}

vocabulary! {
    Action {
        Goal => "Gol" | "goal",
        Shot => "Tiro" | "shot",
        Pass => "Pase" | "pass",
        Steal => "Robo" | "steal",
        Foul => "Falta" | "foul",
        Recovery => "Recuperación" | "recovery",
        Loss => "Pérdida" | "loss",
    }
}

vocabulary! {
    /// Pitch third where the action took place.
    Zone {
        Defense => "Defensa" | "defense",
        Midfield => "Medio" | "midfield",
        Attack => "Ataque" | "attack",
    }
}

vocabulary! {
    Outcome {
        Success => "Éxito" | "success",
        Failure => "Fracaso" | "failure",
    }
}

/// One recorded in-game action, stored in `events_log.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub periodo: Period,
    /// Match clock at capture time, `MM:SS`
    pub tiempo: String,
    /// `"<nombre> (<equipo>)"`
    pub jugador: String,
    pub accion: Action,
    pub zona: Zone,
    pub resultado: Outcome,
    #[serde(with = "wall_clock")]
    pub timestamp: NaiveDateTime,
    /// Absent on entries written before logs were tied to a match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_ref: Option<MatchRef>,
}

impl LogEntry {
    /// `timestamp` as written on disk.
    pub fn timestamp_text(&self) -> String {
        self.timestamp.format(wall_clock::FORMAT).to_string()
    }
}

pub(crate) mod wall_clock {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(de::Error::custom)
    }
}
