use serde::{Deserialize, Serialize};

vocabulary! {
    /// Positions offered when registering a player.
    Position {
        Portero => "Portero" | "goalkeeper",
        Defensa => "Defensa" | "defender",
        Centrocampista => "Centrocampista" | "midfielder",
        Delantero => "Delantero" | "forward",
    }
}

/// Roster entry stored in `plantilla.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub nombre: String,
    pub dorsal: u32,
    pub posicion: Position,
    pub equipo: String,
}

impl Player {
    /// `"<nombre> (<equipo>)"`, the form used in the action log.
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.nombre, self.equipo)
    }

    /// Team comparison key: trimmed, lowercased.
    pub fn team_key(&self) -> String {
        team_key(&self.equipo)
    }
}

pub fn team_key(team: &str) -> String {
    team.trim().to_lowercase()
}
