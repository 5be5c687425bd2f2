use serde::{Deserialize, Serialize};

/// A scheduled fixture. Stored in `partidos.json` in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// `DD/MM/YYYY`
    pub fecha: String,
    /// `HH:MM`
    pub hora: String,
    pub local: String,
    pub visitante: String,
    pub competicion: String,
    pub cancha: String,
}

impl Match {
    /// Home and away team names.
    pub fn teams(&self) -> [&str; 2] {
        [&self.local, &self.visitante]
    }

    pub fn label(&self) -> String {
        format!(
            "{} {} — {} vs {} ({})",
            self.fecha, self.hora, self.local, self.visitante, self.competicion
        )
    }

    pub fn reference(&self) -> MatchRef {
        MatchRef {
            fecha: self.fecha.clone(),
            hora: self.hora.clone(),
            local: self.local.clone(),
            visitante: self.visitante.clone(),
            competicion: self.competicion.clone(),
            cancha: self.cancha.clone(),
        }
    }
}

/// Identifies the match a log entry was recorded in.
///
/// Every fixture field takes part, so two fixtures that share kickoff and
/// teams but differ in competition or venue keep separate logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchRef {
    pub fecha: String,
    pub hora: String,
    pub local: String,
    pub visitante: String,
    #[serde(default)]
    pub competicion: String,
    #[serde(default)]
    pub cancha: String,
}

impl MatchRef {
    pub fn refers_to(&self, m: &Match) -> bool {
        self.fecha == m.fecha
            && self.hora == m.hora
            && self.local == m.local
            && self.visitante == m.visitante
            && self.competicion == m.competicion
            && self.cancha == m.cancha
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clasico() -> Match {
        Match {
            fecha: "01/06/2025".to_string(),
            hora: "18:00".to_string(),
            local: "River".to_string(),
            visitante: "Boca".to_string(),
            competicion: "Liga".to_string(),
            cancha: "Monumental".to_string(),
        }
    }

    #[test]
    fn test_label() {
        assert_eq!(clasico().label(), "01/06/2025 18:00 — River vs Boca (Liga)");
    }

    #[test]
    fn test_reference_tells_fixtures_apart() {
        let m = clasico();
        assert!(m.reference().refers_to(&m));

        let mut cup_tie = m.clone();
        cup_tie.competicion = "Copa".to_string();
        assert!(!m.reference().refers_to(&cup_tie));

        let mut moved = m.clone();
        moved.cancha = "Otro".to_string();
        assert!(!m.reference().refers_to(&moved));

        let mut rematch = m.clone();
        rematch.fecha = "08/06/2025".to_string();
        assert!(!m.reference().refers_to(&rematch));
    }
}
