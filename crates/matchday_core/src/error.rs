use crate::live::InvalidTransition;
use crate::store::StoreError;
use std::fmt;
use thiserror::Error;

/// One broken input rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("Event id must be exactly 7 characters (got {0})")]
    EventIdLength(usize),

    #[error("Event id '{0}' must not contain path separators or dot segments")]
    InvalidEventId(String),

    #[error("Player name is required")]
    EmptyName,

    #[error("Dorsal must be a non-negative integer (got '{0}')")]
    InvalidDorsal(String),

    #[error("Dorsal {dorsal} is already in use in {equipo}")]
    DorsalInUse { dorsal: u32, equipo: String },

    #[error("Invalid player position: {0}")]
    InvalidPosition(String),

    #[error("Team is required")]
    EmptyTeam,

    #[error("Team '{0}' is not playing the active match")]
    TeamNotInMatch(String),

    #[error("Home and away teams cannot be the same team")]
    SameTeams,

    #[error("Match date and time are required")]
    MissingKickoff,

    #[error("Both teams are required")]
    MissingTeams,
}

/// Every rule a rejected input broke, in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// `Ok` when nothing was recorded.
    pub fn into_result(self) -> std::result::Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<Violation> for ValidationErrors {
    fn from(violation: Violation) -> Self {
        Self { violations: vec![violation] }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: ")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl CoreError {
    /// Violations carried by a validation failure, empty otherwise.
    pub fn violations(&self) -> &[Violation] {
        match self {
            CoreError::Validation(errors) => errors.violations(),
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
