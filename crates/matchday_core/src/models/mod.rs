//! Persisted record types.
//!
//! Field names match the on-disk JSON exactly. Closed vocabularies serialize
//! with their Spanish display labels, accents included.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind}: '{value}'")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

/// Lowercase and drop Spanish accents so "exito" parses as "Éxito".
pub(crate) fn fold(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            other => other,
        })
        .collect()
}

/// Closed vocabulary enum: Spanish label on disk, English alias accepted on input.
macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal | $alias:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            fn alias(self) -> &'static str {
                match self {
                    $($name::$variant => $alias,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad(self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let key = $crate::models::fold(s);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| $crate::models::fold(v.label()) == key || v.alias() == key)
                    .ok_or_else(|| $crate::models::UnknownLabel {
                        kind: stringify!($name),
                        value: s.to_string(),
                    })
            }
        }
    };
}

pub mod event;
pub mod fixture;
pub mod log_entry;
pub mod player;

pub use event::EventMeta;
pub use fixture::{Match, MatchRef};
pub use log_entry::{Action, LogEntry, Outcome, Period, Zone};
pub use player::{Player, Position};
