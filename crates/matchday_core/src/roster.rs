//! Roster manager
//!
//! One roster file per event holding every team's players. Team filters
//! compare trimmed, lowercased names; dorsal uniqueness only applies within
//! the teams of the active match.

use crate::error::{Result, ValidationErrors, Violation};
use crate::models::player::team_key;
use crate::models::{Match, Player, Position};
use crate::registry::{EventHandle, ROSTER_FILE};
use crate::store::NamespaceStore;
use std::collections::{BTreeSet, HashSet};

/// Team name shown when no team has been chosen yet.
pub const TEAM_PLACEHOLDER: &str = "-";

/// Raw form input for a new player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerRequest {
    pub nombre: String,
    pub dorsal: String,
    pub posicion: String,
    pub equipo: String,
}

pub struct RosterManager<'s> {
    store: &'s NamespaceStore,
}

impl<'s> RosterManager<'s> {
    pub fn new(store: &'s NamespaceStore) -> Self {
        Self { store }
    }

    /// Every player of the event, in storage order.
    pub fn list_players(&self, handle: &EventHandle) -> Result<Vec<Player>> {
        Ok(self.store.read(handle, ROSTER_FILE)?)
    }

    /// Players whose team is one of `teams`, in storage order.
    pub fn list_by_team<S: AsRef<str>>(
        &self,
        handle: &EventHandle,
        teams: &[S],
    ) -> Result<Vec<Player>> {
        let keys = team_keys(teams);
        Ok(self
            .list_players(handle)?
            .into_iter()
            .filter(|p| keys.contains(&p.team_key()))
            .collect())
    }

    /// Home and away rosters of `fixture`, each sorted by dorsal.
    pub fn list_for_match(
        &self,
        handle: &EventHandle,
        fixture: &Match,
    ) -> Result<(Vec<Player>, Vec<Player>)> {
        let mut local = self.list_by_team(handle, &[&fixture.local])?;
        let mut visitante = self.list_by_team(handle, &[&fixture.visitante])?;
        local.sort_by_key(|p| p.dorsal);
        visitante.sort_by_key(|p| p.dorsal);
        Ok((local, visitante))
    }

    /// Distinct team names found in the roster, sorted.
    pub fn team_names(&self, handle: &EventHandle) -> Result<Vec<String>> {
        let names: BTreeSet<String> = self
            .list_players(handle)?
            .into_iter()
            .map(|p| p.equipo.trim().to_string())
            .filter(|t| !is_placeholder(t))
            .collect();
        Ok(names.into_iter().collect())
    }

    /// Validate and append a player, rewriting the whole roster.
    ///
    /// `team_scope` holds the active match's teams, or nothing when no match
    /// is selected. All broken rules are reported together.
    pub fn add_player<S: AsRef<str>>(
        &self,
        handle: &EventHandle,
        team_scope: &[S],
        request: &PlayerRequest,
    ) -> Result<Player> {
        let _guard = self.store.lock(handle);
        let mut roster = self.list_players(handle)?;

        let player = validate_player(&roster, team_scope, request)?;
        roster.push(player.clone());
        self.store.write(handle, ROSTER_FILE, &roster)?;

        log::info!("Added player {} #{} to {}", player.nombre, player.dorsal, player.equipo);
        Ok(player)
    }

    /// Remove the first entry equal to `player`. Returns whether one was found.
    pub fn remove_player(&self, handle: &EventHandle, player: &Player) -> Result<bool> {
        let _guard = self.store.lock(handle);
        let mut roster = self.list_players(handle)?;

        let Some(idx) = roster.iter().position(|p| p == player) else {
            log::debug!("Player {} not in roster, nothing removed", player.display_name());
            return Ok(false);
        };

        roster.remove(idx);
        self.store.write(handle, ROSTER_FILE, &roster)?;

        log::info!("Removed player {}", player.display_name());
        Ok(true)
    }
}

fn team_keys<S: AsRef<str>>(teams: &[S]) -> HashSet<String> {
    teams.iter().map(|t| team_key(t.as_ref())).collect()
}

fn is_placeholder(team: &str) -> bool {
    let team = team.trim();
    team.is_empty() || team == TEAM_PLACEHOLDER
}

fn parse_dorsal(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn validate_player<S: AsRef<str>>(
    roster: &[Player],
    team_scope: &[S],
    request: &PlayerRequest,
) -> std::result::Result<Player, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let scope = team_keys(team_scope);
    let equipo = request.equipo.trim();
    let equipo_key = team_key(equipo);

    let nombre = request.nombre.trim();
    if nombre.is_empty() {
        errors.push(Violation::EmptyName);
    }

    let dorsal = parse_dorsal(&request.dorsal);
    match dorsal {
        None => errors.push(Violation::InvalidDorsal(request.dorsal.clone())),
        Some(dorsal) => {
            let taken = roster.iter().any(|p| {
                let key = p.team_key();
                key == equipo_key && scope.contains(&key) && p.dorsal == dorsal
            });
            if taken {
                errors.push(Violation::DorsalInUse { dorsal, equipo: equipo.to_string() });
            }
        }
    }

    let posicion = request.posicion.parse::<Position>().ok();
    if posicion.is_none() {
        errors.push(Violation::InvalidPosition(request.posicion.clone()));
    }

    if is_placeholder(equipo) {
        errors.push(Violation::EmptyTeam);
    } else if !scope.is_empty() && !scope.contains(&equipo_key) {
        errors.push(Violation::TeamNotInMatch(equipo.to_string()));
    }

    match (dorsal, posicion) {
        (Some(dorsal), Some(posicion)) if errors.is_empty() => Ok(Player {
            nombre: nombre.to_string(),
            dorsal,
            posicion,
            equipo: equipo.to_string(),
        }),
        _ => Err(errors),
    }
}
