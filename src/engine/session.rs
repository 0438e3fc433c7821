use crate::error::GameError;
use crate::types::{Phase, Player, Session};
use std::collections::HashMap;

/// Minimum number of participants before the lobby can close.
pub const MIN_PLAYERS: usize = 2;

fn new_player(name: &str, is_host: bool, joined_at: u64) -> Player {
    Player {
        name: name.to_string(),
        is_host,
        joined_at,
        submitted_passwords: Vec::new(),
        assigned_password: None,
        setup_complete: false,
    }
}

impl Session {
    /// Open a new session in the lobby with the host as its first player.
    pub fn create(
        host_name: &str,
        code: String,
        created_at: String,
    ) -> Result<Session, GameError> {
        let host = host_name.trim();
        if host.is_empty() {
            return Err(GameError::InvalidInput(
                "host name must not be empty".to_string(),
            ));
        }

        let mut players = HashMap::new();
        players.insert(host.to_string(), new_player(host, true, 0));

        Ok(Session {
            code,
            version: 1,
            host: host.to_string(),
            phase: Phase::Lobby,
            players,
            questions: Vec::new(),
            active_player_index: 0,
            winner: None,
            created_at,
        })
    }

    /// Add a player while the lobby is open.
    pub fn join(&self, player_name: &str) -> Result<Session, GameError> {
        let name = player_name.trim();
        if name.is_empty() {
            return Err(GameError::InvalidInput(
                "player name must not be empty".to_string(),
            ));
        }
        if self.phase != Phase::Lobby {
            return Err(GameError::InvalidPhase(self.phase));
        }
        if self.players.contains_key(name) {
            return Err(GameError::DuplicateName(name.to_string()));
        }

        let mut next = self.clone();
        next.players
            .insert(name.to_string(), new_player(name, false, self.next_join_seq()));
        Ok(next)
    }

    /// Close the lobby and start collecting passwords. Host-only; the
    /// caller checks the role, the engine only checks the rules.
    pub fn advance_to_password_submission(&self) -> Result<Session, GameError> {
        if self.phase != Phase::Lobby {
            return Err(GameError::InvalidPhase(self.phase));
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers {
                min: MIN_PLAYERS,
                have: self.players.len(),
            });
        }

        let mut next = self.clone();
        next.phase = Phase::SubmittingPasswords;
        Ok(next)
    }
}
