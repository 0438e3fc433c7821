use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque ID types for type safety
pub type SessionCode = String;
pub type PlayerName = String;
pub type QuestionId = u64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Lobby,
    SubmittingPasswords,
    Playing,
    Finished,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub name: PlayerName,
    pub is_host: bool,
    /// Logical join sequence number; derives turn order.
    pub joined_at: u64,
    pub submitted_passwords: Vec<String>,
    /// The secret this player must not give away. None until play starts;
    /// never one of the player's own submitted passwords.
    pub assigned_password: Option<String>,
    pub setup_complete: bool,
}

/// One turn's inquiry plus the answers it collects. Immutable once every
/// expected responder has answered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub id: QuestionId,
    pub asker: PlayerName,
    pub text: String,
    pub answers: HashMap<PlayerName, String>,
    pub is_complete: bool,
}

/// The shared game record. The whole value is replaced on every action;
/// players and questions have no lifecycle of their own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub code: SessionCode,
    /// Bumped by the store on every successful publish; the token for
    /// compare-and-swap replacement.
    pub version: u64,
    pub host: PlayerName,
    pub phase: Phase,
    pub players: HashMap<PlayerName, Player>,
    pub questions: Vec<Question>,
    pub active_player_index: usize,
    pub winner: Option<PlayerName>,
    pub created_at: String,
}

impl Session {
    /// Players in join order, the fixed turn sequence.
    pub fn turn_order(&self) -> Vec<&Player> {
        let mut players: Vec<&Player> = self.players.values().collect();
        players.sort_by_key(|p| p.joined_at);
        players
    }

    /// The player whose turn it is, valid while the game is in progress.
    pub fn active_player(&self) -> Option<&Player> {
        self.turn_order().get(self.active_player_index).copied()
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.get(name)
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub(crate) fn next_question_id(&self) -> QuestionId {
        self.questions.iter().map(|q| q.id).max().unwrap_or(0) + 1
    }

    pub(crate) fn next_join_seq(&self) -> u64 {
        self.players
            .values()
            .map(|p| p.joined_at)
            .max()
            .map_or(0, |n| n + 1)
    }
}
