use crate::error::GameError;
use crate::types::{Phase, Question, QuestionId, Session};
use std::collections::HashMap;

/// Password tokens of two characters or fewer never count as revealed;
/// articles and fillers would end games by accident.
const MIN_TOKEN_CHARS: usize = 3;

/// Whether `text` gives away `password`.
///
/// Both sides are lower-cased and split on whitespace; a password token
/// counts as found when it is at least three characters long and some text
/// token contains it as a substring. Returns the first found token.
pub fn revealed_token(password: &str, text: &str) -> Option<String> {
    let text = text.to_lowercase();
    let text_tokens: Vec<&str> = text.split_whitespace().collect();
    password
        .to_lowercase()
        .split_whitespace()
        .find(|p| {
            p.chars().count() >= MIN_TOKEN_CHARS && text_tokens.iter().any(|t| t.contains(p))
        })
        .map(|p| p.to_string())
}

impl Session {
    /// The active player asks a question — or accidentally ends the game.
    ///
    /// A question containing a token of the asker's own assigned password
    /// wins immediately and unconditionally, even when phrased as a
    /// statement rather than a guess. Otherwise the question is appended
    /// and waits for the other players' answers.
    pub fn ask_question(&self, asker_name: &str, text: &str) -> Result<Session, GameError> {
        if self.phase != Phase::Playing {
            return Err(GameError::InvalidPhase(self.phase));
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(GameError::InvalidInput(
                "question text must not be empty".to_string(),
            ));
        }
        let asker = self
            .player(asker_name)
            .ok_or_else(|| GameError::UnknownPlayer(asker_name.to_string()))?;
        match self.active_player() {
            Some(active) if active.name == asker.name => {}
            _ => return Err(GameError::NotYourTurn(asker_name.to_string())),
        }

        if let Some(password) = &asker.assigned_password {
            if revealed_token(password, text).is_some() {
                let mut next = self.clone();
                next.phase = Phase::Finished;
                next.winner = Some(asker.name.clone());
                return Ok(next);
            }
        }

        let mut next = self.clone();
        next.questions.push(Question {
            id: self.next_question_id(),
            asker: asker.name.clone(),
            text: text.to_string(),
            answers: HashMap::new(),
            is_complete: false,
        });
        Ok(next)
    }

    /// Record a responder's answer to an open question.
    ///
    /// Once every player but the asker has answered, the question is sealed
    /// and the turn moves to the next player, wrapping around.
    pub fn answer_question(
        &self,
        question_id: QuestionId,
        responder_name: &str,
        answer_text: &str,
    ) -> Result<Session, GameError> {
        if self.phase != Phase::Playing {
            return Err(GameError::InvalidPhase(self.phase));
        }
        let answer = answer_text.trim();
        if answer.is_empty() {
            return Err(GameError::InvalidInput(
                "answer text must not be empty".to_string(),
            ));
        }
        if !self.players.contains_key(responder_name) {
            return Err(GameError::UnknownPlayer(responder_name.to_string()));
        }
        let question = self
            .question(question_id)
            .ok_or(GameError::UnknownQuestion(question_id))?;
        if question.is_complete
            || question.asker == responder_name
            || question.answers.contains_key(responder_name)
        {
            return Err(GameError::NotExpectedResponder(responder_name.to_string()));
        }

        let mut next = self.clone();
        let player_count = next.players.len();
        if let Some(q) = next.questions.iter_mut().find(|q| q.id == question_id) {
            q.answers.insert(responder_name.to_string(), answer.to_string());
            let all_answered = self
                .players
                .keys()
                .filter(|name| name.as_str() != q.asker)
                .all(|name| q.answers.contains_key(name));
            if all_answered {
                q.is_complete = true;
                next.active_player_index = (self.active_player_index + 1) % player_count;
            }
        }
        Ok(next)
    }
}
