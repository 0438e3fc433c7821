use crate::error::GameError;
use crate::types::{Phase, Session};
use rand::Rng;

impl Session {
    /// Replace a player's contributed passwords: entries are trimmed,
    /// empties dropped, duplicates collapsed to their first occurrence.
    pub fn submit_passwords(
        &self,
        player_name: &str,
        words: &[String],
    ) -> Result<Session, GameError> {
        if self.phase != Phase::SubmittingPasswords {
            return Err(GameError::InvalidPhase(self.phase));
        }
        if !self.players.contains_key(player_name) {
            return Err(GameError::UnknownPlayer(player_name.to_string()));
        }

        let mut usable: Vec<String> = Vec::new();
        for word in words {
            let word = word.trim();
            if word.is_empty() || usable.iter().any(|w| w == word) {
                continue;
            }
            usable.push(word.to_string());
        }
        if usable.is_empty() {
            return Err(GameError::EmptySubmission);
        }

        let mut next = self.clone();
        if let Some(player) = next.players.get_mut(player_name) {
            player.submitted_passwords = usable;
            player.setup_complete = true;
        }
        Ok(next)
    }

    /// Deal every player one password from the shared pool, never their own.
    ///
    /// Greedy random assignment in turn order: pick uniformly among the
    /// unassigned pool entries another player submitted, remove the pick,
    /// move on. The pass can dead-end with the last players holding only
    /// their own words even though a valid assignment exists; that surfaces
    /// as `InsufficientPasswords` and the caller is free to retry.
    pub fn start_playing<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Session, GameError> {
        if self.phase != Phase::SubmittingPasswords {
            return Err(GameError::InvalidPhase(self.phase));
        }

        let order = self.turn_order();
        for player in &order {
            if !player.setup_complete {
                return Err(GameError::IncompleteSetup(player.name.clone()));
            }
        }

        // Global pool of (password, submitter) pairs, in turn order
        let mut pool: Vec<(String, String)> = Vec::new();
        for player in &order {
            for word in &player.submitted_passwords {
                pool.push((word.clone(), player.name.clone()));
            }
        }

        let mut assignments: Vec<(String, String)> = Vec::new();
        for player in &order {
            let candidates: Vec<usize> = pool
                .iter()
                .enumerate()
                .filter(|(_, (_, submitter))| submitter != &player.name)
                .map(|(i, _)| i)
                .collect();
            if candidates.is_empty() {
                return Err(GameError::InsufficientPasswords);
            }
            let pick = candidates[rng.random_range(0..candidates.len())];
            let (word, _) = pool.swap_remove(pick);
            assignments.push((player.name.clone(), word));
        }

        let mut next = self.clone();
        for (name, word) in assignments {
            if let Some(player) = next.players.get_mut(&name) {
                player.assigned_password = Some(word);
            }
        }
        next.phase = Phase::Playing;
        next.active_player_index = 0;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Deterministic "always pick the first candidate" source.
    struct ZeroRng;

    impl rand::RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }
    }

    fn strings(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn submitting(names: &[&str]) -> Session {
        let mut session = Session::create(
            names[0],
            "TEST42".to_string(),
            "2026-08-07T12:00:00Z".to_string(),
        )
        .unwrap();
        for name in &names[1..] {
            session = session.join(name).unwrap();
        }
        session.advance_to_password_submission().unwrap()
    }

    #[test]
    fn test_submit_trims_dedupes_and_drops_empties() {
        let session = submitting(&["Ann", "Bob"]);
        let session = session
            .submit_passwords(
                "Ann",
                &strings(&["  tree ", "", "car", "tree", "   ", "blue sky"]),
            )
            .unwrap();

        let ann = &session.players["Ann"];
        assert_eq!(ann.submitted_passwords, strings(&["tree", "car", "blue sky"]));
        assert!(ann.setup_complete);
        assert!(!session.players["Bob"].setup_complete);
    }

    #[test]
    fn test_submit_rejects_empty_submission() {
        let session = submitting(&["Ann", "Bob"]);
        assert_eq!(
            session.submit_passwords("Ann", &strings(&["", "  "])),
            Err(GameError::EmptySubmission)
        );
    }

    #[test]
    fn test_submit_checks_phase_and_membership() {
        let lobby = Session::create("Ann", "TEST42".to_string(), String::new()).unwrap();
        assert_eq!(
            lobby.submit_passwords("Ann", &strings(&["tree"])),
            Err(GameError::InvalidPhase(Phase::Lobby))
        );

        let session = submitting(&["Ann", "Bob"]);
        assert_eq!(
            session.submit_passwords("Mallory", &strings(&["tree"])),
            Err(GameError::UnknownPlayer("Mallory".to_string()))
        );
    }

    #[test]
    fn test_resubmission_replaces_previous_words() {
        let session = submitting(&["Ann", "Bob"]);
        let session = session
            .submit_passwords("Ann", &strings(&["tree"]))
            .unwrap()
            .submit_passwords("Ann", &strings(&["car", "book"]))
            .unwrap();
        assert_eq!(
            session.players["Ann"].submitted_passwords,
            strings(&["car", "book"])
        );
    }

    #[test]
    fn test_start_playing_requires_everyone_ready() {
        let session = submitting(&["Ann", "Bob"]);
        let session = session.submit_passwords("Ann", &strings(&["tree"])).unwrap();

        assert_eq!(
            session.start_playing(&mut rand::rng()),
            Err(GameError::IncompleteSetup("Bob".to_string()))
        );
    }

    #[test]
    fn test_start_playing_only_while_submitting() {
        let lobby = Session::create("Ann", "TEST42".to_string(), String::new()).unwrap();
        assert_eq!(
            lobby.start_playing(&mut rand::rng()),
            Err(GameError::InvalidPhase(Phase::Lobby))
        );
    }

    #[test]
    fn test_two_player_assignment_is_the_forced_swap() {
        let session = submitting(&["Ann", "Bob"])
            .submit_passwords("Ann", &strings(&["tree"]))
            .unwrap()
            .submit_passwords("Bob", &strings(&["car"]))
            .unwrap();

        // Only one valid assignment exists, whatever the dice say
        let playing = session.start_playing(&mut rand::rng()).unwrap();
        assert_eq!(playing.phase, Phase::Playing);
        assert_eq!(playing.active_player_index, 0);
        assert_eq!(playing.players["Ann"].assigned_password.as_deref(), Some("car"));
        assert_eq!(playing.players["Bob"].assigned_password.as_deref(), Some("tree"));
    }

    #[test]
    fn test_nobody_ever_gets_their_own_password() {
        let session = submitting(&["Ann", "Bob", "Carol", "Dave"])
            .submit_passwords("Ann", &strings(&["apple", "anchor"]))
            .unwrap()
            .submit_passwords("Bob", &strings(&["boat", "bridge"]))
            .unwrap()
            .submit_passwords("Carol", &strings(&["cloud", "candle"]))
            .unwrap()
            .submit_passwords("Dave", &strings(&["drum", "door"]))
            .unwrap();

        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let playing = match session.start_playing(&mut rng) {
                Ok(s) => s,
                // A dead-ended greedy pass is a legal, retryable outcome
                Err(GameError::InsufficientPasswords) => continue,
                Err(e) => panic!("unexpected error: {e}"),
            };
            for player in playing.players.values() {
                let assigned = player.assigned_password.as_deref().expect("assigned");
                assert!(
                    !player.submitted_passwords.iter().any(|w| w == assigned),
                    "{} was dealt their own password {:?} (seed {})",
                    player.name,
                    assigned,
                    seed
                );
            }
        }
    }

    #[test]
    fn test_dead_ended_pool_is_a_retryable_failure() {
        // One word each: first-candidate picks leave Carol with only her own
        let session = submitting(&["Ann", "Bob", "Carol"])
            .submit_passwords("Ann", &strings(&["apple"]))
            .unwrap()
            .submit_passwords("Bob", &strings(&["boat"]))
            .unwrap()
            .submit_passwords("Carol", &strings(&["cloud"]))
            .unwrap();

        assert_eq!(
            session.start_playing(&mut ZeroRng),
            Err(GameError::InsufficientPasswords)
        );
    }
}
