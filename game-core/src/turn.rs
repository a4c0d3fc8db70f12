use std::collections::HashSet;

pub const DEFAULT_ROUND_SECONDS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// Fewer than two participants.
    WaitingForPlayers,
    /// A drawer has been prompted but has not chosen a word.
    AwaitingWord,
    /// Word chosen, countdown running, guesses accepted.
    Drawing,
}

/// Whose turn it is, the secret word and the countdown bookkeeping for one room.
///
/// The countdown itself runs elsewhere; this only tracks the remaining seconds and
/// an epoch that changes whenever the countdown is armed or disarmed, so a tick
/// carrying an old epoch can be recognised and ignored.
#[derive(Debug, Clone)]
pub struct TurnState {
    drawer_index: usize,
    secret_word: Option<String>,
    correct_guessers: HashSet<String>,
    round_seconds: u32,
    remaining_seconds: u32,
    timer_epoch: u64,
    timer_running: bool,
}

impl TurnState {
    pub fn new(round_seconds: u32) -> Self {
        Self {
            drawer_index: 0,
            secret_word: None,
            correct_guessers: HashSet::new(),
            round_seconds,
            remaining_seconds: round_seconds,
            timer_epoch: 0,
            timer_running: false,
        }
    }

    pub fn phase(&self, roster_len: usize) -> TurnPhase {
        if roster_len < 2 {
            TurnPhase::WaitingForPlayers
        } else if self.secret_word.is_some() {
            TurnPhase::Drawing
        } else {
            TurnPhase::AwaitingWord
        }
    }

    pub fn drawer_index(&self) -> usize {
        self.drawer_index
    }

    pub fn secret_word(&self) -> Option<&str> {
        self.secret_word.as_deref()
    }

    pub fn set_word(&mut self, word: String) {
        self.secret_word = Some(word);
        self.correct_guessers.clear();
    }

    pub fn round_seconds(&self) -> u32 {
        self.round_seconds
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn timer_epoch(&self) -> u64 {
        self.timer_epoch
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer_running
    }

    /// Ends the current round and hands the turn to the next participant.
    pub fn advance(&mut self, roster_len: usize) {
        self.clear_round();
        self.drawer_index = if roster_len == 0 {
            0
        } else {
            (self.drawer_index + 1) % roster_len
        };
    }

    pub fn clear_round(&mut self) {
        self.secret_word = None;
        self.correct_guessers.clear();
    }

    /// Keeps the drawer index inside the roster after a removal at `removed_index`.
    /// Returns true if the removed participant was the drawer.
    pub fn on_participant_removed(&mut self, removed_index: usize, name: &str, roster_len: usize) -> bool {
        self.correct_guessers.remove(name);

        let was_drawer = removed_index == self.drawer_index;
        if removed_index < self.drawer_index {
            self.drawer_index -= 1;
        }
        if self.drawer_index >= roster_len {
            self.drawer_index = 0;
        }
        was_drawer
    }

    /// Starts (or restarts) the countdown. Returns the epoch the ticker must present.
    pub fn arm_timer(&mut self) -> u64 {
        self.timer_epoch += 1;
        self.timer_running = true;
        self.remaining_seconds = self.round_seconds;
        self.timer_epoch
    }

    /// Stops the countdown and resets the display value. Returns true if it was running.
    pub fn disarm_timer(&mut self) -> bool {
        let was_running = self.timer_running;
        if was_running {
            self.timer_epoch += 1;
        }
        self.timer_running = false;
        self.remaining_seconds = self.round_seconds;
        was_running
    }

    /// One second elapsed. `None` if the tick belongs to a countdown that no longer exists.
    pub fn tick(&mut self, epoch: u64) -> Option<u32> {
        if !self.timer_running || epoch != self.timer_epoch {
            return None;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        Some(self.remaining_seconds)
    }

    pub fn has_guessed(&self, name: &str) -> bool {
        self.correct_guessers.contains(name)
    }

    pub fn record_correct_guess(&mut self, name: &str) -> bool {
        self.correct_guessers.insert(name.to_string())
    }

    /// Every participant except the drawer has guessed the word this round.
    pub fn everyone_guessed(&self, roster_len: usize) -> bool {
        self.secret_word.is_some()
            && !self.correct_guessers.is_empty()
            && self.correct_guessers.len() + 1 >= roster_len
    }

    pub fn rename_guesser(&mut self, old_name: &str, new_name: &str) {
        if self.correct_guessers.remove(old_name) {
            self.correct_guessers.insert(new_name.to_string());
        }
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new(DEFAULT_ROUND_SECONDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_transitions() {
        let mut turn = TurnState::default();
        assert_eq!(turn.phase(1), TurnPhase::WaitingForPlayers);
        assert_eq!(turn.phase(2), TurnPhase::AwaitingWord);

        turn.set_word("cat".to_string());
        assert_eq!(turn.phase(2), TurnPhase::Drawing);

        turn.advance(2);
        assert_eq!(turn.phase(2), TurnPhase::AwaitingWord);
        assert_eq!(turn.drawer_index(), 1);

        turn.advance(2);
        assert_eq!(turn.drawer_index(), 0);
    }

    #[test]
    fn test_stale_epoch_ticks_are_ignored() {
        let mut turn = TurnState::new(3);
        let first = turn.arm_timer();
        assert_eq!(turn.tick(first), Some(2));

        let second = turn.arm_timer();
        assert_ne!(first, second);
        assert_eq!(turn.remaining_seconds(), 3);
        assert_eq!(turn.tick(first), None);
        assert_eq!(turn.tick(second), Some(2));

        assert!(turn.disarm_timer());
        assert_eq!(turn.tick(second), None);
        assert_eq!(turn.remaining_seconds(), 3);
        assert!(!turn.disarm_timer());
    }

    #[test]
    fn test_removal_before_drawer_keeps_same_drawer() {
        let mut turn = TurnState::default();
        turn.advance(3);
        turn.advance(3);
        assert_eq!(turn.drawer_index(), 2);

        assert!(!turn.on_participant_removed(0, "a", 2));
        assert_eq!(turn.drawer_index(), 1);
    }

    #[test]
    fn test_removal_of_last_drawer_clamps_to_zero() {
        let mut turn = TurnState::default();
        turn.advance(3);
        turn.advance(3);

        assert!(turn.on_participant_removed(2, "c", 2));
        assert_eq!(turn.drawer_index(), 0);
    }

    #[test]
    fn test_everyone_guessed_threshold() {
        let mut turn = TurnState::default();
        assert!(!turn.everyone_guessed(3));

        turn.set_word("cat".to_string());
        assert!(turn.record_correct_guess("b"));
        assert!(!turn.record_correct_guess("b"));
        assert!(!turn.everyone_guessed(3));
        assert!(turn.everyone_guessed(2));

        turn.record_correct_guess("c");
        assert!(turn.everyone_guessed(3));
    }
}
