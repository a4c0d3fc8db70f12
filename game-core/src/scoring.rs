use game_types::Leaderboard;
use std::collections::HashMap;

/// Points per participant in a room. Entries exist exactly for current members.
#[derive(Debug, Clone, Default)]
pub struct ScoreTable {
    scores: HashMap<String, u32>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a newcomer at zero; an existing entry is left alone.
    pub fn add_player(&mut self, name: &str) {
        self.scores.entry(name.to_string()).or_insert(0);
    }

    pub fn remove_player(&mut self, name: &str) -> Option<u32> {
        self.scores.remove(name)
    }

    pub fn award(&mut self, name: &str, points: u32) -> u32 {
        let score = self.scores.entry(name.to_string()).or_insert(0);
        *score += points;
        *score
    }

    /// Moves the score to the new key, keeping its value.
    pub fn rename(&mut self, old_name: &str, new_name: &str) {
        if let Some(score) = self.scores.remove(old_name) {
            self.scores.insert(new_name.to_string(), score);
        }
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.scores.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn total(&self) -> u32 {
        self.scores.values().sum()
    }

    pub fn leaderboard(&self) -> Leaderboard {
        self.scores
            .iter()
            .map(|(name, score)| (name.clone(), *score))
            .collect()
    }
}
