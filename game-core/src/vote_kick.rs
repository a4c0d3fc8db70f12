use std::collections::{BTreeMap, BTreeSet};

/// Votes collected against one participant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteRecord {
    voters: BTreeSet<String>,
    required: usize,
}

impl VoteRecord {
    pub fn votes(&self) -> usize {
        self.voters.len()
    }

    pub fn required(&self) -> usize {
        self.required
    }

    pub fn has_voted(&self, voter: &str) -> bool {
        self.voters.contains(voter)
    }

    fn reached(&self) -> bool {
        self.required > 0 && self.voters.len() >= self.required
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The voter had already voted against this target; nothing changed.
    Duplicate { votes: usize },
    Recorded { votes: usize, quorum_reached: bool },
}

/// Quorum for a roster of `roster_len`: everyone except the target.
pub fn quorum_for(roster_len: usize) -> usize {
    roster_len.saturating_sub(1)
}

/// Pending kick votes in one room, keyed by target display name.
#[derive(Debug, Clone, Default)]
pub struct VoteBook {
    records: BTreeMap<String, VoteRecord>,
}

impl VoteBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, target: &str) -> Option<&VoteRecord> {
        self.records.get(target)
    }

    pub fn votes_against(&self, target: &str) -> usize {
        self.records.get(target).map(VoteRecord::votes).unwrap_or(0)
    }

    pub fn cast(&mut self, target: &str, voter: &str, roster_len: usize) -> VoteOutcome {
        let record = self
            .records
            .entry(target.to_string())
            .or_insert_with(|| VoteRecord {
                voters: BTreeSet::new(),
                required: quorum_for(roster_len),
            });

        if !record.voters.insert(voter.to_string()) {
            return VoteOutcome::Duplicate {
                votes: record.votes(),
            };
        }

        VoteOutcome::Recorded {
            votes: record.votes(),
            quorum_reached: record.reached(),
        }
    }

    pub fn remove_target(&mut self, target: &str) -> Option<VoteRecord> {
        self.records.remove(target)
    }

    /// Withdraws every vote `voter` cast. Returns the affected targets with their new
    /// counts; records left with no votes are dropped.
    pub fn retract_voter(&mut self, voter: &str) -> Vec<(String, usize)> {
        let mut changed = Vec::new();
        for (target, record) in self.records.iter_mut() {
            if record.voters.remove(voter) {
                changed.push((target.clone(), record.votes()));
            }
        }
        self.records.retain(|_, record| record.votes() > 0);
        changed
    }

    pub fn recompute_quorum(&mut self, roster_len: usize) {
        let required = quorum_for(roster_len);
        for record in self.records.values_mut() {
            record.required = required;
        }
    }

    pub fn first_at_quorum(&self) -> Option<String> {
        self.records
            .iter()
            .find(|(_, record)| record.reached())
            .map(|(target, _)| target.clone())
    }

    /// Clears every pending record, returning the targets that had one.
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.records).into_keys().collect()
    }

    pub fn rename(&mut self, old_name: &str, new_name: &str) {
        if let Some(record) = self.records.remove(old_name) {
            self.records.insert(new_name.to_string(), record);
        }
        for record in self.records.values_mut() {
            if record.voters.remove(old_name) {
                record.voters.insert(new_name.to_string());
            }
        }
    }
}
