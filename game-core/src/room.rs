use game_types::{ConnectionId, GameError, Leaderboard, ServerMessage};
use tracing::{debug, info};

use crate::relay::CanvasSync;
use crate::{
    Outbox, RoomCode, Roster, ScoreTable, TurnPhase, TurnState, VoteBook, VoteOutcome,
    guess_matches,
};

/// Limits applied to every room a registry creates.
#[derive(Debug, Clone)]
pub struct RoomSettings {
    pub round_seconds: u32,
    pub max_players: usize,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            round_seconds: crate::DEFAULT_ROUND_SECONDS,
            max_players: 16,
        }
    }
}

/// One game session. Owns its roster, scores, turn, votes and canvas sync; every
/// mutation writes the resulting messages into an [`Outbox`].
#[derive(Debug)]
pub struct Room {
    code: RoomCode,
    roster: Roster,
    scores: ScoreTable,
    turn: TurnState,
    votes: VoteBook,
    canvas: CanvasSync,
    max_players: usize,
}

impl Room {
    pub fn new(code: RoomCode, settings: &RoomSettings) -> Self {
        Self {
            code,
            roster: Roster::new(),
            scores: ScoreTable::new(),
            turn: TurnState::new(settings.round_seconds),
            votes: VoteBook::new(),
            canvas: CanvasSync::new(),
            max_players: settings.max_players,
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn player_count(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.roster.len() >= self.max_players
    }

    pub fn names(&self) -> Vec<String> {
        self.roster.names()
    }

    pub fn leaderboard(&self) -> Leaderboard {
        self.scores.leaderboard()
    }

    pub fn score_of(&self, name: &str) -> Option<u32> {
        self.scores.get(name)
    }

    pub fn total_score(&self) -> u32 {
        self.scores.total()
    }

    pub fn phase(&self) -> TurnPhase {
        self.turn.phase(self.roster.len())
    }

    pub fn current_drawer(&self) -> Option<&str> {
        if self.roster.len() < 2 {
            return None;
        }
        self.roster
            .get(self.turn.drawer_index())
            .map(|p| p.name.as_str())
    }

    pub fn secret_word(&self) -> Option<&str> {
        self.turn.secret_word()
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.turn.remaining_seconds()
    }

    pub fn is_timer_running(&self) -> bool {
        self.turn.is_timer_running()
    }

    pub fn timer_epoch(&self) -> u64 {
        self.turn.timer_epoch()
    }

    pub fn votes_against(&self, name: &str) -> usize {
        self.votes.votes_against(name)
    }

    pub fn has_vote_record(&self, name: &str) -> bool {
        self.votes.record(name).is_some()
    }

    pub fn vote_quorum(&self, name: &str) -> Option<usize> {
        self.votes.record(name).map(|r| r.required())
    }

    pub fn name_of(&self, connection_id: ConnectionId) -> Option<&str> {
        self.roster.name_of(connection_id)
    }

    pub(crate) fn canvas_mut(&mut self) -> (&Roster, &mut CanvasSync) {
        (&self.roster, &mut self.canvas)
    }

    fn broadcast(&self, out: &mut Outbox, message: ServerMessage) {
        out.deliver(self.roster.connections(), message);
    }

    fn broadcast_leaderboard(&self, out: &mut Outbox) {
        self.broadcast(out, ServerMessage::UpdateLeaderboard(self.leaderboard()));
    }

    fn prompt_drawer(&self, out: &mut Outbox) {
        if let Some(drawer) = self.current_drawer() {
            info!("Room {}: prompting {} to draw", self.code, drawer);
            self.broadcast(out, ServerMessage::PromptWordEntry(drawer.to_string()));
        }
    }

    fn stop_timer(&mut self, out: &mut Outbox) {
        if self.turn.disarm_timer() {
            out.stop_timer(&self.code);
            self.broadcast(out, ServerMessage::TimerUpdate(self.turn.round_seconds()));
        }
    }

    /// Closes the current round and prompts whoever is next.
    fn finish_round(&mut self, out: &mut Outbox) {
        self.turn.advance(self.roster.len());
        self.stop_timer(out);
        self.prompt_drawer(out);
    }

    /// Adds `connection_id` under `nickname` plus its uniquifier. Returns the assigned name.
    pub(crate) fn admit(&mut self, connection_id: ConnectionId, nickname: &str, out: &mut Outbox) -> String {
        if let Some(existing) = self.roster.name_of(connection_id) {
            let existing = existing.to_string();
            debug!("Room {}: {} joined again", self.code, existing);
            out.send(connection_id, ServerMessage::AssignPlayerName(existing.clone()));
            out.send(connection_id, ServerMessage::PlayersInRoom(self.names()));
            return existing;
        }

        let name = connection_id.display_name(nickname);
        let phase_before = self.phase();
        self.roster.add(connection_id, name.clone());
        self.scores.add_player(&name);
        self.votes.recompute_quorum(self.roster.len());
        info!(
            "Room {}: {} joined ({} players)",
            self.code,
            name,
            self.roster.len()
        );

        out.send(connection_id, ServerMessage::AssignPlayerName(name.clone()));
        out.deliver(
            self.roster.connections_except(connection_id),
            ServerMessage::NewPlayer(name.clone()),
        );
        out.send(connection_id, ServerMessage::PlayersInRoom(self.names()));
        self.broadcast_leaderboard(out);

        match phase_before {
            TurnPhase::WaitingForPlayers => {
                if self.roster.len() >= 2 {
                    self.prompt_drawer(out);
                }
            }
            TurnPhase::AwaitingWord | TurnPhase::Drawing => {
                if let Some(drawer) = self.current_drawer() {
                    out.send(connection_id, ServerMessage::PromptWordEntry(drawer.to_string()));
                    if let Some(word) = self.turn.secret_word() {
                        out.send(
                            connection_id,
                            ServerMessage::WordSubmitted {
                                player_name: drawer.to_string(),
                                word_length: word.chars().count(),
                            },
                        );
                        out.send(
                            connection_id,
                            ServerMessage::TimerUpdate(self.turn.remaining_seconds()),
                        );
                    }
                }
            }
        }

        name
    }

    /// Removes the connection's participant and unwinds everything it touched.
    /// Returns connections that were kicked as a consequence of retracted votes.
    pub(crate) fn depart(&mut self, connection_id: ConnectionId, out: &mut Outbox) -> Vec<ConnectionId> {
        let Some((index, participant)) = self.roster.remove_connection(connection_id) else {
            return Vec::new();
        };
        let name = participant.name;
        info!(
            "Room {}: {} left ({} players)",
            self.code,
            name,
            self.roster.len()
        );

        self.scores.remove_player(&name);
        self.canvas.forget(connection_id);

        if self.votes.remove_target(&name).is_some() {
            self.broadcast(
                out,
                ServerMessage::VoteProgress {
                    player: name.clone(),
                    votes: 0,
                },
            );
        }
        for (target, votes) in self.votes.retract_voter(&name) {
            self.broadcast(out, ServerMessage::VoteProgress { player: target, votes });
        }

        self.broadcast(
            out,
            ServerMessage::PlayerLeft {
                player_name: name.clone(),
                players: self.names(),
            },
        );
        self.broadcast_leaderboard(out);

        self.reconcile_turn(index, &name, out);
        self.reconcile_votes(out)
    }

    /// Repairs the turn after the participant at `removed_index` is gone.
    fn reconcile_turn(&mut self, removed_index: usize, removed_name: &str, out: &mut Outbox) {
        let roster_len = self.roster.len();
        let was_drawer = self
            .turn
            .on_participant_removed(removed_index, removed_name, roster_len);

        if roster_len < 2 {
            self.turn.clear_round();
            self.stop_timer(out);
            return;
        }

        if was_drawer {
            info!("Room {}: drawer {} is gone, round void", self.code, removed_name);
            self.turn.clear_round();
            self.stop_timer(out);
            self.prompt_drawer(out);
        } else if self.turn.everyone_guessed(roster_len) {
            info!("Room {}: everyone remaining has guessed", self.code);
            self.finish_round(out);
        }
    }

    /// Quorum follows the roster; a smaller room may now satisfy a pending vote.
    fn reconcile_votes(&mut self, out: &mut Outbox) -> Vec<ConnectionId> {
        let mut kicked = Vec::new();
        loop {
            if self.roster.len() < 2 {
                for target in self.votes.drain() {
                    self.broadcast(out, ServerMessage::VoteProgress { player: target, votes: 0 });
                }
                break;
            }
            self.votes.recompute_quorum(self.roster.len());
            let Some(target) = self.votes.first_at_quorum() else {
                break;
            };
            match self.kick_player(&target, out) {
                Some(connection_id) => kicked.push(connection_id),
                None => {
                    self.votes.remove_target(&target);
                }
            }
        }
        kicked
    }

    /// Renames the requester's own entry. Nothing changes on error.
    pub(crate) fn rename(
        &mut self,
        connection_id: ConnectionId,
        old_name: &str,
        new_nickname: &str,
        out: &mut Outbox,
    ) -> Result<String, GameError> {
        let current = self
            .roster
            .name_of(connection_id)
            .ok_or(GameError::NotInRoom)?
            .to_string();
        if current != old_name {
            return Err(GameError::PlayerNotFound {
                name: old_name.to_string(),
            });
        }

        let new_name = connection_id.display_name(new_nickname);
        self.roster.rename(&current, &new_name)?;
        self.scores.rename(&current, &new_name);
        self.turn.rename_guesser(&current, &new_name);
        self.votes.rename(&current, &new_name);
        info!("Room {}: {} is now {}", self.code, current, new_name);

        self.broadcast(
            out,
            ServerMessage::PlayerNameChanged {
                old_name: current,
                new_name: new_name.clone(),
            },
        );
        Ok(new_name)
    }

    /// Accepted only from the prompted drawer before a word is set.
    pub(crate) fn submit_word(&mut self, connection_id: ConnectionId, word: String, out: &mut Outbox) {
        let Some(player_name) = self.roster.name_of(connection_id).map(str::to_string) else {
            return;
        };
        if self.phase() != TurnPhase::AwaitingWord {
            debug!(
                "Room {}: ignoring word from {} in phase {:?}",
                self.code,
                player_name,
                self.phase()
            );
            return;
        }
        if self.current_drawer() != Some(player_name.as_str()) {
            debug!("Room {}: {} is not the drawer", self.code, player_name);
            return;
        }

        let word_length = word.chars().count();
        self.turn.set_word(word.clone());
        info!(
            "Room {}: {} submitted a {} letter word",
            self.code, player_name, word_length
        );

        self.broadcast(
            out,
            ServerMessage::WordSubmitted {
                player_name,
                word_length,
            },
        );
        out.send(connection_id, ServerMessage::DrawingWord(word));

        let epoch = self.turn.arm_timer();
        out.start_timer(&self.code, epoch);
        self.broadcast(out, ServerMessage::TimerUpdate(self.turn.remaining_seconds()));
    }

    pub(crate) fn guess_word(&mut self, connection_id: ConnectionId, guess: &str, out: &mut Outbox) {
        let Some(player_name) = self.roster.name_of(connection_id).map(str::to_string) else {
            return;
        };
        let Some(word) = self.turn.secret_word() else {
            out.send(connection_id, ServerMessage::WrongGuess);
            return;
        };
        let drawer = self.current_drawer().map(str::to_string);
        if drawer.as_deref() == Some(player_name.as_str()) {
            debug!("Room {}: drawer {} tried to guess", self.code, player_name);
            return;
        }
        if self.turn.has_guessed(&player_name) {
            debug!("Room {}: {} already guessed this round", self.code, player_name);
            return;
        }
        if !guess_matches(guess, word) {
            out.send(connection_id, ServerMessage::WrongGuess);
            return;
        }

        self.scores.award(&player_name, 1);
        self.turn.record_correct_guess(&player_name);
        info!("Room {}: {} guessed the word", self.code, player_name);

        let roster_len = self.roster.len();
        let round_over = self.turn.everyone_guessed(roster_len);
        let next_player = if round_over {
            self.roster
                .get((self.turn.drawer_index() + 1) % roster_len)
                .map(|p| p.name.clone())
        } else {
            drawer
        }
        .unwrap_or_default();

        self.broadcast(
            out,
            ServerMessage::CorrectGuess {
                player_name,
                next_player,
            },
        );
        self.broadcast_leaderboard(out);

        if round_over {
            self.finish_round(out);
        }
    }

    /// Returns the kicked connection, if the vote removed someone.
    pub(crate) fn cast_kick_vote(
        &mut self,
        connection_id: ConnectionId,
        target: &str,
        out: &mut Outbox,
    ) -> Option<ConnectionId> {
        let voter = self.roster.name_of(connection_id)?.to_string();
        if voter == target || !self.roster.contains(target) {
            debug!("Room {}: ignoring kick vote by {} against {}", self.code, voter, target);
            return None;
        }

        let roster_len = self.roster.len();
        if roster_len == 2 {
            self.broadcast(
                out,
                ServerMessage::VoteInitiated {
                    player: target.to_string(),
                    voter,
                },
            );
            return self.kick_player(target, out);
        }

        match self.votes.cast(target, &voter, roster_len) {
            VoteOutcome::Duplicate { votes } => {
                self.broadcast(
                    out,
                    ServerMessage::VoteProgress {
                        player: target.to_string(),
                        votes,
                    },
                );
                None
            }
            VoteOutcome::Recorded {
                votes,
                quorum_reached,
            } => {
                info!(
                    "Room {}: {} voted to kick {} ({}/{})",
                    self.code,
                    voter,
                    target,
                    votes,
                    crate::quorum_for(roster_len)
                );
                self.broadcast(
                    out,
                    ServerMessage::VoteInitiated {
                        player: target.to_string(),
                        voter,
                    },
                );
                self.broadcast(
                    out,
                    ServerMessage::VoteProgress {
                        player: target.to_string(),
                        votes,
                    },
                );
                if quorum_reached {
                    self.kick_player(target, out)
                } else {
                    None
                }
            }
        }
    }

    /// Removes `target` and resets every pending vote in the room.
    pub(crate) fn kick_player(&mut self, target: &str, out: &mut Outbox) -> Option<ConnectionId> {
        let connection_id = self.roster.connection_of(target)?;

        // The kicked connection hears this before it is dropped from the roster.
        self.broadcast(
            out,
            ServerMessage::PlayerKicked {
                player: target.to_string(),
            },
        );

        let (index, _) = self.roster.remove_name(target)?;
        info!("Room {}: {} was kicked", self.code, target);
        self.scores.remove_player(target);
        self.canvas.forget(connection_id);
        self.votes.remove_target(target);
        for other in self.votes.drain() {
            self.broadcast(out, ServerMessage::VoteProgress { player: other, votes: 0 });
        }

        self.broadcast(out, ServerMessage::PlayersInRoom(self.names()));
        self.broadcast_leaderboard(out);
        self.reconcile_turn(index, target, out);

        Some(connection_id)
    }

    /// Advances the countdown by one second. `None` for a stale epoch, otherwise
    /// whether time ran out.
    pub(crate) fn tick(&mut self, epoch: u64, out: &mut Outbox) -> Option<bool> {
        let remaining = self.turn.tick(epoch)?;
        self.broadcast(out, ServerMessage::TimerUpdate(remaining));
        if remaining > 0 {
            return Some(false);
        }

        let current_player = self.current_drawer().unwrap_or_default().to_string();
        let drawing_word = self.turn.secret_word().unwrap_or_default().to_string();
        info!(
            "Room {}: time is up for {}, the word was {}",
            self.code, current_player, drawing_word
        );
        // the ticker exits on its own, so no stop event for it
        self.turn.disarm_timer();
        self.broadcast(
            out,
            ServerMessage::TimeUp {
                current_player,
                drawing_word,
            },
        );
        self.turn.advance(self.roster.len());
        self.broadcast(out, ServerMessage::TimerUpdate(self.turn.round_seconds()));
        self.prompt_drawer(out);
        Some(true)
    }
}
