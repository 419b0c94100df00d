// Local mirror of the server's battle state.
//
// Every mutator here is provisional: it exists for immediate UI feedback between server round
// trips and is overwritten by the next `set_battle_state`.

use crate::domain::{BattleState, Card, CardInDeck, Character, Player, Team};
use serde::Serialize;
use tracing::debug;

/// Derived, read-only view of the mirror for diagnostics and UI counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameStateSummary {
    pub battle_id: Option<String>,
    pub current_player: Team,
    pub teams: Vec<TeamSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSummary {
    pub team: Team,
    pub hand_count: usize,
    pub deck_count: usize,
    pub discard_count: usize,
    pub character_count: usize,
    pub alive_count: usize,
    pub energy: i32,
    pub max_energy: i32,
    pub has_lost: bool,
}

#[derive(Debug, Default)]
pub struct PlayerStateManager {
    battle: Option<BattleState>,
}

impl PlayerStateManager {
    pub fn new() -> Self {
        Self { battle: None }
    }

    /// Replaces the whole mirror with a freshly fetched snapshot.
    ///
    /// This is the reconciliation point for any drift caused by local mutation. `None` leaves
    /// the current mirror untouched.
    pub fn set_battle_state(&mut self, state: Option<BattleState>) {
        let Some(state) = state else {
            debug!("no battle state supplied; keeping current mirror");
            return;
        };
        debug!(battle_id = %state.id, players = state.players.len(), "battle state replaced");
        self.battle = Some(state);
    }

    pub fn battle_state(&self) -> Option<&BattleState> {
        self.battle.as_ref()
    }

    pub fn battle_id(&self) -> Option<&str> {
        self.battle.as_ref().map(|battle| battle.id.as_str())
    }

    fn player(&self, team: Team) -> Option<&Player> {
        self.battle.as_ref().and_then(|battle| battle.player(team))
    }

    fn player_mut(&mut self, team: Team) -> Option<&mut Player> {
        let player = self.battle.as_mut().and_then(|battle| battle.player_mut(team));
        if player.is_none() {
            debug!(%team, "no mirrored player for team");
        }
        player
    }

    pub fn player_characters(&self, team: Team) -> &[Character] {
        self.player(team)
            .map(|player| player.characters.as_slice())
            .unwrap_or(&[])
    }

    pub fn hand_cards(&self, team: Team) -> &[CardInDeck] {
        self.player(team)
            .map(|player| player.deck.hand.as_slice())
            .unwrap_or(&[])
    }

    pub fn deck_cards(&self, team: Team) -> &[CardInDeck] {
        self.player(team)
            .map(|player| player.deck.deck.as_slice())
            .unwrap_or(&[])
    }

    pub fn discarded_cards(&self, team: Team) -> &[CardInDeck] {
        self.player(team)
            .map(|player| player.deck.discard.as_slice())
            .unwrap_or(&[])
    }

    /// Team whose turn it is; team one when the snapshot does not say.
    pub fn current_player(&self) -> Team {
        self.battle
            .as_ref()
            .and_then(|battle| battle.current_player)
            .unwrap_or(Team::One)
    }

    pub fn set_current_player(&mut self, team: Team) {
        if let Some(battle) = self.battle.as_mut() {
            battle.current_player = Some(team);
        }
    }

    pub fn add_card_to_hand(&mut self, team: Team, card: CardInDeck) {
        if let Some(player) = self.player_mut(team) {
            player.deck.hand.push(card);
        }
    }

    /// Removes a card from hand by instance id. `None` means it was not in hand.
    pub fn remove_card_from_hand(&mut self, team: Team, card_id: &str) -> Option<CardInDeck> {
        let hand = &mut self.player_mut(team)?.deck.hand;
        let index = hand.iter().position(|card| card.card_id == card_id)?;
        Some(hand.remove(index))
    }

    pub fn add_card_to_discard(&mut self, team: Team, card: CardInDeck) {
        if let Some(player) = self.player_mut(team) {
            player.deck.discard.push(card);
        }
    }

    /// Moves up to `count` cards from the front of the deck to the end of the hand and returns
    /// them in draw order. A short deck draws what it has.
    pub fn draw_cards_from_deck(&mut self, team: Team, count: usize) -> Vec<CardInDeck> {
        let Some(player) = self.player_mut(team) else {
            return Vec::new();
        };
        let take = count.min(player.deck.deck.len());
        let drawn: Vec<CardInDeck> = player.deck.deck.drain(..take).collect();
        player.deck.hand.extend(drawn.iter().cloned());
        debug!(%team, requested = count, drawn = drawn.len(), "cards drawn locally");
        drawn
    }

    /// Sets a character's HP, clamped into `[0, max_hp]`.
    pub fn update_character_hp(&mut self, team: Team, character_id: &str, new_hp: i32) {
        let Some(player) = self.player_mut(team) else {
            return;
        };
        if let Some(character) = player
            .characters
            .iter_mut()
            .find(|character| character.character_id == character_id)
        {
            character.current_hp = new_hp.clamp(0, character.max_hp.max(0));
        }
    }

    /// True when every character of the team is down. A team with no characters counts as
    /// having lost, and so does a team missing from the snapshot. Callers that need "battle
    /// over" must also check that a snapshot is loaded.
    pub fn has_player_lost(&self, team: Team) -> bool {
        self.player_characters(team)
            .iter()
            .all(|character| character.current_hp <= 0)
    }

    pub fn player_energy(&self, team: Team) -> i32 {
        self.player(team)
            .map(|player| player.current_energy)
            .unwrap_or(0)
    }

    pub fn player_max_energy(&self, team: Team) -> i32 {
        self.player(team).map(|player| player.max_energy).unwrap_or(0)
    }

    /// Sets a player's energy, clamped into `[0, max_energy]`.
    pub fn update_player_energy(&mut self, team: Team, new_energy: i32) {
        if let Some(player) = self.player_mut(team) {
            player.current_energy = new_energy.clamp(0, player.max_energy.max(0));
        }
    }

    pub fn can_play_card(&self, team: Team, card: &Card) -> bool {
        self.player_energy(team) >= card.energy_cost
    }

    pub fn game_state_summary(&self) -> GameStateSummary {
        let teams = [Team::One, Team::Two]
            .into_iter()
            .map(|team| {
                let characters = self.player_characters(team);
                TeamSummary {
                    team,
                    hand_count: self.hand_cards(team).len(),
                    deck_count: self.deck_cards(team).len(),
                    discard_count: self.discarded_cards(team).len(),
                    character_count: characters.len(),
                    alive_count: characters.iter().filter(|c| c.is_alive()).count(),
                    energy: self.player_energy(team),
                    max_energy: self.player_max_energy(team),
                    has_lost: self.has_player_lost(team),
                }
            })
            .collect();

        GameStateSummary {
            battle_id: self.battle_id().map(str::to_string),
            current_player: self.current_player(),
            teams,
        }
    }
}
