// Client-side mirror of the server's battle snapshot.
// The serialization within this layer is a dependency leak, but it keeps the wire and the
// mirror in one shape.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two sides of a battle. Team one is the local player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Team {
    One,
    Two,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::One => Team::Two,
            Team::Two => Team::One,
        }
    }
}

impl From<Team> for u8 {
    fn from(team: Team) -> Self {
        match team {
            Team::One => 1,
            Team::Two => 2,
        }
    }
}

impl TryFrom<u8> for Team {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Team::One),
            2 => Ok(Team::Two),
            other => Err(format!("invalid team {other}, expected 1 or 2")),
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

// Card definition shared by every instance of the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub energy_cost: i32,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

// A concrete card instance inside a player's hand, deck or discard pile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardInDeck {
    pub card_id: String,
    pub card: Card,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerDeck {
    #[serde(default)]
    pub hand: Vec<CardInDeck>,
    #[serde(default)]
    pub deck: Vec<CardInDeck>,
    #[serde(default)]
    pub discard: Vec<CardInDeck>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub character_id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub current_hp: i32,
    pub max_hp: i32,
}

impl Character {
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub team: Team,
    // Lineup order, which is also display order.
    #[serde(default)]
    pub characters: Vec<Character>,
    #[serde(default)]
    pub deck: PlayerDeck,
    pub current_energy: i32,
    pub max_energy: i32,
}

/// Full battle snapshot as returned by the battle API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleState {
    pub id: String,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub current_player: Option<Team>,
    #[serde(default)]
    pub turn: Option<u32>,
}

impl BattleState {
    pub fn player(&self, team: Team) -> Option<&Player> {
        self.players.iter().find(|player| player.team == team)
    }

    pub fn player_mut(&mut self, team: Team) -> Option<&mut Player> {
        self.players.iter_mut().find(|player| player.team == team)
    }
}
