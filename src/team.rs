use enum_map::Enum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};


// Teams of the word-guessing game. On the wire a team is a number: 1 is blue and any other value
// is red (the server also uses 0 for red when announcing a winner).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, Enum, EnumIter, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    pub fn display_name(self) -> &'static str {
        match self {
            Team::Red => "Red Team",
            Team::Blue => "Blue Team",
        }
    }

    pub fn text_class(self) -> &'static str {
        match self {
            Team::Red => "text-danger",
            Team::Blue => "text-primary",
        }
    }
}

impl From<u8> for Team {
    fn from(value: u8) -> Self { if value == 1 { Team::Blue } else { Team::Red } }
}

impl From<Team> for u8 {
    fn from(team: Team) -> Self {
        match team {
            Team::Red => 2,
            Team::Blue => 1,
        }
    }
}


// Hidden owner of a word tile. Wire values: 0 neutral, 1 blue, 2 red, 3 assassin.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum TileOwner {
    Neutral,
    Team(Team),
    Assassin,
}

impl TileOwner {
    // Bootstrap button category used once the owner is visible.
    pub fn revealed_class(self) -> &'static str {
        match self {
            TileOwner::Assassin => "btn-dark",
            TileOwner::Team(Team::Red) => "btn-danger",
            TileOwner::Team(Team::Blue) => "btn-primary",
            TileOwner::Neutral => "btn-secondary",
        }
    }
}

impl From<u8> for TileOwner {
    fn from(value: u8) -> Self {
        match value {
            1 => TileOwner::Team(Team::Blue),
            2 => TileOwner::Team(Team::Red),
            3 => TileOwner::Assassin,
            _ => TileOwner::Neutral,
        }
    }
}

impl From<TileOwner> for u8 {
    fn from(owner: TileOwner) -> Self {
        match owner {
            TileOwner::Neutral => 0,
            TileOwner::Team(team) => team.into(),
            TileOwner::Assassin => 3,
        }
    }
}
