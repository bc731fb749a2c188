use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};


// Cell of the tile board. Travels over the wire as `[row, col]`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct BoardPosition {
    pub row: usize,
    pub col: usize,
}

impl BoardPosition {
    pub const fn new(row: usize, col: usize) -> Self { Self { row, col } }

    // DOM id of the board cell button.
    pub fn cell_id(self) -> String { format!("space-{}-{}", self.row, self.col) }

    pub fn from_cell_id(id: &str) -> Option<Self> {
        let (row, col) = id.strip_prefix("space-")?.split_once('-')?;
        Some(Self::new(row.parse().ok()?, col.parse().ok()?))
    }
}

impl From<(usize, usize)> for BoardPosition {
    fn from((row, col): (usize, usize)) -> Self { Self { row, col } }
}

impl From<BoardPosition> for (usize, usize) {
    fn from(pos: BoardPosition) -> Self { (pos.row, pos.col) }
}

impl fmt::Display for BoardPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}


#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ShiftDirection {
    Up,
    Down,
    Left,
    Right,
}

impl ShiftDirection {
    pub fn button_id(self) -> String { format!("shift-{self}-button") }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_id_round_trip() {
        let pos = BoardPosition::new(12, 3);
        assert_eq!(pos.cell_id(), "space-12-3");
        assert_eq!(BoardPosition::from_cell_id("space-12-3"), Some(pos));
        assert_eq!(BoardPosition::from_cell_id("tile-3"), None);
        assert_eq!(BoardPosition::from_cell_id("space-1-x"), None);
    }

    #[test]
    fn position_is_a_json_pair() {
        let pos = BoardPosition::new(4, 7);
        assert_eq!(serde_json::to_string(&pos).unwrap(), "[4,7]");
        assert_eq!(serde_json::from_str::<BoardPosition>("[4,7]").unwrap(), pos);
    }

    #[test]
    fn shift_direction_names() {
        assert_eq!(ShiftDirection::Left.to_string(), "left");
        assert_eq!("down".parse::<ShiftDirection>().unwrap(), ShiftDirection::Down);
        assert_eq!(ShiftDirection::Up.button_id(), "shift-up-button");
        assert_eq!(serde_json::to_string(&ShiftDirection::Right).unwrap(), "\"right\"");
    }
}
