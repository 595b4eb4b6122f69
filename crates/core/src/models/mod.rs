//! Shared domain models.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of cells on a card, header excluded.
pub const CARD_CELLS: usize = 25;
/// Number of columns (and rows) on a card.
pub const CARD_COLUMNS: usize = 5;
/// Index of the center cell that always holds [`FREE_MARKER`].
pub const FREE_INDEX: usize = 12;
/// Label used for the center cell.
pub const FREE_MARKER: &str = "FREE";
/// Minimum number of words a list needs before cards can be generated.
pub const MIN_WORDS: usize = CARD_CELLS;
/// Letters rendered above the five card columns.
pub const HEADER_LETTERS: [char; CARD_COLUMNS] = ['B', 'I', 'N', 'G', 'O'];

/// A named, ordered collection of words used to fill cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordList {
    /// Stable identifier assigned at creation.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Words in the order they were entered.
    pub words: Vec<String>,
}

impl WordList {
    /// Build a list with a fresh identifier.
    pub fn new(name: impl Into<String>, words: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            words,
        }
    }

    /// Whether the list holds enough words to fill a card.
    pub fn can_generate(&self) -> bool {
        self.words.len() >= MIN_WORDS
    }

    /// Words joined the same way they are typed in, used to pre-fill edits.
    pub fn joined_words(&self) -> String {
        self.words.join(", ")
    }
}

/// One generated 5×5 card. Cell [`FREE_INDEX`] is always [`FREE_MARKER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BingoCard {
    cells: Vec<String>,
}

impl BingoCard {
    /// Build a card from 24 drawn words, inserting the free space in the middle.
    ///
    /// Returns `None` unless exactly `CARD_CELLS - 1` words are supplied.
    pub fn from_drawn(mut words: Vec<String>) -> Option<Self> {
        if words.len() != CARD_CELLS - 1 {
            return None;
        }
        words.insert(FREE_INDEX, FREE_MARKER.to_string());
        Some(Self { cells: words })
    }

    /// All 25 cells in row-major order.
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Cells grouped by row.
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.cells.chunks(CARD_COLUMNS)
    }

    /// The drawn words, free space excluded.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != FREE_INDEX)
            .map(|(_, cell)| cell.as_str())
    }
}

/// Print density: how many cards share one printed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CardsPerPage {
    /// Full-width single card.
    #[default]
    One,
    /// Two cards side by side.
    Two,
    /// 2×2 grid at reduced scale.
    Four,
}

impl CardsPerPage {
    /// Numeric value of the setting.
    pub fn count(self) -> usize {
        match self {
            CardsPerPage::One => 1,
            CardsPerPage::Two => 2,
            CardsPerPage::Four => 4,
        }
    }

    /// Next setting in the 1 → 2 → 4 → 1 cycle.
    pub fn next(self) -> Self {
        match self {
            CardsPerPage::One => CardsPerPage::Two,
            CardsPerPage::Two => CardsPerPage::Four,
            CardsPerPage::Four => CardsPerPage::One,
        }
    }
}

impl TryFrom<u8> for CardsPerPage {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CardsPerPage::One),
            2 => Ok(CardsPerPage::Two),
            4 => Ok(CardsPerPage::Four),
            other => Err(format!("cards per page must be 1, 2 or 4 (got {other})")),
        }
    }
}

impl From<CardsPerPage> for u8 {
    fn from(value: CardsPerPage) -> Self {
        value.count() as u8
    }
}

impl fmt::Display for CardsPerPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.count())
    }
}
