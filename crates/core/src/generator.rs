//! Randomised card generation.

use rand::{seq::SliceRandom, Rng};
use thiserror::Error;

use crate::models::{BingoCard, WordList, CARD_CELLS};

/// Upper bound applied to requested card counts.
pub const MAX_CARD_COUNT: usize = 100;

/// Reasons a typed card count is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CountError {
    /// Nothing was entered.
    #[error("card count is empty")]
    Empty,
    /// Input contained something other than digits.
    #[error("'{0}' is not a whole number")]
    NotANumber(String),
    /// Zero cards requested.
    #[error("card count must be at least 1")]
    Zero,
}

/// Parse a user-entered card count, clamping large values to [`MAX_CARD_COUNT`].
pub fn parse_card_count(input: &str) -> Result<usize, CountError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CountError::Empty);
    }
    if !trimmed.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(CountError::NotANumber(trimmed.to_string()));
    }
    // All digits, so a parse failure can only mean overflow.
    let value = trimmed.parse::<usize>().unwrap_or(usize::MAX);
    if value == 0 {
        return Err(CountError::Zero);
    }
    Ok(value.min(MAX_CARD_COUNT))
}

/// Draw `count` cards from `list`.
///
/// Each card is an independent uniform shuffle of the list; the first 24 words
/// fill the card around the free space. Lists that are too short yield nothing.
pub fn generate_cards<R: Rng + ?Sized>(
    list: &WordList,
    count: usize,
    rng: &mut R,
) -> Vec<BingoCard> {
    if !list.can_generate() {
        return Vec::new();
    }

    let mut deck = list.words.clone();
    (0..count)
        .filter_map(|_| {
            deck.shuffle(rng);
            BingoCard::from_drawn(deck[..CARD_CELLS - 1].to_vec())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::models::{FREE_INDEX, FREE_MARKER};

    fn list_of(count: usize) -> WordList {
        WordList::new("Words", (1..=count).map(|n| format!("w{n}")).collect())
    }

    #[test]
    fn parse_card_count_accepts_and_clamps() {
        assert_eq!(parse_card_count(" 3 "), Ok(3));
        assert_eq!(parse_card_count("250"), Ok(MAX_CARD_COUNT));
        assert_eq!(
            parse_card_count("99999999999999999999999"),
            Ok(MAX_CARD_COUNT)
        );
    }

    #[test]
    fn parse_card_count_rejects_bad_input() {
        assert_eq!(parse_card_count(""), Err(CountError::Empty));
        assert_eq!(parse_card_count("0"), Err(CountError::Zero));
        assert_eq!(
            parse_card_count("-2"),
            Err(CountError::NotANumber("-2".to_string()))
        );
        assert!(matches!(
            parse_card_count("two"),
            Err(CountError::NotANumber(_))
        ));
    }

    #[test]
    fn cards_use_distinct_words_from_list() {
        let list = list_of(40);
        let source: HashSet<&str> = list.words.iter().map(String::as_str).collect();
        let mut rng = StdRng::seed_from_u64(7);

        let cards = generate_cards(&list, 5, &mut rng);
        assert_eq!(cards.len(), 5);
        for card in &cards {
            assert_eq!(card.cells().len(), CARD_CELLS);
            assert_eq!(card.cells()[FREE_INDEX], FREE_MARKER);
            let words: HashSet<&str> = card.words().collect();
            assert_eq!(words.len(), CARD_CELLS - 1);
            assert!(words.is_subset(&source));
        }
    }

    #[test]
    fn short_lists_and_zero_count_produce_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_cards(&list_of(24), 3, &mut rng).is_empty());
        assert!(generate_cards(&list_of(30), 0, &mut rng).is_empty());
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let list = list_of(25);
        let first = generate_cards(&list, 2, &mut StdRng::seed_from_u64(42));
        let second = generate_cards(&list, 2, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }
}
