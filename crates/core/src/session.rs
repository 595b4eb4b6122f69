//! Application state shared by every front end.

use rand::Rng;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    generator::{self, MAX_CARD_COUNT},
    models::{BingoCard, CardsPerPage, WordList},
    store::ListStore,
};

/// Single owner of the word lists and the current batch of generated cards.
#[derive(Debug, Clone)]
pub struct BingoSession {
    store: ListStore,
    selected_list: Option<Uuid>,
    card_count: usize,
    cards: Vec<BingoCard>,
    cards_per_page: CardsPerPage,
}

impl Default for BingoSession {
    fn default() -> Self {
        Self::new(ListStore::new())
    }
}

impl BingoSession {
    /// Session over an existing store with default settings.
    pub fn new(store: ListStore) -> Self {
        Self {
            store,
            selected_list: None,
            card_count: 1,
            cards: Vec::new(),
            cards_per_page: CardsPerPage::default(),
        }
    }

    /// Session initialised from configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        let store = if config.seed_sample_lists {
            ListStore::with_samples()
        } else {
            ListStore::new()
        };
        let mut session = Self::new(store);
        session.set_card_count(config.default_card_count);
        session.cards_per_page = config.cards_per_page;
        session
    }

    /// Word list storage.
    pub fn store(&self) -> &ListStore {
        &self.store
    }

    /// Mutable word list storage.
    pub fn store_mut(&mut self) -> &mut ListStore {
        &mut self.store
    }

    /// Requested number of cards per generation.
    pub fn card_count(&self) -> usize {
        self.card_count
    }

    /// Update the requested card count, clamped to `1..=MAX_CARD_COUNT`.
    pub fn set_card_count(&mut self, count: usize) {
        self.card_count = count.clamp(1, MAX_CARD_COUNT);
    }

    /// Current print density.
    pub fn cards_per_page(&self) -> CardsPerPage {
        self.cards_per_page
    }

    /// Change the print density.
    pub fn set_cards_per_page(&mut self, value: CardsPerPage) {
        self.cards_per_page = value;
    }

    /// Cards from the most recent generation.
    pub fn cards(&self) -> &[BingoCard] {
        &self.cards
    }

    /// List used for the most recent generation, if it still exists.
    pub fn selected_list(&self) -> Option<&WordList> {
        self.selected_list.and_then(|id| self.store.get(id))
    }

    /// Generate `card_count` cards from `list_id` using the thread RNG.
    pub fn generate(&mut self, list_id: Uuid) -> bool {
        self.generate_with(list_id, self.card_count, &mut rand::thread_rng())
    }

    /// Replace the current batch with `count` fresh cards from `list_id`.
    ///
    /// Unknown lists, lists below the word minimum and zero counts leave the
    /// previous batch untouched and return `false`.
    pub fn generate_with<R: Rng + ?Sized>(
        &mut self,
        list_id: Uuid,
        count: usize,
        rng: &mut R,
    ) -> bool {
        let Some(list) = self.store.get(list_id) else {
            warn!(list_id = %list_id, "generation requested for unknown list");
            return false;
        };
        if !list.can_generate() {
            warn!(list_id = %list_id, words = list.words.len(), "list too short to generate cards");
            return false;
        }
        if count == 0 {
            warn!(list_id = %list_id, "generation requested with zero cards");
            return false;
        }

        self.cards = generator::generate_cards(list, count, rng);
        self.selected_list = Some(list_id);
        info!(list_id = %list_id, count = self.cards.len(), "Cards generated");
        true
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn failed_generation_keeps_previous_batch() {
        let mut session = BingoSession::new(ListStore::with_samples());
        let numbers = session.store().lists()[3].id;
        let mut rng = StdRng::seed_from_u64(3);
        assert!(session.generate_with(numbers, 2, &mut rng));

        let short = session
            .store_mut()
            .create("Short", "a, b, c")
            .expect("list created");
        assert!(!session.generate_with(short, 2, &mut rng));
        assert!(!session.generate_with(Uuid::new_v4(), 2, &mut rng));
        assert!(!session.generate_with(numbers, 0, &mut rng));

        assert_eq!(session.cards().len(), 2);
        assert_eq!(
            session.selected_list().map(|l| l.name.as_str()),
            Some("Numbers")
        );
    }

    #[test]
    fn card_count_is_clamped() {
        let mut session = BingoSession::default();
        session.set_card_count(0);
        assert_eq!(session.card_count(), 1);
        session.set_card_count(MAX_CARD_COUNT + 10);
        assert_eq!(session.card_count(), MAX_CARD_COUNT);
    }

    #[test]
    fn from_config_respects_settings() {
        let config = AppConfig {
            default_card_count: 6,
            cards_per_page: CardsPerPage::Four,
            seed_sample_lists: false,
            ..AppConfig::default()
        };
        let session = BingoSession::from_config(&config);
        assert!(session.store().is_empty());
        assert_eq!(session.card_count(), 6);
        assert_eq!(session.cards_per_page(), CardsPerPage::Four);
    }
}
