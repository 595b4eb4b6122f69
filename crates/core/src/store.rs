//! In-memory word list storage.

use tracing::{debug, info};
use uuid::Uuid;

use crate::models::WordList;

const SAMPLE_FRUITS: [&str; 25] = [
    "Apple",
    "Banana",
    "Orange",
    "Mango",
    "Grape",
    "Pineapple",
    "Strawberry",
    "Blueberry",
    "Peach",
    "Pear",
    "Watermelon",
    "Kiwi",
    "Plum",
    "Cherry",
    "Lemon",
    "Lime",
    "Raspberry",
    "Blackberry",
    "Apricot",
    "Coconut",
    "Pomegranate",
    "Fig",
    "Guava",
    "Papaya",
    "Dragon Fruit",
];

const SAMPLE_STATES: [&str; 25] = [
    "Alabama",
    "Alaska",
    "Arizona",
    "Arkansas",
    "California",
    "Colorado",
    "Connecticut",
    "Delaware",
    "Florida",
    "Georgia",
    "Hawaii",
    "Idaho",
    "Illinois",
    "Indiana",
    "Iowa",
    "Kansas",
    "Kentucky",
    "Louisiana",
    "Maine",
    "Maryland",
    "Massachusetts",
    "Michigan",
    "Minnesota",
    "Mississippi",
    "Missouri",
];

const SAMPLE_JOBS: [&str; 25] = [
    "Teacher",
    "Doctor",
    "Engineer",
    "Chef",
    "Artist",
    "Lawyer",
    "Nurse",
    "Pilot",
    "Architect",
    "Programmer",
    "Dentist",
    "Electrician",
    "Plumber",
    "Mechanic",
    "Accountant",
    "Scientist",
    "Writer",
    "Designer",
    "Firefighter",
    "Police Officer",
    "Veterinarian",
    "Pharmacist",
    "Photographer",
    "Carpenter",
    "Psychologist",
];

/// Split comma-separated input into trimmed, non-empty words, keeping order.
pub fn parse_words(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// Ordered collection of word lists. Newly created lists go to the front.
#[derive(Debug, Clone, Default)]
pub struct ListStore {
    lists: Vec<WordList>,
}

impl ListStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the starter lists: Fruits, States, Jobs and Numbers.
    pub fn with_samples() -> Self {
        let owned = |words: &[&str]| words.iter().map(|w| w.to_string()).collect::<Vec<_>>();
        Self {
            lists: vec![
                WordList::new("Fruits", owned(&SAMPLE_FRUITS)),
                WordList::new("States", owned(&SAMPLE_STATES)),
                WordList::new("Jobs", owned(&SAMPLE_JOBS)),
                WordList::new("Numbers", (1..=25).map(|n| n.to_string()).collect()),
            ],
        }
    }

    /// Create a list from a name and comma-separated words.
    ///
    /// Blank names or blank word input are ignored and yield `None`.
    pub fn create(&mut self, name: &str, raw_words: &str) -> Option<Uuid> {
        let name = name.trim();
        if name.is_empty() || raw_words.trim().is_empty() {
            debug!("ignoring list creation with blank name or words");
            return None;
        }

        let list = WordList::new(name, parse_words(raw_words));
        let id = list.id;
        info!(list_id = %id, name, words = list.words.len(), "List created");
        self.lists.insert(0, list);
        Some(id)
    }

    /// Remove the list with the given id. Returns `false` when it does not exist.
    pub fn delete(&mut self, id: Uuid) -> bool {
        let before = self.lists.len();
        self.lists.retain(|list| list.id != id);
        let removed = self.lists.len() != before;
        if removed {
            info!(list_id = %id, "List deleted");
        } else {
            debug!(list_id = %id, "delete ignored for unknown list");
        }
        removed
    }

    /// Replace the words of an existing list. Returns `false` when it does not exist.
    pub fn edit(&mut self, id: Uuid, raw_words: &str) -> bool {
        match self.lists.iter_mut().find(|list| list.id == id) {
            Some(list) => {
                list.words = parse_words(raw_words);
                info!(list_id = %id, words = list.words.len(), "List words replaced");
                true
            }
            None => {
                debug!(list_id = %id, "edit ignored for unknown list");
                false
            }
        }
    }

    /// Lists whose name contains `query`, ignoring case, in store order.
    pub fn filter(&self, query: &str) -> Vec<&WordList> {
        let needle = query.to_lowercase();
        self.lists
            .iter()
            .filter(|list| list.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Look up a list by id.
    pub fn get(&self, id: Uuid) -> Option<&WordList> {
        self.lists.iter().find(|list| list.id == id)
    }

    /// All lists in display order.
    pub fn lists(&self) -> &[WordList] {
        &self.lists
    }

    /// Number of stored lists.
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Whether the store holds no lists.
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}
