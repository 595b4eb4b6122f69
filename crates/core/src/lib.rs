#![warn(clippy::all, missing_docs)]

//! Core domain logic for the bingo card creator.
//!
//! This crate hosts the word list store, card generation, print
//! layout and configuration used by the terminal UI and any future
//! frontends.

pub mod config;
pub mod generator;
pub mod layout;
pub mod models;
pub mod print;
pub mod session;
pub mod store;

pub use config::AppConfig;
pub use generator::{generate_cards, parse_card_count, CountError, MAX_CARD_COUNT};
pub use layout::chunk;
pub use models::{BingoCard, CardsPerPage, WordList, FREE_INDEX, FREE_MARKER};
pub use print::{render_print_document, PrintSpooler};
pub use session::BingoSession;
pub use store::{parse_words, ListStore};
