use std::{cmp, io, path::PathBuf, thread, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};
use tokio::{spawn, sync::mpsc};
use tracing::{error, info, warn};
use uuid::Uuid;

use bingo_core::{
    config::{AppConfig, ThemeConfig},
    layout::page_count,
    models::{BingoCard, WordList, CARD_COLUMNS, FREE_INDEX, HEADER_LETTERS, MIN_WORDS},
    parse_card_count,
    print::{self, PrintSpooler},
    BingoSession,
};

use crate::block_font;

const TICK_RATE: Duration = Duration::from_millis(250);
const MAX_INPUT_LEN: usize = 4096;
const CELL_LINES: usize = 2;
const BANNER_MIN_HEIGHT: u16 = 32;

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    highlight: Color,
    selection_bg: Color,
    success: Color,
    warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Magenta,
            muted: Color::DarkGray,
            highlight: Color::LightBlue,
            selection_bg: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
        }
    }
}

impl Theme {
    /// Apply configured overrides, returning a note when some of them were unusable.
    fn from_config(config: &ThemeConfig) -> (Self, Option<String>) {
        let mut theme = Theme::default();
        let mut rejected = Vec::new();
        let overrides = [
            ("accent", config.accent.as_deref(), &mut theme.accent),
            ("muted", config.muted.as_deref(), &mut theme.muted),
            ("highlight", config.highlight.as_deref(), &mut theme.highlight),
        ];
        for (name, value, slot) in overrides {
            let Some(value) = value else { continue };
            match parse_hex_color(value) {
                Some(color) => *slot = color,
                None => rejected.push(name),
            }
        }
        let note = if rejected.is_empty() {
            None
        } else {
            Some(format!("Ignored invalid theme colours: {}", rejected.join(", ")))
        };
        (theme, note)
    }
}

fn parse_hex_color(input: &str) -> Option<Color> {
    let hex = input.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    Filter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Lists,
    Cards,
}

/// Single-line text buffer with a cursor, used by every form.
#[derive(Debug, Clone, Default)]
struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.len();
        Self { value, cursor }
    }

    fn insert(&mut self, ch: char) {
        if ch.is_control() || self.value.len() + ch.len_utf8() > MAX_INPUT_LEN {
            return;
        }
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    fn backspace(&mut self) {
        if let Some(prev) = self.value[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
            self.value.remove(self.cursor);
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
    }

    fn move_left(&mut self) {
        if let Some(prev) = self.value[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
        }
    }

    fn move_right(&mut self) {
        if let Some(next) = self.value[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    fn move_home(&mut self) {
        self.cursor = 0;
    }

    fn move_end(&mut self) {
        self.cursor = self.value.len();
    }

    /// Shared editing keys. Returns `false` when the key is not an editing key.
    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.move_home(),
            KeyCode::End => self.move_end(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Char(ch)
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
            {
                self.insert(ch)
            }
            _ => return false,
        }
        true
    }

    /// Slice of the value that fits in `width` columns, plus the cursor column within it.
    fn window(&self, width: usize) -> (String, u16) {
        let width = width.max(1);
        let cursor_col = self.value[..self.cursor].chars().count();
        let skip = (cursor_col + 1).saturating_sub(width);
        let visible: String = self.value.chars().skip(skip).take(width).collect();
        (visible, (cursor_col - skip) as u16)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CreateField {
    Name,
    Words,
}

#[derive(Debug, Clone)]
enum Modal {
    Create {
        name: TextInput,
        words: TextInput,
        field: CreateField,
    },
    Edit {
        list_id: Uuid,
        list_name: String,
        words: TextInput,
    },
    CardCount {
        input: TextInput,
    },
    ConfirmDelete {
        list_id: Uuid,
        list_name: String,
    },
}

enum AppEvent {
    Input(Event),
    Tick,
    PrintOpened(Result<PathBuf>),
}

/// Terminal front end owning the bingo session.
pub struct BingoApp {
    session: BingoSession,
    spooler: PrintSpooler,
    open_after_print: bool,
    state: UiState,
    modal: Option<Modal>,
    event_tx: Option<mpsc::Sender<AppEvent>>,
    theme: Theme,
    theme_status: Option<String>,
}

impl BingoApp {
    pub fn new(config: &AppConfig) -> Self {
        let (theme, theme_status) = Theme::from_config(&config.theme);
        Self {
            session: BingoSession::from_config(config),
            spooler: PrintSpooler::new(config.output_dir.clone()),
            open_after_print: config.open_after_print,
            state: UiState::default(),
            modal: None,
            event_tx: None,
            theme,
            theme_status,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut status = format!("Loaded {} word lists", self.session.store().len());
        if let Some(note) = self.theme_status.as_ref() {
            status.push_str(" • ");
            status.push_str(note);
        }
        self.state.set_status(status);

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx.clone());
        self.event_tx = Some(event_tx);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                break;
            }
            let maybe_event = event_rx.recv().await;
            if !self.process_app_event(maybe_event) || self.state.should_quit {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        self.event_tx = None;
        Ok(())
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(event)) => {
                if let Err(err) = self.handle_input(event) {
                    self.state.set_status(format!("Error: {err}"));
                }
                true
            }
            Some(AppEvent::Tick) => true,
            Some(AppEvent::PrintOpened(result)) => {
                match result {
                    Ok(path) => self
                        .state
                        .set_status(format!("Opened {} for printing", path.display())),
                    Err(err) => {
                        error!(?err, "Failed to open print document");
                        self.state
                            .set_status(format!("Could not open print document: {err}"));
                    }
                }
                true
            }
            None => false,
        }
    }

    fn visible_lists(&self) -> Vec<&WordList> {
        self.session.store().filter(&self.state.filter)
    }

    fn current_list(&self) -> Option<&WordList> {
        self.visible_lists().get(self.state.cursor).copied()
    }

    fn handle_input(&mut self, event: Event) -> Result<()> {
        let Event::Key(key) = event else {
            return Ok(());
        };
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            self.state.should_quit = true;
            return Ok(());
        }
        if self.modal.is_some() {
            return self.handle_modal_key(key);
        }
        match self.state.mode {
            Mode::Filter => self.handle_filter_key(key),
            Mode::Browse => self.handle_browse_key(key),
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.state.mode = Mode::Browse;
                self.state.filter.clear();
                self.state.reset_cursor();
                self.state.set_status("Search cleared".to_string());
            }
            KeyCode::Enter => {
                self.state.mode = Mode::Browse;
                let matches = self.visible_lists().len();
                self.state
                    .set_status(format!("{matches} lists match '{}'", self.state.filter));
            }
            KeyCode::Backspace => {
                self.state.filter.pop();
                self.state.reset_cursor();
            }
            KeyCode::Char(c) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    self.state.filter.push(c);
                    self.state.reset_cursor();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Result<()> {
        let total = self.visible_lists().len();
        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => self.state.should_quit = true,
            KeyCode::Tab => {
                self.state.focus = match self.state.focus {
                    Focus::Lists => Focus::Cards,
                    Focus::Cards => Focus::Lists,
                };
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1, total),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1, total),
            KeyCode::Char('l') | KeyCode::Right if self.state.focus == Focus::Cards => {
                self.move_selection(1, total)
            }
            KeyCode::Char('h') | KeyCode::Left if self.state.focus == Focus::Cards => {
                self.move_selection(-1, total)
            }
            KeyCode::Char('g') | KeyCode::Home if key.modifiers.is_empty() => {
                self.state.move_to(0, total)
            }
            KeyCode::Char('G') | KeyCode::End => self.state.move_to(usize::MAX, total),
            KeyCode::PageDown => self.state.page(1, total),
            KeyCode::PageUp => self.state.page(-1, total),
            KeyCode::Char('/') => {
                self.state.mode = Mode::Filter;
                self.state.focus = Focus::Lists;
            }
            KeyCode::Char('b') if key.modifiers.is_empty() => {
                self.state.show_banner = !self.state.show_banner;
            }
            KeyCode::Char('n') => {
                self.modal = Some(Modal::Create {
                    name: TextInput::default(),
                    words: TextInput::default(),
                    field: CreateField::Name,
                });
                self.state
                    .set_status("Name the list, then enter comma-separated words".to_string());
            }
            KeyCode::Char('e') => self.begin_edit(),
            KeyCode::Char('d') => self.begin_delete(),
            KeyCode::Char('c') => {
                let current = self.session.card_count().to_string();
                self.modal = Some(Modal::CardCount {
                    input: TextInput::with_value(current),
                });
            }
            KeyCode::Enter => self.generate_current(),
            KeyCode::Char('r') if key.modifiers.is_empty() => self.regenerate(),
            KeyCode::Char('p') => {
                let next = self.session.cards_per_page().next();
                self.session.set_cards_per_page(next);
                self.state.set_status(format!("Printing {next} card(s) per page"));
            }
            KeyCode::Char('P') => self.print_cards(),
            _ => {}
        }
        Ok(())
    }

    fn move_selection(&mut self, delta: isize, total: usize) {
        match self.state.focus {
            Focus::Lists => self.state.move_cursor(delta, total),
            Focus::Cards => {
                let cards = self.session.cards().len();
                self.state.move_card_cursor(delta, cards);
            }
        }
    }

    fn begin_edit(&mut self) {
        let Some(list) = self.current_list() else {
            self.state.set_status("No list selected".to_string());
            return;
        };
        let modal = Modal::Edit {
            list_id: list.id,
            list_name: list.name.clone(),
            words: TextInput::with_value(list.joined_words()),
        };
        self.modal = Some(modal);
    }

    fn begin_delete(&mut self) {
        let Some(list) = self.current_list() else {
            self.state.set_status("No list selected".to_string());
            return;
        };
        let modal = Modal::ConfirmDelete {
            list_id: list.id,
            list_name: list.name.clone(),
        };
        self.modal = Some(modal);
    }

    fn generate_current(&mut self) {
        let Some(list) = self.current_list() else {
            self.state.set_status("No list selected".to_string());
            return;
        };
        let (id, name, words) = (list.id, list.name.clone(), list.words.len());
        if words < MIN_WORDS {
            self.state.set_status(format!(
                "{name} needs at least {MIN_WORDS} words to generate cards (has {words})"
            ));
            return;
        }
        self.generate(id, &name);
    }

    fn regenerate(&mut self) {
        let Some((id, name)) = self
            .session
            .selected_list()
            .map(|list| (list.id, list.name.clone()))
        else {
            self.state
                .set_status("Generate from a list before regenerating".to_string());
            return;
        };
        self.generate(id, &name);
    }

    fn generate(&mut self, id: Uuid, name: &str) {
        if self.session.generate(id) {
            self.state.card_cursor = 0;
            self.state.set_status(format!(
                "Generated {} card(s) from {name}",
                self.session.cards().len()
            ));
        } else {
            self.state
                .set_status(format!("Could not generate cards from {name}"));
        }
    }

    fn print_cards(&mut self) {
        if self.session.cards().is_empty() {
            self.state
                .set_status("Generate cards before printing".to_string());
            return;
        }
        let title = self
            .session
            .selected_list()
            .map(|list| list.name.clone())
            .unwrap_or_else(|| "Cards".to_string());
        let path = match self.spooler.spool(
            self.session.cards(),
            self.session.cards_per_page(),
            &title,
        ) {
            Ok(path) => path,
            Err(err) => {
                error!(?err, "Failed to write print document");
                self.state.set_status(format!("Print failed: {err}"));
                return;
            }
        };

        if !self.open_after_print {
            self.state
                .set_status(format!("Saved print document to {}", path.display()));
            return;
        }
        let Some(sender) = self.event_tx.clone() else {
            warn!("print requested before the event loop started");
            return;
        };
        self.state
            .set_status(format!("Opening {} ...", path.display()));
        spawn(async move {
            let result = print::open_document(&path).await.map(|_| path);
            let _ = sender.send(AppEvent::PrintOpened(result)).await;
        });
    }

    fn handle_modal_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(mut modal) = self.modal.take() else {
            return Ok(());
        };
        if key.code == KeyCode::Esc {
            self.state.set_status("Cancelled".to_string());
            return Ok(());
        }

        let keep_open = match &mut modal {
            Modal::Create { name, words, field } => match key.code {
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                    *field = match *field {
                        CreateField::Name => CreateField::Words,
                        CreateField::Words => CreateField::Name,
                    };
                    true
                }
                KeyCode::Enter if *field == CreateField::Name => {
                    *field = CreateField::Words;
                    true
                }
                KeyCode::Enter => !self.submit_create(&name.value, &words.value),
                _ => {
                    match field {
                        CreateField::Name => name.handle_key(&key),
                        CreateField::Words => words.handle_key(&key),
                    };
                    true
                }
            },
            Modal::Edit {
                list_id,
                list_name,
                words,
            } => match key.code {
                KeyCode::Enter => {
                    self.submit_edit(*list_id, list_name, &words.value);
                    false
                }
                _ => {
                    words.handle_key(&key);
                    true
                }
            },
            Modal::CardCount { input } => match key.code {
                KeyCode::Enter => match parse_card_count(&input.value) {
                    Ok(count) => {
                        self.session.set_card_count(count);
                        self.state
                            .set_status(format!("Will generate {count} card(s)"));
                        false
                    }
                    Err(err) => {
                        self.state.set_status(format!("Invalid card count: {err}"));
                        true
                    }
                },
                _ => {
                    input.handle_key(&key);
                    true
                }
            },
            Modal::ConfirmDelete { list_id, list_name } => {
                if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter) {
                    if self.session.store_mut().delete(*list_id) {
                        self.state.set_status(format!("Deleted {list_name}"));
                    }
                    let total = self.visible_lists().len();
                    self.state.clamp_cursor(total);
                } else {
                    self.state.set_status("Delete cancelled".to_string());
                }
                false
            }
        };

        if keep_open {
            self.modal = Some(modal);
        }
        Ok(())
    }

    /// Returns `true` when the list was created.
    fn submit_create(&mut self, name: &str, words: &str) -> bool {
        match self.session.store_mut().create(name, words) {
            Some(id) => {
                self.state.filter.clear();
                self.state.reset_cursor();
                let status = match self.session.store().get(id) {
                    Some(list) if list.can_generate() => {
                        format!("Created {} ({} words)", list.name, list.words.len())
                    }
                    Some(list) => format!(
                        "Created {} ({} words, {} more needed for cards)",
                        list.name,
                        list.words.len(),
                        MIN_WORDS - list.words.len()
                    ),
                    None => "List created".to_string(),
                };
                self.state.set_status(status);
                true
            }
            None => {
                self.state
                    .set_status("A list needs both a name and some words".to_string());
                false
            }
        }
    }

    fn submit_edit(&mut self, list_id: Uuid, list_name: &str, words: &str) {
        if !self.session.store_mut().edit(list_id, words) {
            self.state
                .set_status(format!("{list_name} no longer exists"));
            return;
        }
        let count = self
            .session
            .store()
            .get(list_id)
            .map(|list| list.words.len())
            .unwrap_or_default();
        info!(list_id = %list_id, words = count, "List edited from UI");
        self.state
            .set_status(format!("Saved {list_name} ({count} words)"));
    }

    fn draw(&mut self, frame: &mut Frame) {
        let size = frame.size();
        let banner_lines = if self.state.show_banner && size.height >= BANNER_MIN_HEIGHT {
            Some(block_font::render("BINGO"))
        } else {
            None
        };

        let mut constraints = Vec::new();
        if banner_lines.is_some() {
            constraints.push(Constraint::Length(block_font::height() as u16 + 2));
        }
        constraints.push(Constraint::Min(10));
        constraints.push(Constraint::Length(4));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(size);

        let mut chunk_iter = chunks.iter().copied();
        if let Some(lines) = &banner_lines {
            if let Some(area) = chunk_iter.next() {
                self.render_banner(frame, area, lines);
            }
        }
        let body = chunk_iter.next().unwrap_or(size);
        let status = chunk_iter.next().unwrap_or(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(body);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(5)])
            .split(columns[1]);

        self.render_lists(frame, columns[0]);
        self.render_list_details(frame, right[0]);
        self.render_cards(frame, right[1]);
        self.render_status(frame, status);

        if let Some(modal) = &self.modal {
            self.render_modal(frame, modal);
        }
    }

    fn panel_block(&self, title: String, focused: bool) -> Block<'static> {
        let border = if focused {
            Style::default().fg(self.theme.accent)
        } else {
            Style::default().fg(self.theme.muted)
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(title)
    }

    fn render_banner(&self, frame: &mut Frame, area: Rect, lines: &[String]) {
        let content: Vec<Line> = lines
            .iter()
            .map(|line| {
                Line::from(Span::styled(
                    line.clone(),
                    Style::default().fg(self.theme.accent),
                ))
            })
            .collect();
        let paragraph = Paragraph::new(content)
            .block(Block::default().borders(Borders::ALL).title("Bingo Card Creator"))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn render_lists(&mut self, frame: &mut Frame, area: Rect) {
        let height = area.height.saturating_sub(2) as usize;
        let total = self.visible_lists().len();
        self.state.list_height = height;
        self.state.clamp_cursor(total);

        let title = if self.state.filter.is_empty() {
            format!("Word Lists ({total})")
        } else {
            format!("Word Lists ({total}) /{}", self.state.filter)
        };
        let block = self.panel_block(title, self.state.focus == Focus::Lists);

        let lists = self.visible_lists();
        let end = (self.state.offset + height).min(lists.len());
        let items: Vec<ListItem> = lists[self.state.offset.min(end)..end]
            .iter()
            .enumerate()
            .map(|(idx, list)| {
                let is_selected = self.state.offset + idx == self.state.cursor;
                let marker = if is_selected {
                    Span::styled(
                        "▶ ",
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::raw("  ")
                };
                let name = Span::styled(
                    list.name.clone(),
                    Style::default()
                        .fg(self.theme.primary_fg)
                        .add_modifier(Modifier::BOLD),
                );
                let count_style = if list.can_generate() {
                    Style::default().fg(self.theme.muted)
                } else {
                    Style::default().fg(self.theme.warning)
                };
                let count = Span::styled(format!(" · {} words", list.words.len()), count_style);
                ListItem::new(Line::from(vec![marker, name, count]))
            })
            .collect();

        if items.is_empty() {
            let message = if self.state.filter.is_empty() {
                "No lists yet. Press n to create one."
            } else {
                "No lists match the search."
            };
            frame.render_widget(Paragraph::new(message).block(block), area);
            return;
        }

        let mut list_state = ListState::default();
        list_state.select(Some(self.state.cursor.saturating_sub(self.state.offset)));
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_list_details(&self, frame: &mut Frame, area: Rect) {
        let block = self.panel_block("Details".to_string(), false);
        let Some(list) = self.current_list() else {
            frame.render_widget(Paragraph::new("No list selected").block(block), area);
            return;
        };

        let readiness = if list.can_generate() {
            Span::styled("ready", Style::default().fg(self.theme.success))
        } else {
            Span::styled(
                format!("needs {} more word(s)", MIN_WORDS - list.words.len()),
                Style::default().fg(self.theme.warning),
            )
        };
        let lines = vec![
            Line::from(vec![
                Span::styled(list.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!("  {} words  ", list.words.len())),
                readiness,
            ]),
            Line::from(format!(
                "Cards per run: {}   Cards per page: {}",
                self.session.card_count(),
                self.session.cards_per_page()
            )),
            Line::from(Span::styled(
                list.joined_words(),
                Style::default().fg(self.theme.muted),
            )),
        ];
        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_cards(&self, frame: &mut Frame, area: Rect) {
        let cards = self.session.cards();
        let focused = self.state.focus == Focus::Cards;
        let Some(card) = cards.get(self.state.card_cursor) else {
            let block = self.panel_block("Generated Cards".to_string(), focused);
            let paragraph = Paragraph::new("Select a list with 25+ words and press Enter.")
                .block(block)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        };

        let per_page = self.session.cards_per_page().count();
        let source = self
            .session
            .selected_list()
            .map(|list| list.name.as_str())
            .unwrap_or("deleted list");
        let title = format!(
            "Card {}/{} · {} · page {}/{}",
            self.state.card_cursor + 1,
            cards.len(),
            source,
            self.state.card_cursor / per_page + 1,
            page_count(cards.len(), per_page)
        );
        let block = self.panel_block(title, focused);
        let inner_width = area.width.saturating_sub(2) as usize;
        let column_width = (inner_width.saturating_sub(CARD_COLUMNS - 1) / CARD_COLUMNS).max(1);
        let table = self.card_table(card, column_width).block(block);
        frame.render_widget(table, area);
    }

    fn card_table(&self, card: &BingoCard, column_width: usize) -> Table<'static> {
        let header = Row::new(HEADER_LETTERS.iter().map(|letter| {
            Cell::from(Line::from(letter.to_string()).alignment(Alignment::Center)).style(
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )
        }))
        .bottom_margin(1);

        let rows = card.rows().enumerate().map(|(row_idx, row)| {
            let cells = row.iter().enumerate().map(|(col_idx, word)| {
                let is_free = row_idx * CARD_COLUMNS + col_idx == FREE_INDEX;
                let lines: Vec<Line> = wrap_cell(word, column_width, CELL_LINES)
                    .into_iter()
                    .map(|line| Line::from(line).alignment(Alignment::Center))
                    .collect();
                let style = if is_free {
                    Style::default()
                        .fg(self.theme.highlight)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.theme.primary_fg)
                };
                Cell::from(lines).style(style)
            });
            Row::new(cells).height(CELL_LINES as u16).bottom_margin(1)
        });

        let widths = [Constraint::Ratio(1, CARD_COLUMNS as u32); CARD_COLUMNS];
        Table::new(rows, widths).header(header).column_spacing(1)
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let primary = if self.state.mode == Mode::Filter {
            format!("Search: {}▏", self.state.filter)
        } else {
            self.state.status.clone()
        };
        let help = "n new  / search  e edit  d delete  c count  Enter generate  r regenerate  p per-page  P print  Tab focus  q quit";
        let paragraph = Paragraph::new(vec![
            Line::from(primary),
            Line::from(Span::styled(help, Style::default().fg(self.theme.muted))),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_modal(&self, frame: &mut Frame, modal: &Modal) {
        let frame_area = frame.size();
        let width = cmp::max(cmp::min(72_u16, frame_area.width.saturating_sub(4)), 24_u16);
        let input_width = width.saturating_sub(4) as usize;
        let accent = Style::default().fg(self.theme.accent);
        let bold = Style::default().add_modifier(Modifier::BOLD);

        let (title, lines, cursor): (String, Vec<Line>, Option<(u16, u16)>) = match modal {
            Modal::Create { name, words, field } => {
                let (name_text, name_col) = name.window(input_width);
                let (words_text, words_col) = words.window(input_width);
                let marker = |active: bool| if active { "▶ " } else { "  " };
                let cursor = match field {
                    CreateField::Name => (name_col, 1),
                    CreateField::Words => (words_col, 4),
                };
                (
                    "Create New List".to_string(),
                    vec![
                        Line::from(Span::styled(
                            format!("{}Name", marker(*field == CreateField::Name)),
                            bold,
                        )),
                        Line::from(vec![Span::styled("> ", accent), Span::raw(name_text)]),
                        Line::from(""),
                        Line::from(Span::styled(
                            format!("{}Words (comma separated)", marker(*field == CreateField::Words)),
                            bold,
                        )),
                        Line::from(vec![Span::styled("> ", accent), Span::raw(words_text)]),
                        Line::from(""),
                        Line::from(format!(
                            "{} word(s) entered",
                            bingo_core::parse_words(&words.value).len()
                        )),
                        Line::from("Tab switch field  Enter next/create  Esc cancel"),
                    ],
                    Some(cursor),
                )
            }
            Modal::Edit {
                list_name, words, ..
            } => {
                let (text, col) = words.window(input_width);
                (
                    format!("Edit {list_name}"),
                    vec![
                        Line::from(Span::styled("Words (comma separated)", bold)),
                        Line::from(vec![Span::styled("> ", accent), Span::raw(text)]),
                        Line::from(""),
                        Line::from(format!(
                            "{} word(s)",
                            bingo_core::parse_words(&words.value).len()
                        )),
                        Line::from("Enter save  Esc cancel"),
                    ],
                    Some((col, 1)),
                )
            }
            Modal::CardCount { input } => {
                let (text, col) = input.window(input_width);
                (
                    "Number of Cards".to_string(),
                    vec![
                        Line::from(Span::styled("How many cards per generation?", bold)),
                        Line::from(vec![Span::styled("> ", accent), Span::raw(text)]),
                        Line::from(""),
                        Line::from("Enter apply  Esc cancel"),
                    ],
                    Some((col, 1)),
                )
            }
            Modal::ConfirmDelete { list_name, .. } => (
                "Delete List".to_string(),
                vec![
                    Line::from(format!("Delete '{list_name}'?")),
                    Line::from(""),
                    Line::from("y confirm  any other key cancels"),
                ],
                None,
            ),
        };

        let height = (lines.len() as u16 + 2).min(frame_area.height);
        let area = centered_rect(width, height, frame_area);
        frame.render_widget(Clear, area);
        let paragraph =
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);

        if let Some((col, row)) = cursor {
            let cursor_x = (area.x + 3 + col).min(area.x + area.width.saturating_sub(2));
            frame.set_cursor(cursor_x, area.y + 1 + row);
        }
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

struct UiState {
    cursor: usize,
    offset: usize,
    list_height: usize,
    card_cursor: usize,
    filter: String,
    status: String,
    show_banner: bool,
    mode: Mode,
    focus: Focus,
    should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            cursor: 0,
            offset: 0,
            list_height: 1,
            card_cursor: 0,
            filter: String::new(),
            status: "Ready".to_string(),
            show_banner: true,
            mode: Mode::Browse,
            focus: Focus::Lists,
            should_quit: false,
        }
    }
}

impl UiState {
    fn set_status(&mut self, message: String) {
        self.status = message;
    }

    fn reset_cursor(&mut self) {
        self.cursor = 0;
        self.offset = 0;
    }

    fn move_cursor(&mut self, delta: isize, total: usize) {
        if total == 0 {
            return;
        }
        let idx = (self.cursor as isize + delta).clamp(0, total as isize - 1);
        self.cursor = idx as usize;
        self.ensure_cursor_visible(total);
    }

    fn move_to(&mut self, index: usize, total: usize) {
        if total == 0 {
            return;
        }
        self.cursor = index.min(total - 1);
        self.ensure_cursor_visible(total);
    }

    fn page(&mut self, direction: isize, total: usize) {
        let step = self.list_height.min(total) as isize;
        self.move_cursor(direction * step, total);
    }

    fn move_card_cursor(&mut self, delta: isize, total: usize) {
        if total == 0 {
            self.card_cursor = 0;
            return;
        }
        let idx = (self.card_cursor as isize + delta).clamp(0, total as isize - 1);
        self.card_cursor = idx as usize;
    }

    fn clamp_cursor(&mut self, total: usize) {
        if total == 0 {
            self.reset_cursor();
        } else if self.cursor >= total {
            self.cursor = total - 1;
        }
        self.ensure_cursor_visible(total);
    }

    fn ensure_cursor_visible(&mut self, total: usize) {
        if total == 0 || self.list_height == 0 {
            self.offset = 0;
            return;
        }
        let height = self.list_height;
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }
        self.offset = self.offset.min(total.saturating_sub(height));
    }
}

/// Break `text` into at most `max_lines` lines of `width` characters, marking truncation.
fn wrap_cell(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let pending = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if pending <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > width {
            lines.push(chars.drain(..width).collect());
        }
        current = chars.into_iter().collect();
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let mut kept: Vec<char> = last.chars().collect();
            kept.truncate(width.saturating_sub(1));
            kept.push('…');
            *last = kept.into_iter().collect();
        }
    }
    lines
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut BingoApp, text: &str) {
        for ch in text.chars() {
            app.handle_input(key(KeyCode::Char(ch))).expect("input handled");
        }
    }

    fn test_app() -> BingoApp {
        let config = AppConfig {
            open_after_print: false,
            output_dir: std::env::temp_dir().join("bingo-tui-tests"),
            ..AppConfig::default()
        };
        BingoApp::new(&config)
    }

    #[test]
    fn text_input_handles_multibyte_editing() {
        let mut input = TextInput::with_value("héllo");
        input.move_left();
        input.move_left();
        input.move_left();
        input.backspace();
        assert_eq!(input.value, "hllo");
        input.insert('é');
        assert_eq!(input.value, "héllo");
        input.move_end();
        input.delete();
        assert_eq!(input.value, "héllo");
    }

    #[test]
    fn text_input_window_follows_cursor() {
        let input = TextInput::with_value("abcdefghij");
        let (visible, col) = input.window(4);
        assert_eq!(visible, "hij");
        assert_eq!(col, 3);
    }

    #[test]
    fn parse_hex_color_accepts_rgb() {
        assert_eq!(parse_hex_color("#7c3aed"), Some(Color::Rgb(0x7c, 0x3a, 0xed)));
        assert_eq!(parse_hex_color("zzzzzz"), None);
        assert_eq!(parse_hex_color("#fff"), None);
    }

    #[test]
    fn invalid_theme_colours_are_reported() {
        let config = ThemeConfig {
            accent: Some("#112233".to_string()),
            muted: Some("grey".to_string()),
            highlight: None,
        };
        let (theme, note) = Theme::from_config(&config);
        assert_eq!(theme.accent, Color::Rgb(0x11, 0x22, 0x33));
        assert!(note.expect("note present").contains("muted"));
    }

    #[test]
    fn wrap_cell_splits_and_truncates() {
        assert_eq!(wrap_cell("Dragon Fruit", 6, 2), vec!["Dragon", "Fruit"]);
        assert_eq!(wrap_cell("Massachusetts", 5, 2), vec!["Massa", "chus…"]);
        assert_eq!(wrap_cell("FREE", 10, 2), vec!["FREE"]);
    }

    #[test]
    fn create_form_adds_list_at_top() {
        let mut app = test_app();
        app.handle_input(key(KeyCode::Char('n'))).expect("open form");
        type_text(&mut app, "Colors");
        app.handle_input(key(KeyCode::Enter)).expect("next field");
        type_text(&mut app, "red, green, blue");
        app.handle_input(key(KeyCode::Enter)).expect("submit");

        assert!(app.modal.is_none());
        let first = &app.session.store().lists()[0];
        assert_eq!(first.name, "Colors");
        assert_eq!(first.words.len(), 3);
        assert_eq!(app.current_list().map(|l| l.name.as_str()), Some("Colors"));
    }

    #[test]
    fn create_form_stays_open_without_words() {
        let mut app = test_app();
        let before = app.session.store().len();
        app.handle_input(key(KeyCode::Char('n'))).expect("open form");
        type_text(&mut app, "Empty");
        app.handle_input(key(KeyCode::Enter)).expect("next field");
        app.handle_input(key(KeyCode::Enter)).expect("submit");
        assert!(app.modal.is_some());
        assert_eq!(app.session.store().len(), before);
    }

    #[test]
    fn enter_generates_cards_for_highlighted_list() {
        let mut app = test_app();
        app.handle_input(key(KeyCode::Enter)).expect("generate");
        assert_eq!(app.session.cards().len(), 1);
        assert_eq!(
            app.session.selected_list().map(|l| l.name.as_str()),
            Some("Fruits")
        );
    }

    #[test]
    fn invalid_card_count_keeps_previous_value() {
        let mut app = test_app();
        app.handle_input(key(KeyCode::Char('c'))).expect("open count");
        app.handle_input(key(KeyCode::Backspace)).expect("clear");
        type_text(&mut app, "abc");
        app.handle_input(key(KeyCode::Enter)).expect("submit");
        assert!(app.modal.is_some());
        assert_eq!(app.session.card_count(), 1);

        app.handle_input(key(KeyCode::Home)).expect("home");
        for _ in 0..3 {
            app.handle_input(key(KeyCode::Delete)).expect("delete");
        }
        type_text(&mut app, "3");
        app.handle_input(key(KeyCode::Enter)).expect("submit");
        assert!(app.modal.is_none());
        assert_eq!(app.session.card_count(), 3);
    }

    #[test]
    fn search_then_delete_removes_match() {
        let mut app = test_app();
        app.handle_input(key(KeyCode::Char('/'))).expect("search");
        type_text(&mut app, "JOBS");
        app.handle_input(key(KeyCode::Enter)).expect("apply");
        assert_eq!(app.visible_lists().len(), 1);

        app.handle_input(key(KeyCode::Char('d'))).expect("delete");
        app.handle_input(key(KeyCode::Char('y'))).expect("confirm");
        assert!(app.visible_lists().is_empty());
        assert_eq!(app.session.store().len(), 3);
    }

    #[test]
    fn print_writes_document_when_opening_disabled() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = AppConfig {
            open_after_print: false,
            output_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        let mut app = BingoApp::new(&config);
        app.handle_input(key(KeyCode::Char('p')))?;
        app.handle_input(key(KeyCode::Enter))?;
        app.handle_input(key(KeyCode::Char('P')))?;

        let written: Vec<_> = std::fs::read_dir(dir.path())?.collect::<Result<_, _>>()?;
        assert_eq!(written.len(), 1);
        assert!(app.state.status.starts_with("Saved print document"));
        Ok(())
    }

    #[test]
    fn print_without_cards_is_refused() {
        let mut app = test_app();
        app.handle_input(key(KeyCode::Char('P'))).expect("print");
        assert_eq!(app.state.status, "Generate cards before printing");
    }
}
