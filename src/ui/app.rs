use std::mem;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use rusqlite::Connection;
use tracing::{error, info};

use crate::catalog::{cell, columns};
use crate::db::{save_preferences, save_progress};
use crate::error::FeedError;
use crate::filter::select;
use crate::models::{
    Guide, Preferences, Progress, ProgressBook, Repertoire, Resource, SongRecord, ViewMode,
    MAX_LEVEL,
};

use super::helpers::{centered_rect, guide_chips, progress_chips, surface_error};
use super::modal::GuideModal;
use super::screens::{scroll_start, Selection};
use super::search::SearchState;

/// Rows reserved for the summary block above the content.
const HEADER_HEIGHT: u16 = 4;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height of one song card, borders included.
const SONG_CARD_HEIGHT: u16 = 6;
/// Rows skipped by PgUp/PgDn.
const PAGE: isize = 5;

/// Where the one startup fetch stands.
enum Load {
    Loading,
    Ready(Repertoire),
    Failed,
}

/// Input modes layered over the current view.
enum Mode {
    Normal,
    Searching,
    Modal(GuideModal),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state. Built from the persisted preferences and
/// progress before the feed arrives; the repertoire is attached once by
/// [`App::finish_loading`] and never mutated afterwards.
pub struct App {
    conn: Connection,
    prefs: Preferences,
    progress: ProgressBook,
    load: Load,
    search: SearchState,
    cards: Selection,
    table: Selection,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(conn: Connection, prefs: Preferences, progress: ProgressBook) -> Self {
        Self {
            conn,
            prefs,
            progress,
            load: Load::Loading,
            search: SearchState::new(),
            cards: Selection::default(),
            table: Selection::default(),
            mode: Mode::Normal,
            status: Some(StatusMessage {
                text: "Loading repertoire…".to_string(),
                kind: StatusKind::Info,
            }),
        }
    }

    /// Attach the outcome of the startup fetch. A failure leaves the app
    /// usable but empty; the cause goes to the log file.
    pub fn finish_loading(&mut self, result: Result<Repertoire, FeedError>) {
        match result {
            Ok(repertoire) => {
                info!(songs = repertoire.songs.len(), "repertoire ready");
                self.load = Load::Ready(repertoire);
                self.clear_status();
            }
            Err(err) => {
                error!(error = %err, "failed to load repertoire");
                self.load = Load::Failed;
                self.set_status("Could not load the repertoire.", StatusKind::Error);
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load, Load::Loading)
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn progress(&self) -> &ProgressBook {
        &self.progress
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    /// Keys of the cards currently shown, in display order.
    pub fn visible_song_keys(&self) -> Vec<String> {
        self.visible_songs()
            .into_iter()
            .map(|song| song.key.clone())
            .collect()
    }

    pub fn visible_row_count(&self) -> usize {
        self.visible_rows().len()
    }

    /// Apply a debounced search query once it is due.
    pub fn tick(&mut self, now: Instant) {
        if self.search.tick(now) {
            self.reset_selection();
        }
    }

    /// How long the event loop may block waiting for input.
    pub(crate) fn poll_timeout(&self, now: Instant, max: Duration) -> Duration {
        self.search
            .time_until_due(now)
            .map_or(max, |due| due.min(max))
    }

    /// Returns true when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        self.handle_key_at(code, Instant::now())
    }

    pub fn handle_key_at(&mut self, code: KeyCode, now: Instant) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Searching => self.handle_search_key(code, now),
            Mode::Modal(modal) => self.handle_modal_key(code, modal),
        };

        exit
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') => *exit = true,
            KeyCode::Char('v') => {
                self.prefs.view = self.prefs.view.toggle();
                self.persist_preferences();
            }
            KeyCode::Char('g') => {
                self.prefs.guide = self.prefs.guide.next();
                self.persist_preferences();
                self.set_status(
                    format!("Preferred guide: {}.", self.prefs.guide.label()),
                    StatusKind::Info,
                );
            }
            KeyCode::Char('o') => {
                self.prefs.sort = self.prefs.sort.next();
                self.reset_selection();
                self.persist_preferences();
                self.set_status(
                    format!("Sorted by {}.", self.prefs.sort.label()),
                    StatusKind::Info,
                );
            }
            KeyCode::Char('+') => self.adjust_level(1),
            KeyCode::Char('-') => self.adjust_level(-1),
            KeyCode::Char('/') | KeyCode::Char('f') => {
                self.clear_status();
                return Mode::Searching;
            }
            KeyCode::Char('c') => self.clear_search(),
            KeyCode::Esc => {
                if !self.search.applied.is_empty() {
                    self.clear_search();
                }
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-PAGE),
            KeyCode::PageDown => self.move_selection(PAGE),
            KeyCode::Home => self.current_selection_mut().select_first(),
            KeyCode::End => {
                let len = self.current_len();
                self.current_selection_mut().select_last(len);
            }
            _ => {
                return match self.prefs.view {
                    ViewMode::Cards => self.handle_card_key(code),
                    ViewMode::Table => self.handle_table_key(code),
                };
            }
        }
        Mode::Normal
    }

    fn handle_card_key(&mut self, code: KeyCode) -> Mode {
        if !matches!(
            code,
            KeyCode::Enter | KeyCode::Char('1'..='3' | 'd' | 'D' | 'x')
        ) {
            return Mode::Normal;
        }

        let Some(song) = self.selected_song().cloned() else {
            self.set_status("No song selected.", StatusKind::Error);
            return Mode::Normal;
        };

        match code {
            KeyCode::Enter => return Mode::Modal(GuideModal::for_song(&song, self.prefs.guide)),
            KeyCode::Char(ch @ '1'..='3') => {
                let guide = Guide::ALL[(ch as usize) - ('1' as usize)];
                if song.has_version(guide) {
                    return Mode::Modal(GuideModal::for_song(&song, guide));
                }
                self.set_status(
                    format!("No {} guide for {} yet.", guide.label(), song.name),
                    StatusKind::Error,
                );
            }
            KeyCode::Char('d') => self.toggle_progress(&song, Progress::Doing),
            KeyCode::Char('D') | KeyCode::Char('x') => self.toggle_progress(&song, Progress::Done),
            _ => {}
        }
        Mode::Normal
    }

    fn handle_table_key(&mut self, code: KeyCode) -> Mode {
        if code != KeyCode::Enter {
            return Mode::Normal;
        }

        let guide = self.prefs.guide;
        let selected = {
            let rows = self.visible_rows();
            self.table
                .current(rows.len())
                .map(|idx| cell(rows[idx], guide.column()).to_string())
        };
        let Some(value) = selected else {
            self.set_status("No row selected.", StatusKind::Error);
            return Mode::Normal;
        };

        match Resource::classify(&value) {
            Resource::Link(url) => self.open_url(url, guide.label()),
            Resource::Text(text) => self.set_status(text.to_string(), StatusKind::Info),
            Resource::Missing => self.set_status(
                format!("No {} guide in this row.", guide.label()),
                StatusKind::Error,
            ),
        }
        Mode::Normal
    }

    fn handle_search_key(&mut self, code: KeyCode, now: Instant) -> Mode {
        match code {
            KeyCode::Enter | KeyCode::Esc => {
                if self.search.commit() {
                    self.reset_selection();
                }
                Mode::Normal
            }
            KeyCode::Backspace => {
                self.search.backspace(now);
                Mode::Searching
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                self.search.push(ch, now);
                Mode::Searching
            }
            _ => Mode::Searching,
        }
    }

    fn handle_modal_key(&mut self, code: KeyCode, modal: GuideModal) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('q') => Mode::Normal,
            KeyCode::Enter | KeyCode::Char('o') => {
                if let Some(action) = &modal.action {
                    self.open_url(&action.url, &modal.title);
                }
                Mode::Normal
            }
            _ => Mode::Modal(modal),
        }
    }

    fn toggle_progress(&mut self, song: &SongRecord, state: Progress) {
        let message = match self.progress.toggle(&song.key, state) {
            Some(state) => format!("{}: {}.", song.name, state.label()),
            None => format!("{}: progress cleared.", song.name),
        };
        info!(song = %song.key, state = ?self.progress.get(&song.key), "progress changed");

        match save_progress(&self.conn, &self.progress) {
            Ok(()) => self.set_status(message, StatusKind::Info),
            Err(err) => {
                error!(error = %err, "failed to save progress");
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
    }

    fn adjust_level(&mut self, delta: i64) {
        let level = (i64::from(self.prefs.level_min) + delta).clamp(0, i64::from(MAX_LEVEL)) as u32;
        if level != self.prefs.level_min {
            self.prefs.level_min = level;
            self.reset_selection();
            self.persist_preferences();
        }
    }

    fn clear_search(&mut self) {
        if self.search.clear() {
            self.reset_selection();
        }
        self.set_status("Search cleared.", StatusKind::Info);
    }

    fn open_url(&mut self, url: &str, what: &str) {
        match open_link(url) {
            Ok(()) => {
                info!(url, "opened guide link");
                self.set_status(format!("Opened {what}."), StatusKind::Info);
            }
            Err(err) => {
                error!(url, error = %err, "failed to open link");
                self.set_status(format!("Failed to open link: {err}"), StatusKind::Error);
            }
        }
    }

    /// Preferences are written after every change, like the progress book.
    fn persist_preferences(&mut self) {
        if let Err(err) = save_preferences(&self.conn, &self.prefs) {
            error!(error = %err, "failed to save preferences");
            self.set_status(surface_error(&err), StatusKind::Error);
        }
    }

    fn repertoire(&self) -> Option<&Repertoire> {
        match &self.load {
            Load::Ready(repertoire) => Some(repertoire),
            Load::Loading | Load::Failed => None,
        }
    }

    fn visible_songs(&self) -> Vec<&SongRecord> {
        self.repertoire().map_or_else(Vec::new, |repertoire| {
            select(
                &repertoire.songs,
                self.prefs.level_min,
                &self.search.applied,
                &self.prefs.sort,
            )
        })
    }

    fn visible_rows(&self) -> Vec<&Vec<String>> {
        self.repertoire().map_or_else(Vec::new, |repertoire| {
            select(
                &repertoire.rows,
                self.prefs.level_min,
                &self.search.applied,
                &self.prefs.sort,
            )
        })
    }

    fn selected_song(&self) -> Option<&SongRecord> {
        let songs = self.visible_songs();
        self.cards.current(songs.len()).map(|idx| songs[idx])
    }

    fn current_len(&self) -> usize {
        match self.prefs.view {
            ViewMode::Cards => self.visible_songs().len(),
            ViewMode::Table => self.visible_rows().len(),
        }
    }

    fn current_selection_mut(&mut self) -> &mut Selection {
        match self.prefs.view {
            ViewMode::Cards => &mut self.cards,
            ViewMode::Table => &mut self.table,
        }
    }

    fn move_selection(&mut self, offset: isize) {
        let len = self.current_len();
        self.current_selection_mut().move_by(offset, len);
    }

    fn reset_selection(&mut self) {
        self.cards.select_first();
        self.table.select_first();
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_summary(frame, chunks[0]);

        match (&self.load, self.prefs.view) {
            (Load::Loading, _) => {
                let message = Paragraph::new("Loading repertoire…")
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(message, chunks[1]);
            }
            (Load::Failed, _) => {
                let message = Paragraph::new(
                    "The repertoire could not be loaded. Details are in the log file.",
                )
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL));
                frame.render_widget(message, chunks[1]);
            }
            (Load::Ready(repertoire), ViewMode::Cards) => {
                self.draw_cards(frame, chunks[1], repertoire)
            }
            (Load::Ready(repertoire), ViewMode::Table) => {
                self.draw_table(frame, chunks[1], repertoire)
            }
        }

        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::Searching => self.draw_search_bar(frame, area),
            Mode::Modal(modal) => self.draw_modal(frame, area, modal),
            Mode::Normal => {}
        }
    }

    fn draw_summary(&self, frame: &mut Frame, area: Rect) {
        let label_style = Style::default().fg(Color::Gray);
        let value_style = Style::default().add_modifier(Modifier::BOLD);
        let view = match self.prefs.view {
            ViewMode::Cards => "Cards",
            ViewMode::Table => "Table",
        };

        let settings = Line::from(vec![
            Span::styled("View: ", label_style),
            Span::styled(view, value_style),
            Span::styled("   Guide: ", label_style),
            Span::styled(self.prefs.guide.label(), value_style),
            Span::styled("   Sort: ", label_style),
            Span::styled(self.prefs.sort.label().to_string(), value_style),
            Span::styled("   Min level: ", label_style),
            Span::styled(self.prefs.level_min.to_string(), value_style),
        ]);

        let mut counts = match (self.repertoire(), self.prefs.view) {
            (None, _) => vec![Span::raw("No data yet")],
            (Some(repertoire), ViewMode::Cards) => {
                let total = repertoire.songs.len();
                vec![
                    Span::raw(format!(
                        "Showing {} of {}",
                        self.visible_songs().len(),
                        total
                    )),
                    Span::raw("   "),
                    Span::styled(
                        format!("Progress: {} / {}", self.progress.done_count(), total),
                        Style::default().fg(Color::Green),
                    ),
                ]
            }
            (Some(_), ViewMode::Table) => {
                vec![Span::raw(format!("Showing {} rows", self.visible_row_count()))]
            }
        };
        if !self.search.applied.trim().is_empty() {
            counts.push(Span::styled(
                format!("   Search: \"{}\"", self.search.applied),
                Style::default().fg(Color::Yellow),
            ));
        }

        let paragraph = Paragraph::new(vec![settings, Line::from(counts)])
            .block(Block::default().borders(Borders::ALL).title("Repertoire"));
        frame.render_widget(paragraph, area);
    }

    fn draw_cards(&self, frame: &mut Frame, area: Rect, repertoire: &Repertoire) {
        let songs = self.visible_songs();
        if songs.is_empty() || area.height == 0 {
            let text = if repertoire.songs.is_empty() {
                "The repertoire is empty."
            } else {
                "No songs match the current filters."
            };
            let message = Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, area);
            return;
        }

        let selected = self.cards.current(songs.len()).unwrap_or(0);
        let capacity = (area.height / SONG_CARD_HEIGHT).max(1) as usize;
        let start = scroll_start(selected, capacity, songs.len());
        let visible = &songs[start..songs.len().min(start + capacity)];

        let constraints: Vec<Constraint> = visible
            .iter()
            .map(|_| Constraint::Length(SONG_CARD_HEIGHT))
            .collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (offset, (song, chunk)) in visible.iter().zip(rows.iter()).enumerate() {
            if chunk.height == 0 {
                continue;
            }
            let is_selected = start + offset == selected;

            let mut block = Block::default().borders(Borders::ALL);
            if is_selected {
                block = block.border_style(Style::default().fg(Color::Yellow));
            }

            let title = if is_selected {
                format!("▶ {}", song.name)
            } else {
                song.name.clone()
            };
            let lines = vec![
                Line::from(Span::styled(
                    title,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    song.meta_line(),
                    Style::default().fg(Color::Gray),
                )),
                Line::from(guide_chips(song, self.prefs.guide)),
                Line::from(progress_chips(self.progress.get(&song.key))),
            ];

            let paragraph = Paragraph::new(lines)
                .block(block)
                .alignment(Alignment::Left);
            frame.render_widget(paragraph, *chunk);
        }
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect, repertoire: &Repertoire) {
        let rows = self.visible_rows();
        let guide = self.prefs.guide;
        let block = Block::default().borders(Borders::ALL).title("Rows");

        if rows.is_empty() {
            let message = Paragraph::new("No rows match the current filters.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let guide_label = match repertoire.header_label(guide.column()).trim() {
            "" => "Guide",
            label => label,
        };
        let header_cells = columns::FIXED
            .iter()
            .map(|idx| Cell::from(repertoire.header_label(*idx).trim().to_string()))
            .chain(std::iter::once(Cell::from(guide_label.to_string())));
        let header = Row::new(header_cells).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

        let body = rows.iter().map(|row| {
            let fixed = columns::FIXED
                .iter()
                .map(|idx| Cell::from(cell(row, *idx).trim().to_string()));
            let guide_cell = match Resource::classify(cell(row, guide.column())) {
                Resource::Link(_) => Cell::from("Open").style(Style::default().fg(Color::Cyan)),
                Resource::Text(text) => Cell::from(text.to_string()),
                Resource::Missing => Cell::from(""),
            };
            Row::new(fixed.chain(std::iter::once(guide_cell)))
        });

        let widths = [
            Constraint::Percentage(22),
            Constraint::Percentage(16),
            Constraint::Percentage(12),
            Constraint::Percentage(10),
            Constraint::Percentage(22),
            Constraint::Percentage(18),
        ];
        let table = Table::new(body, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = TableState::default().with_selected(self.table.current(rows.len()));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Search");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {}", self.search.draft)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Search: ".len() as u16 + self.search.draft.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_modal(&self, frame: &mut Frame, area: Rect, modal: &GuideModal) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let mut lines = vec![
            Line::from(Span::styled(
                modal.meta.clone(),
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
        ];
        lines.extend(modal.body.lines().map(|line| Line::from(line.to_string())));
        lines.push(Line::from(""));
        let mut hints = Vec::new();
        if let Some(action) = &modal.action {
            hints.push(Span::styled("[Enter]", key_style));
            hints.push(Span::raw(format!(" {}   ", action.label)));
        }
        hints.push(Span::styled("[Esc]", key_style));
        hints.push(Span::raw(" Close"));
        lines.push(Line::from(hints));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(modal.title.clone()),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, popup_area);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hint = |key: &'static str, label: &'static str| {
            [Span::styled(key, key_style), Span::raw(label)]
        };

        let spans: Vec<Span<'static>> = match (&self.mode, self.prefs.view) {
            (Mode::Searching, _) => [
                hint("[Enter]", " Apply   "),
                hint("[Esc]", " Done   "),
                hint("[Backspace]", " Delete"),
            ]
            .concat(),
            (Mode::Modal(_), _) => [hint("[Enter]", " Open   "), hint("[Esc]", " Close")].concat(),
            (Mode::Normal, ViewMode::Cards) => [
                hint("[↑↓]", " Select   "),
                hint("[Enter/1-3]", " Guide   "),
                hint("[d]", " Doing   "),
                hint("[x]", " Done   "),
                hint("[/]", " Search   "),
                hint("[c]", " Clear   "),
                hint("[g]", " Guide pref   "),
                hint("[o]", " Sort   "),
                hint("[+/-]", " Level   "),
                hint("[v]", " Table   "),
                hint("[q]", " Quit"),
            ]
            .concat(),
            (Mode::Normal, ViewMode::Table) => [
                hint("[↑↓]", " Select   "),
                hint("[Enter]", " Open Guide   "),
                hint("[/]", " Search   "),
                hint("[c]", " Clear   "),
                hint("[g]", " Guide   "),
                hint("[o]", " Sort   "),
                hint("[+/-]", " Level   "),
                hint("[v]", " Cards   "),
                hint("[q]", " Quit"),
            ]
            .concat(),
        };
        Line::from(spans)
    }
}
