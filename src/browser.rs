use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table, TableState},
    DefaultTerminal, Frame,
};
use rusqlite::Connection;

use crate::chart::Canvas;
use crate::db;
use crate::fmt;
use crate::grouper;
use crate::models::Transaction;
use crate::palette::name_color;
use crate::reports::{self, GroupSummary, StackedChart};
use crate::state::{self, Action, AppState};
use crate::tui::{
    self, ERROR_STYLE, FOOTER_STYLE, HEADER_STYLE, SELECTED_STYLE, WORD_STYLE,
};

const CHART_HEIGHT: u16 = 12;
const NAME_COL: u16 = 16;
const AVG_COL: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Unfiltered,
    Filtered,
    Summaries,
}

impl Pane {
    fn next(self) -> Self {
        match self {
            Pane::Unfiltered => Pane::Filtered,
            Pane::Filtered => Pane::Summaries,
            Pane::Summaries => Pane::Unfiltered,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum BrowseMode {
    Normal,
    EditName(String),
    NewSearch(String),
    EditSearch { index: usize, input: String },
}

#[derive(Debug, PartialEq)]
pub enum BrowseAction {
    Continue,
    Close,
    SaveGroupings,
}

#[derive(Debug, Clone, Copy)]
pub struct ViewOptions {
    pub skip_groups: usize,
    pub floor: f64,
    pub bar_width: f64,
}

/// Everything shown on screen, derived from the state on every frame.
#[derive(Default)]
struct View {
    unfiltered: Vec<Transaction>,
    filtered: Option<Vec<Transaction>>,
    summaries: Vec<GroupSummary>,
    chart: Option<StackedChart>,
    error: Option<String>,
}

pub struct GroupingBrowser {
    state: AppState,
    source: String,
    options: ViewOptions,
    mode: BrowseMode,
    focus: Pane,
    selected_row: usize,
    selected_word: usize,
    selected_search: usize,
    status_message: Option<String>,
    table_states: [TableState; 3],
}

impl GroupingBrowser {
    pub fn new(state: AppState, source: String, options: ViewOptions) -> Self {
        Self {
            state,
            source,
            options,
            mode: BrowseMode::Normal,
            focus: Pane::Unfiltered,
            selected_row: 0,
            selected_word: 0,
            selected_search: 0,
            status_message: None,
            table_states: Default::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn run(&mut self, conn: &Connection) -> io::Result<()> {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            ratatui::restore();
            hook(info);
        }));

        let mut terminal = ratatui::init();
        let result = self.event_loop(&mut terminal, conn);
        ratatui::restore();
        result
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal, conn: &Connection) -> io::Result<()> {
        loop {
            terminal.draw(|frame| self.draw_frame(frame))?;

            if let Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) = event::read()?
            {
                if kind != KeyEventKind::Press {
                    continue;
                }

                if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
                    break;
                }

                match self.handle_key_event(code) {
                    BrowseAction::Close => break,
                    BrowseAction::Continue => {}
                    BrowseAction::SaveGroupings => {
                        if let Err(e) = db::save_groupings(conn, &self.source, &self.state.groupings) {
                            tracing::error!("saving groupings failed: {e}");
                            self.status_message = Some(format!("Save failed: {e}"));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn derive(&self) -> View {
        let Some(rows) = &self.state.transactions else {
            return View::default();
        };
        match grouper::partition(rows, &self.state.groupings, &self.state.searches) {
            Ok(p) => View {
                unfiltered: reports::sorted_by_description(&p.leftover),
                filtered: p.current.as_deref().map(reports::sorted_by_description),
                summaries: reports::summaries(&p, self.options.bar_width),
                chart: reports::stacked_chart(
                    &p,
                    self.options.skip_groups,
                    Canvas::default(),
                    self.options.floor,
                ),
                error: p.search_error.map(|e| e.to_string()),
            },
            // Keep listing the groupings so a broken one can still be popped.
            Err(e) => View {
                summaries: self
                    .state
                    .groupings
                    .iter()
                    .map(|g| GroupSummary {
                        name: g.name.clone(),
                        count: 0,
                        sum: 0.0,
                        monthly: 0.0,
                        bar_offset: 0.0,
                        bar_width: 0.0,
                    })
                    .collect(),
                error: Some(e.to_string()),
                ..View::default()
            },
        }
    }

    fn pane_len(&self, view: &View) -> usize {
        match self.focus {
            Pane::Unfiltered => view.unfiltered.len(),
            Pane::Filtered => view.filtered.as_ref().map_or(0, Vec::len),
            Pane::Summaries => view.summaries.len(),
        }
    }

    fn selected_transaction<'a>(&self, view: &'a View) -> Option<&'a Transaction> {
        match self.focus {
            Pane::Unfiltered => view.unfiltered.get(self.selected_row),
            Pane::Filtered => view.filtered.as_ref()?.get(self.selected_row),
            Pane::Summaries => None,
        }
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Handle a key event. Returns a BrowseAction indicating what the caller should do.
    pub fn handle_key_event(&mut self, code: KeyCode) -> BrowseAction {
        self.status_message = None;

        match self.mode.clone() {
            BrowseMode::Normal => self.handle_normal_key(code),
            BrowseMode::EditName(input) => match self.handle_input_key(code, input) {
                Some(Some(name)) => self.apply(Action::SetName(name)),
                _ => BrowseAction::Continue,
            },
            BrowseMode::NewSearch(input) => match self.handle_input_key(code, input) {
                Some(Some(term)) => self.apply(Action::AddSearch(term)),
                _ => BrowseAction::Continue,
            },
            BrowseMode::EditSearch { index, input } => {
                match self.handle_input_key(code, input) {
                    Some(Some(value)) => self.apply(Action::EditSearch { index, value }),
                    _ => BrowseAction::Continue,
                }
            }
        }
    }

    /// Shared line editing. `Some(Some(text))` on Enter, `Some(None)` on Esc,
    /// `None` while still typing.
    fn handle_input_key(&mut self, code: KeyCode, mut input: String) -> Option<Option<String>> {
        match code {
            KeyCode::Esc => {
                self.mode = BrowseMode::Normal;
                return Some(None);
            }
            KeyCode::Enter => {
                self.mode = BrowseMode::Normal;
                return Some(Some(input));
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            _ => return None,
        }
        self.mode = match &self.mode {
            BrowseMode::EditName(_) => BrowseMode::EditName(input),
            BrowseMode::NewSearch(_) => BrowseMode::NewSearch(input),
            BrowseMode::EditSearch { index, .. } => BrowseMode::EditSearch {
                index: *index,
                input,
            },
            BrowseMode::Normal => BrowseMode::Normal,
        };
        None
    }

    fn handle_normal_key(&mut self, code: KeyCode) -> BrowseAction {
        let view = self.derive();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return BrowseAction::Close,
            KeyCode::Tab => {
                self.focus = self.focus.next();
                self.selected_row = 0;
                self.selected_word = 0;
            }
            KeyCode::Down => {
                if self.selected_row + 1 < self.pane_len(&view) {
                    self.selected_row += 1;
                    self.selected_word = 0;
                }
            }
            KeyCode::Up => {
                if self.selected_row > 0 {
                    self.selected_row -= 1;
                    self.selected_word = 0;
                }
            }
            KeyCode::Right => {
                let words = self.selected_transaction(&view).map_or(0, |t| t.words().len());
                if self.selected_word + 1 < words {
                    self.selected_word += 1;
                }
            }
            KeyCode::Left => {
                self.selected_word = self.selected_word.saturating_sub(1);
            }
            KeyCode::Enter => {
                if self.focus == Pane::Summaries {
                    if self.selected_row < view.summaries.len() {
                        return self.apply(Action::PopGrouping(self.selected_row));
                    }
                } else if let Some(word) = self
                    .selected_transaction(&view)
                    .and_then(|t| t.words().get(self.selected_word).map(|w| w.to_string()))
                {
                    return self.apply(Action::AddWord(word));
                }
            }
            KeyCode::Char('n') => {
                self.mode = BrowseMode::EditName(self.state.name.clone());
            }
            KeyCode::Char('/') => {
                self.mode = BrowseMode::NewSearch(String::new());
            }
            KeyCode::Char('[') => {
                self.selected_search = self.selected_search.saturating_sub(1);
            }
            KeyCode::Char(']') => {
                if self.selected_search + 1 < self.state.searches.len() {
                    self.selected_search += 1;
                }
            }
            KeyCode::Char('e') => {
                if let Some(term) = self.state.searches.get(self.selected_search) {
                    self.mode = BrowseMode::EditSearch {
                        index: self.selected_search,
                        input: term.clone(),
                    };
                }
            }
            KeyCode::Char('x') => return self.apply(Action::ClearSearches),
            KeyCode::Char('+') => return self.apply(Action::Commit),
            _ => {}
        }
        BrowseAction::Continue
    }

    fn apply(&mut self, action: Action) -> BrowseAction {
        let before = self.state.groupings.clone();
        let current = std::mem::take(&mut self.state);
        self.state = state::update(current, action);
        self.status_message = self.state.notice.clone();

        self.selected_search = self
            .selected_search
            .min(self.state.searches.len().saturating_sub(1));
        let view = self.derive();
        self.selected_row = self.selected_row.min(self.pane_len(&view).saturating_sub(1));
        self.selected_word = 0;

        if self.state.groupings != before {
            BrowseAction::SaveGroupings
        } else {
            BrowseAction::Continue
        }
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    /// Draw the browser into the given frame. Callable from an external event loop.
    pub fn draw_frame(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let view = self.derive();

        let [title_area, chart_area, editor_area, panes_area, status_area, keys_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(CHART_HEIGHT),
                Constraint::Length(3),
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(area);

        frame.render_widget(
            Paragraph::new(format!("Groupings: {}", self.source)).style(HEADER_STYLE),
            title_area,
        );

        if self.state.transactions.is_none() {
            frame.render_widget(
                Paragraph::new("No transactions loaded.").style(FOOTER_STYLE),
                panes_area,
            );
            frame.render_widget(Paragraph::new("q:quit").style(FOOTER_STYLE), keys_area);
            return;
        }

        self.draw_chart(frame, chart_area, view.chart.as_ref());
        self.draw_editor(frame, editor_area, view.error.as_deref());

        let [left, middle, right] = Layout::horizontal([
            Constraint::Percentage(38),
            Constraint::Percentage(32),
            Constraint::Percentage(30),
        ])
        .areas(panes_area);
        self.draw_table(frame, left, Pane::Unfiltered, "Unfiltered", &view.unfiltered);
        match &view.filtered {
            Some(rows) => {
                let title = if self.state.name.is_empty() {
                    "Filtered".to_string()
                } else {
                    self.state.name.clone()
                };
                self.draw_table(frame, middle, Pane::Filtered, &title, rows);
            }
            None => frame.render_widget(
                Block::default().borders(Borders::ALL).title("Filtered"),
                middle,
            ),
        }
        self.draw_summaries(frame, right, &view.summaries);

        let rows = self.state.transactions.as_ref().map_or(0, Vec::len);
        let mut status = format!(
            "{} rows | {} unfiltered | {} groupings",
            rows,
            view.unfiltered.len(),
            self.state.groupings.len()
        );
        if let Some(ref msg) = self.status_message {
            status.push_str(" | ");
            status.push_str(msg);
        }
        frame.render_widget(Paragraph::new(status).style(FOOTER_STYLE), status_area);

        let keys = match &self.mode {
            BrowseMode::Normal => Paragraph::new(
                "tab:pane  \u{2191}/\u{2193}:row  \u{2190}/\u{2192}:word  enter:add/pop  n:name  /:search  [ ]:term  e:edit  x:clear  +:commit  q:quit",
            )
            .style(FOOTER_STYLE),
            BrowseMode::EditName(input) => Paragraph::new(format!("Name: {input}\u{2588}")),
            BrowseMode::NewSearch(input) => Paragraph::new(format!("New search: {input}\u{2588}")),
            BrowseMode::EditSearch { input, .. } => {
                Paragraph::new(format!("Edit search (empty removes): {input}\u{2588}"))
            }
        };
        frame.render_widget(keys, keys_area);
    }

    fn draw_chart(&self, frame: &mut Frame, area: Rect, chart: Option<&StackedChart>) {
        let block = Block::default().borders(Borders::ALL).title("Running total");
        let Some(chart) = chart else {
            frame.render_widget(block, area);
            return;
        };

        let series: Vec<(String, Vec<(f64, f64)>)> = chart
            .bands
            .iter()
            .map(|band| {
                let points = band
                    .top
                    .iter()
                    .enumerate()
                    .map(|(x, &v)| (x as f64, v))
                    .filter(|(_, v)| v.is_finite())
                    .collect();
                (band.name.clone(), points)
            })
            .collect();

        let (lo, hi) = chart
            .bands
            .iter()
            .flat_map(|band| band.bottom.iter().chain(&band.top))
            .filter(|v| v.is_finite())
            .fold((0.0_f64, 0.0_f64), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let last_x = chart.buckets.num_months().saturating_sub(1).max(1) as f64;
        let months = chart.buckets.month_starts();
        let first_label = months.first().map(|d| d.format("%Y-%m").to_string()).unwrap_or_default();
        let last_label = months.last().map(|d| d.format("%Y-%m").to_string()).unwrap_or_default();

        let datasets: Vec<Dataset> = series
            .iter()
            .map(|(name, points)| {
                Dataset::default()
                    .name(name.clone())
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(name_color(name).terminal()))
                    .data(points)
            })
            .collect();

        let widget = Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .bounds([0.0, last_x])
                    .labels(vec![Line::from(first_label), Line::from(last_label)])
                    .style(FOOTER_STYLE),
            )
            .y_axis(
                Axis::default()
                    .bounds([lo, if hi > lo { hi } else { lo + 1.0 }])
                    .labels(vec![Line::from(fmt::amount(lo)), Line::from(fmt::amount(hi))])
                    .style(FOOTER_STYLE),
            );
        frame.render_widget(widget, area);
    }

    fn draw_editor(&self, frame: &mut Frame, area: Rect, error: Option<&str>) {
        let name = if self.state.name.is_empty() {
            Span::styled("(enter on a word, or n)", FOOTER_STYLE)
        } else {
            Span::raw(self.state.name.clone())
        };
        let mut search_spans = vec![Span::raw("Search: ")];
        if self.state.searches.is_empty() {
            search_spans.push(Span::styled("(none)", FOOTER_STYLE));
        }
        for (i, term) in self.state.searches.iter().enumerate() {
            let style = if i == self.selected_search {
                SELECTED_STYLE
            } else {
                Style::default()
            };
            search_spans.push(Span::styled(format!("[{term}]"), style));
            search_spans.push(Span::raw(" "));
        }
        let lines = vec![
            Line::from(vec![Span::raw("Name:   "), name]),
            Line::from(search_spans),
            Line::from(Span::styled(error.unwrap_or_default().to_string(), ERROR_STYLE)),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_table(&mut self, frame: &mut Frame, area: Rect, pane: Pane, title: &str, rows: &[Transaction]) {
        let focused = self.focus == pane;
        let desc_width = area.width.saturating_sub(2 + 10 + 12 + 2) as usize;

        let rendered: Vec<Row> = rows
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let (desc_cell, height) = if focused && i == self.selected_row {
                    let mut spans = Vec::new();
                    for (w, word) in t.words().into_iter().enumerate() {
                        let style = if w == self.selected_word {
                            WORD_STYLE
                        } else {
                            Style::default()
                        };
                        spans.push(Span::styled(word.to_string(), style));
                        spans.push(Span::raw(" "));
                    }
                    (Cell::from(Line::from(spans)), 1)
                } else {
                    let (wrapped, lines) = tui::wrap_text(&t.description, desc_width.max(10));
                    (Cell::from(wrapped), lines)
                };
                Row::new(vec![
                    Cell::from(fmt::date(t.date)),
                    desc_cell,
                    Cell::from(Line::from(tui::amount_span(t.amount)).right_aligned()),
                ])
                .height(height)
            })
            .collect();

        let border_style = if focused {
            HEADER_STYLE
        } else {
            Style::default()
        };
        let table = Table::new(
            rendered,
            [Constraint::Length(10), Constraint::Fill(1), Constraint::Length(12)],
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(format!("{title} ({}) {}", rows.len(), fmt::amount(reports::net(rows)))),
        )
        .column_spacing(1)
        .row_highlight_style(SELECTED_STYLE);

        let state = &mut self.table_states[pane as usize];
        state.select(if focused { Some(self.selected_row) } else { None });
        frame.render_stateful_widget(table, area, state);
    }

    fn draw_summaries(&mut self, frame: &mut Frame, area: Rect, summaries: &[GroupSummary]) {
        let focused = self.focus == Pane::Summaries;
        let bar_cells = area.width.saturating_sub(2 + NAME_COL + AVG_COL + 2);

        let rendered: Vec<Row> = summaries
            .iter()
            .map(|s| {
                let color = Style::default().fg(name_color(&s.name).terminal());
                let offset = tui::scale_to_cells(s.bar_offset, self.options.bar_width, bar_cells);
                let width = tui::scale_to_cells(s.bar_width, self.options.bar_width, bar_cells);
                let bar = Line::from(vec![
                    Span::raw(" ".repeat(offset as usize)),
                    Span::styled("\u{2588}".repeat(width as usize), color),
                ]);
                Row::new(vec![
                    Cell::from(Span::styled(s.name.clone(), color.add_modifier(Modifier::BOLD))),
                    Cell::from(Line::from(tui::amount_span(s.monthly)).right_aligned()),
                    Cell::from(bar),
                ])
            })
            .collect();

        let border_style = if focused {
            HEADER_STYLE
        } else {
            Style::default()
        };
        let table = Table::new(
            rendered,
            [
                Constraint::Length(NAME_COL),
                Constraint::Length(AVG_COL),
                Constraint::Fill(1),
            ],
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title("Groupings (avg/month)"),
        )
        .column_spacing(1)
        .row_highlight_style(SELECTED_STYLE);

        let state = &mut self.table_states[Pane::Summaries as usize];
        state.select(if focused { Some(self.selected_row) } else { None });
        frame.render_stateful_widget(table, area, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Grouping;
    use chrono::NaiveDate;
    use ratatui::{backend::TestBackend, Terminal};

    fn txn(m: u32, desc: &str, amount: f64) -> Transaction {
        Transaction::new(NaiveDate::from_ymd_opt(2021, m, 1).unwrap(), desc, amount)
    }

    fn options() -> ViewOptions {
        ViewOptions {
            skip_groups: 0,
            floor: -1000.0,
            bar_width: 300.0,
        }
    }

    fn make_browser(groupings: Vec<Grouping>) -> GroupingBrowser {
        let rows = vec![
            txn(1, "Coffee Shop", -30.0),
            txn(1, "ICA Nara", -200.0),
            txn(2, "Rent", -8000.0),
        ];
        GroupingBrowser::new(AppState::new(Some(rows), groupings), "test".to_string(), options())
    }

    fn type_text(b: &mut GroupingBrowser, text: &str) {
        for c in text.chars() {
            b.handle_key_event(KeyCode::Char(c));
        }
    }

    #[test]
    fn test_q_closes() {
        let mut b = make_browser(vec![]);
        assert_eq!(b.handle_key_event(KeyCode::Char('q')), BrowseAction::Close);
    }

    #[test]
    fn test_enter_adds_selected_word() {
        let mut b = make_browser(vec![]);
        // Unfiltered is sorted by description: Coffee Shop, ICA Nara, Rent.
        b.handle_key_event(KeyCode::Down);
        b.handle_key_event(KeyCode::Right);
        assert_eq!(b.handle_key_event(KeyCode::Enter), BrowseAction::Continue);
        assert_eq!(b.state().searches, vec!["Nara".to_string()]);
        assert_eq!(b.state().name, "Nara");
    }

    #[test]
    fn test_word_cursor_stops_at_last_word() {
        let mut b = make_browser(vec![]);
        for _ in 0..5 {
            b.handle_key_event(KeyCode::Right);
        }
        b.handle_key_event(KeyCode::Enter);
        assert_eq!(b.state().searches, vec!["Shop".to_string()]);
    }

    #[test]
    fn test_commit_requests_save() {
        let mut b = make_browser(vec![]);
        b.handle_key_event(KeyCode::Enter);
        assert_eq!(b.handle_key_event(KeyCode::Char('+')), BrowseAction::SaveGroupings);
        assert_eq!(b.state().groupings, vec![Grouping::new("Coffee", vec!["Coffee".to_string()])]);
        assert!(b.state().searches.is_empty());
    }

    #[test]
    fn test_pop_from_summaries() {
        let mut b = make_browser(vec![Grouping::new("Food", vec!["ICA".to_string()])]);
        b.handle_key_event(KeyCode::Tab);
        b.handle_key_event(KeyCode::Tab);
        assert_eq!(b.handle_key_event(KeyCode::Enter), BrowseAction::SaveGroupings);
        assert!(b.state().groupings.is_empty());
        assert_eq!(b.state().name, "Food");
        assert_eq!(b.state().searches, vec!["ICA".to_string()]);
    }

    #[test]
    fn test_new_search_and_edit_to_empty() {
        let mut b = make_browser(vec![]);
        b.handle_key_event(KeyCode::Char('/'));
        type_text(&mut b, "Rent");
        b.handle_key_event(KeyCode::Enter);
        assert_eq!(b.state().searches, vec!["Rent".to_string()]);

        b.handle_key_event(KeyCode::Char('e'));
        for _ in 0..4 {
            b.handle_key_event(KeyCode::Backspace);
        }
        b.handle_key_event(KeyCode::Enter);
        assert!(b.state().searches.is_empty());
    }

    #[test]
    fn test_esc_cancels_name_edit() {
        let mut b = make_browser(vec![]);
        b.handle_key_event(KeyCode::Char('n'));
        type_text(&mut b, "Food");
        b.handle_key_event(KeyCode::Esc);
        assert!(b.state().name.is_empty());
        assert_eq!(b.mode, BrowseMode::Normal);
    }

    #[test]
    fn test_typing_q_in_input_does_not_close() {
        let mut b = make_browser(vec![]);
        b.handle_key_event(KeyCode::Char('n'));
        assert_eq!(b.handle_key_event(KeyCode::Char('q')), BrowseAction::Continue);
        b.handle_key_event(KeyCode::Enter);
        assert_eq!(b.state().name, "q");
    }

    #[test]
    fn test_invalid_search_shows_error_and_keeps_rows() {
        let mut b = make_browser(vec![]);
        b.handle_key_event(KeyCode::Char('/'));
        type_text(&mut b, "Coffee[");
        b.handle_key_event(KeyCode::Enter);
        let view = b.derive();
        assert!(view.filtered.is_none());
        assert_eq!(view.unfiltered.len(), 3);
        assert!(view.error.is_some());
    }

    #[test]
    fn test_broken_grouping_can_be_popped() {
        let mut b = make_browser(vec![
            Grouping::new("Food", vec!["ICA".to_string()]),
            Grouping::new("Bad", vec!["(oops".to_string()]),
        ]);
        let view = b.derive();
        assert!(view.error.is_some());
        assert_eq!(view.summaries.len(), 2);

        b.handle_key_event(KeyCode::Tab);
        b.handle_key_event(KeyCode::Tab);
        b.handle_key_event(KeyCode::Down);
        assert_eq!(b.handle_key_event(KeyCode::Enter), BrowseAction::SaveGroupings);
        assert_eq!(b.state().groupings, vec![Grouping::new("Food", vec!["ICA".to_string()])]);
        assert_eq!(b.state().name, "Bad");
        assert_eq!(b.state().searches, vec!["(oops".to_string()]);
        assert_eq!(b.derive().summaries.len(), 1);
    }

    #[test]
    fn test_draw_frame_renders() {
        let mut b = make_browser(vec![
            Grouping::new("Food", vec!["ICA".to_string(), "Coffee".to_string()]),
            Grouping::new("Rent", vec!["Rent".to_string()]),
        ]);
        b.handle_key_event(KeyCode::Char('/'));
        type_text(&mut b, "Shop");
        b.handle_key_event(KeyCode::Enter);

        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|frame| b.draw_frame(frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Groupings"));
        assert!(text.contains("Running total"));
        assert!(text.contains("[Shop]"));
    }

    #[test]
    fn test_draw_without_data() {
        let mut b = GroupingBrowser::new(AppState::default(), "empty".to_string(), options());
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| b.draw_frame(frame)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("No transactions loaded."));
    }
}
