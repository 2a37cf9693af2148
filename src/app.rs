//! Interactive screen: the entry form, the history table with inline
//! editing, and the charts panel.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::backend::Backend;
use crate::editor::{delete_record, EditSession, EditTransition, ALREADY_EDITING_MESSAGE};
use crate::error::FuelError;
use crate::fmt::money;
use crate::form::{today, EntryForm, FormField};
use crate::history::{
    fetch_history, render_history, CellView, FetchResult, HistoryView, RowActions, RowView,
};
use crate::models::RecordId;
use crate::router::{Router, View, ViewEffect};
use crate::tui::{
    Screen, ScreenAction, ERROR_STYLE, FOOTER_STYLE, HEADER_STYLE, INPUT_STYLE, READ_ONLY_STYLE,
    SELECTED_STYLE, STATUS_STYLE,
};

/// Bars shown on the charts panel.
const CHART_BARS: usize = 12;

enum Mode {
    Normal,
    ConfirmDelete(RecordId),
}

pub struct App<'a> {
    backend: &'a dyn Backend,
    router: Router,
    form: EntryForm,
    session: EditSession,
    fetched: FetchResult,
    history: HistoryView,
    selected: usize,
    mode: Mode,
    status_message: Option<String>,
    table_state: TableState,
}

fn describe_error(context: &str, e: &FuelError) -> String {
    match e {
        FuelError::Validation(_) | FuelError::EditRejected(_) | FuelError::NotEditable(_) => {
            e.to_string()
        }
        _ => format!("{context}: {e}"),
    }
}

impl<'a> App<'a> {
    /// Build the app and open the history view, which loads it.
    pub fn new(backend: &'a dyn Backend) -> Self {
        let mut app = Self {
            backend,
            router: Router::default(),
            form: EntryForm::new(&today()),
            session: EditSession::default(),
            fetched: Ok(Vec::new()),
            history: HistoryView::Rows(Vec::new()),
            selected: 0,
            mode: Mode::Normal,
            status_message: None,
            table_state: TableState::default(),
        };
        app.show(View::History);
        app
    }

    pub fn show(&mut self, view: View) {
        match self.router.show(view) {
            ViewEffect::ReloadHistory => self.reload(),
            ViewEffect::ResetDate => self.form.reset_date(&today()),
        }
    }

    /// Refetch from the backend and re-render every row.
    pub fn reload(&mut self) {
        self.fetched = fetch_history(self.backend);
        self.rerender();
        if !self.session.retain_visible(self.history.rows()) {
            self.rerender();
        }
        let len = self.history.rows().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    fn rerender(&mut self) {
        self.history = render_history(&self.fetched, &self.session);
    }

    fn selected_row(&self) -> Option<RowView> {
        self.history.rows().get(self.selected).cloned()
    }

    fn set_status(&mut self, msg: String) {
        self.status_message = Some(msg);
    }

    fn apply(&mut self, transition: EditTransition) {
        match transition {
            EditTransition::Editing(id) => {
                self.rerender();
                self.set_status(format!("Editing record {id}"));
            }
            EditTransition::Viewing { reload: true } => self.reload(),
            EditTransition::Viewing { reload: false } => self.rerender(),
        }
    }

    fn edit_selected(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        match self.session.toggle(&row) {
            Ok(transition) => self.apply(transition),
            Err(e) => self.set_status(describe_error("Edit failed", &e)),
        }
    }

    fn save_edit(&mut self) {
        match self.session.save(self.backend) {
            Ok(transition) => {
                self.apply(transition);
                self.set_status("Record updated".into());
            }
            Err(e) => {
                self.rerender();
                self.set_status(describe_error("Update failed", &e));
            }
        }
    }

    fn request_delete(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        if !row.is_editable() {
            self.set_status(FuelError::NotEditable(row.id.to_string()).to_string());
        } else if self.session.is_editing() {
            self.set_status(ALREADY_EDITING_MESSAGE.to_string());
        } else {
            self.mode = Mode::ConfirmDelete(row.id);
        }
    }

    fn confirm_delete(&mut self, id: &RecordId) {
        let Some(row) = self.history.row(id).cloned() else {
            return;
        };
        match delete_record(self.backend, &self.session, &row) {
            Ok(()) => {
                self.reload();
                self.set_status(format!("Deleted record {id}"));
            }
            Err(e) => self.set_status(describe_error("Delete failed", &e)),
        }
    }

    fn submit_form(&mut self) {
        match self.form.submit(self.backend, self.router.active(), &today()) {
            Ok(outcome) => {
                if outcome.reload_history {
                    self.reload();
                }
                self.set_status(format!(
                    "Saved: {} km, {:.3} l at {:.3}",
                    outcome.record.task_name, outcome.record.litros, outcome.record.precio
                ));
            }
            Err(e) => self.set_status(describe_error("Save failed", &e)),
        }
    }

    fn move_selection(&mut self, down: bool) {
        let len = self.history.rows().len();
        if down {
            if self.selected + 1 < len {
                self.selected += 1;
            }
        } else {
            self.selected = self.selected.saturating_sub(1);
        }
    }

    fn handle_view_key(&mut self, code: KeyCode) -> bool {
        let view = match code {
            KeyCode::F(1) => View::Entry,
            KeyCode::F(2) => View::History,
            KeyCode::F(3) => View::Charts,
            _ => return false,
        };
        self.show(view);
        true
    }

    fn handle_entry_key(&mut self, code: KeyCode) -> ScreenAction {
        match code {
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_prev(),
            KeyCode::Char(c) => self.form.push_char(c),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Esc => self.show(View::History),
            _ => {}
        }
        ScreenAction::Continue
    }

    fn handle_editing_key(&mut self, key: KeyEvent) -> ScreenAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('e') if ctrl => self.edit_selected(),
            KeyCode::Char('d') if ctrl => self.request_delete(),
            KeyCode::Enter => self.save_edit(),
            KeyCode::Esc => {
                let transition = self.session.cancel();
                self.apply(transition);
            }
            KeyCode::Up => self.move_selection(false),
            KeyCode::Down => self.move_selection(true),
            _ => {
                if let Some(draft) = self.session.draft_mut() {
                    match key.code {
                        KeyCode::Tab => draft.focus_next(),
                        KeyCode::BackTab => draft.focus_prev(),
                        KeyCode::Char(c) => draft.push_char(c),
                        KeyCode::Backspace => draft.backspace(),
                        _ => {}
                    }
                }
                self.rerender();
            }
        }
        ScreenAction::Continue
    }

    fn handle_list_key(&mut self, code: KeyCode) -> ScreenAction {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return ScreenAction::Quit,
            KeyCode::Char('1') => self.show(View::Entry),
            KeyCode::Char('2') => self.show(View::History),
            KeyCode::Char('3') => self.show(View::Charts),
            KeyCode::Tab => {
                let next = self.router.next();
                self.show(next);
            }
            _ if self.router.active() != View::History => {}
            KeyCode::Up => self.move_selection(false),
            KeyCode::Down => self.move_selection(true),
            KeyCode::Char('e') | KeyCode::Enter => self.edit_selected(),
            KeyCode::Char('d') => self.request_delete(),
            KeyCode::Char('r') => self.reload(),
            _ => {}
        }
        ScreenAction::Continue
    }

    fn handle_confirm_key(&mut self, code: KeyCode, id: RecordId) -> ScreenAction {
        match code {
            KeyCode::Char('y') => {
                self.mode = Mode::Normal;
                self.confirm_delete(&id);
            }
            KeyCode::Char('n') | KeyCode::Esc => self.mode = Mode::Normal,
            _ => {}
        }
        ScreenAction::Continue
    }

    fn draw_nav(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(" Fuel log  ", HEADER_STYLE)];
        for (i, view) in View::ALL.iter().enumerate() {
            let label = format!(" F{} {} ", i + 1, view.title());
            let style = if *view == self.router.active() {
                SELECTED_STYLE
            } else {
                FOOTER_STYLE
            };
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_entry(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                " New fill-up",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        for field in FormField::ORDER {
            let is_focused = field == self.form.focused();
            let invalid = self.form.errors().has(field.column());
            let label_style = if is_focused {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let value_style = if invalid {
                ERROR_STYLE
            } else if is_focused {
                INPUT_STYLE
            } else {
                Style::default()
            };
            let cursor = if is_focused { "_" } else { "" };
            lines.push(Line::from(vec![
                Span::styled(format!("   {:<14} ", field.label()), label_style),
                Span::styled(format!("{}{cursor}", self.form.value(field)), value_style),
            ]));
        }

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_history(&mut self, frame: &mut Frame, area: Rect) {
        let rows = match &self.history {
            HistoryView::Error(msg) => {
                frame.render_widget(
                    Paragraph::new(format!(" {msg}")).style(ERROR_STYLE),
                    area,
                );
                return;
            }
            HistoryView::Rows(rows) => rows,
        };
        if rows.is_empty() {
            frame.render_widget(
                Paragraph::new(" No fill-ups yet. Press F1 to add one."),
                area,
            );
            return;
        }

        let table_rows: Vec<Row> = rows
            .iter()
            .map(|row| {
                let mut cells: Vec<Cell> = row
                    .cells
                    .iter()
                    .map(|cell| match cell {
                        CellView::Display { text, .. } => Cell::from(text.clone()),
                        CellView::Input(input) => {
                            let cursor = if input.focused { "\u{2588}" } else { "" };
                            let style = if input.invalid { ERROR_STYLE } else { INPUT_STYLE };
                            Cell::from(Span::styled(format!("[{}{cursor}]", input.value), style))
                        }
                    })
                    .collect();
                cells.push(Cell::from(row.total.clone()));
                cells.push(match row.actions {
                    RowActions::EditDelete => Cell::from("e:edit d:delete"),
                    RowActions::SaveCancel => {
                        Cell::from(Span::styled("Enter:save Esc:cancel", STATUS_STYLE))
                    }
                    RowActions::ReadOnly => Cell::from(Span::styled("read-only", READ_ONLY_STYLE)),
                });
                Row::new(cells)
            })
            .collect();

        let widths = [
            Constraint::Length(14),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Fill(1),
        ];
        let header = Row::new(vec!["Date", "Km", "Liters", "Price", "Total", "Actions"])
            .style(HEADER_STYLE)
            .bottom_margin(1);

        self.table_state.select(Some(self.selected));
        let table = Table::new(table_rows, widths)
            .header(header)
            .column_spacing(1)
            .row_highlight_style(SELECTED_STYLE);
        frame.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn draw_charts(&self, frame: &mut Frame, area: Rect) {
        let records = match &self.fetched {
            Ok(records) if !records.is_empty() => records,
            _ => {
                frame.render_widget(Paragraph::new(" No data to chart yet."), area);
                return;
            }
        };

        // oldest on the left
        let bars: Vec<Bar> = records
            .iter()
            .take(CHART_BARS)
            .rev()
            .map(|r| {
                let total = r.litros.unwrap_or(0.0) * r.precio.unwrap_or(0.0);
                let label = r
                    .task_date
                    .as_deref()
                    .map(|d| d.get(5..).unwrap_or(d).to_string())
                    .unwrap_or_else(|| "-".to_string());
                Bar::default()
                    .value(total.max(0.0).round() as u64)
                    .label(Line::from(label))
                    .text_value(money(total))
            })
            .collect();

        let block = Block::default()
            .title("Cost per fill-up")
            .title_style(Style::default().add_modifier(Modifier::BOLD))
            .borders(Borders::ALL);
        let chart = BarChart::default()
            .block(block)
            .bar_width(9)
            .bar_gap(1)
            .bar_style(INPUT_STYLE)
            .data(BarGroup::default().bars(&bars));
        frame.render_widget(chart, area);
    }

    fn hints(&self) -> &'static str {
        if let Mode::ConfirmDelete(_) = self.mode {
            return " y=confirm  n=cancel";
        }
        match self.router.active() {
            View::Entry => " Tab=next field  Enter=save  Esc=history  F1-F3=views",
            View::History if self.session.is_editing() => {
                " Tab=next field  Enter=save  Esc=cancel  Ctrl-E=edit selected  Up/Down=select"
            }
            View::History => " Up/Down=select  e=edit  d=delete  r=reload  1-3=views  q=quit",
            View::Charts => " 1-3=views  Tab=next view  q=quit",
        }
    }
}

impl Screen for App<'_> {
    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let [nav_area, sep, content_area, status_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        self.draw_nav(frame, nav_area);
        let sep_line = "\u{2501}".repeat(area.width as usize);
        frame.render_widget(Paragraph::new(sep_line).style(FOOTER_STYLE), sep);

        match self.router.active() {
            View::Entry => self.draw_entry(frame, content_area),
            View::History => self.draw_history(frame, content_area),
            View::Charts => self.draw_charts(frame, content_area),
        }

        if let Mode::ConfirmDelete(id) = &self.mode {
            frame.render_widget(
                Paragraph::new(format!(" Delete record {id}? This cannot be undone. (y/n)"))
                    .style(STATUS_STYLE),
                status_area,
            );
        } else if let Some(msg) = &self.status_message {
            frame.render_widget(Paragraph::new(format!(" {msg}")).style(STATUS_STYLE), status_area);
        }

        frame.render_widget(Paragraph::new(self.hints()).style(FOOTER_STYLE), hints_area);
    }

    fn handle_key(&mut self, key: KeyEvent) -> ScreenAction {
        self.status_message = None;

        if let Mode::ConfirmDelete(id) = &self.mode {
            let id = id.clone();
            return self.handle_confirm_key(key.code, id);
        }
        if self.handle_view_key(key.code) {
            return ScreenAction::Continue;
        }

        match self.router.active() {
            View::Entry => self.handle_entry_key(key.code),
            View::History if self.session.is_editing() => self.handle_editing_key(key),
            View::History | View::Charts => self.handle_list_key(key.code),
        }
    }
}
