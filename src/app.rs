use crate::calendar::{
    Calendar, HitMap, PickerStyler, PresetList, MONTH_GAP, MONTH_HEIGHT, MONTH_WIDTH,
    PRESETS_WIDTH, PRESET_KEYS,
};
use crate::entry::{Entry, EntryInput, EntryOutput, EntryState};
use crate::help::Help;
use crate::theme::{BASE_STYLE, DRAFT_STYLE, STATUS_STYLE};
use crossterm::event::{
    read, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use rangepick::adapter::{DateAdapter, TimeAdapter};
use rangepick::gesture::TouchSample;
use rangepick::model::ModelValue;
use rangepick::picker::{DateRangePicker, PickerEvent};
use rangepick::selection::Phase;
use rangepick::viewport::{Breakpoint, LayoutTier};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use std::time::Instant;
use time::Date;

/// Approximate size of a terminal cell in pixels, for swipe thresholds
const CELL_WIDTH_PX: f64 = 8.0;
const CELL_HEIGHT_PX: f64 = 16.0;

#[derive(Debug)]
pub(crate) struct App {
    picker: DateRangePicker<TimeAdapter>,
    cursor: Date,
    state: AppState,
    hits: HitMap,
    /// Day under the pointer when the left button went down
    pressed: Option<Date>,
}

impl App {
    pub(crate) fn new(picker: DateRangePicker<TimeAdapter>) -> App {
        let cursor = picker
            .selection_start()
            .unwrap_or_else(|| picker.adapter().today());
        App {
            picker,
            cursor,
            state: AppState::Calendar,
            hits: HitMap::new(),
            pressed: None,
        }
    }

    /// Runs until the user quits, returning the committed value as text
    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<String> {
        let started = Instant::now();
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input(started)?;
        }
        Ok(self.picker.display_text())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self, started: Instant) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        let event = read()?;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = event.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        } else if let Event::Mouse(mouse) = event {
            let time_ms = started.elapsed().as_secs_f64() * 1000.0;
            if !self.handle_mouse(mouse, time_ms) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.move_cursor(-1),
                KeyCode::Char('l') | KeyCode::Right => self.move_cursor(1),
                KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-7),
                KeyCode::Char('j') | KeyCode::Down => self.move_cursor(7),
                KeyCode::Char('[') | KeyCode::PageUp => self.page(-1),
                KeyCode::Char(']') | KeyCode::PageDown => self.page(1),
                KeyCode::Char('t') | KeyCode::Home => {
                    let today = self.picker.adapter().today();
                    self.focus(today)
                }
                KeyCode::Enter | KeyCode::Char(' ') => {
                    let events = self.picker.select_date(self.cursor);
                    self.handle_events(events)
                }
                KeyCode::Char('a') => {
                    let events = self.picker.apply();
                    self.handle_events(events)
                }
                KeyCode::Char('r') => {
                    self.picker.reset();
                    let cleared = if self.picker.is_range() {
                        ModelValue::Dates(Vec::new())
                    } else {
                        ModelValue::Empty
                    };
                    self.picker.set_value(cleared);
                    true
                }
                KeyCode::Char(c) if PRESET_KEYS.contains(&c) => {
                    match PRESET_KEYS.iter().position(|&k| k == c) {
                        Some(index) if self.picker.show_presets() => self.select_preset(index),
                        _ => false,
                    }
                }
                KeyCode::Char('/') => {
                    self.state = AppState::Entering(EntryState::new(self.placeholder()));
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                KeyCode::Esc => {
                    if self.picker.phase() == Phase::StartSelected
                        || self.picker.pending().is_some()
                    {
                        let events = self.picker.cancel();
                        self.handle_events(events)
                    } else {
                        self.state = AppState::Quitting;
                        true
                    }
                }
                KeyCode::Char('q') => {
                    self.state = AppState::Quitting;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Entering(state) => {
                if key == KeyCode::Esc {
                    self.state = AppState::Calendar;
                    return true;
                }
                let output = match key {
                    KeyCode::Char(c) => state.handle_input(EntryInput::Char(c)),
                    KeyCode::Backspace => state.handle_input(EntryInput::Backspace),
                    KeyCode::Delete => state.handle_input(EntryInput::Clear),
                    KeyCode::Enter => state.handle_input(EntryInput::Enter),
                    _ => EntryOutput::Invalid,
                };
                match output {
                    EntryOutput::Ok => true,
                    EntryOutput::Invalid => false,
                    EntryOutput::Submit(text) => self.submit_text(&text),
                }
            }
            AppState::Quitting => false,
        }
    }

    // Returns `false` if the event could not be acted on
    fn handle_mouse(&mut self, event: MouseEvent, time_ms: f64) -> bool {
        if self.state != AppState::Calendar {
            return true;
        }
        let date = self.hits.date_at(event.column, event.row);
        let sample = TouchSample::new(
            f64::from(event.column) * CELL_WIDTH_PX,
            f64::from(event.row) * CELL_HEIGHT_PX,
            time_ms,
        );
        match event.kind {
            MouseEventKind::Moved => {
                self.picker.set_hovered(date);
                true
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.pressed = date;
                self.picker.touch_start(sample);
                true
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.picker.touch_move(sample);
                self.picker.set_hovered(date);
                true
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let pressed = self.pressed.take();
                if self.picker.touch_end(sample).is_some() {
                    return true;
                }
                if let Some(index) = self.hits.preset_at(event.column, event.row) {
                    return self.select_preset(index);
                }
                match (pressed, date) {
                    (Some(down), Some(up)) if down == up => {
                        self.cursor = up;
                        let events = self.picker.select_date(up);
                        self.handle_events(events)
                    }
                    _ => true,
                }
            }
            MouseEventKind::ScrollUp => self.picker.previous(),
            MouseEventKind::ScrollDown => self.picker.next(),
            _ => true,
        }
    }

    /// Acts as the picker's host: committed values are stored back into it
    fn handle_events(&mut self, events: Vec<PickerEvent<Date>>) -> bool {
        if events.is_empty() {
            return false;
        }
        for event in events {
            match event {
                PickerEvent::Update(value) => {
                    tracing::info!(?value, "selection committed");
                    self.picker.set_value(value);
                }
                PickerEvent::Apply => {
                    tracing::info!("selection applied");
                    self.state = AppState::Quitting;
                }
                other => tracing::debug!(event = ?other, "picker event"),
            }
        }
        true
    }

    fn select_preset(&mut self, index: usize) -> bool {
        let events = self.picker.select_preset(index);
        if let Some(start) = self.picker.selection_start() {
            self.cursor = start;
        }
        self.handle_events(events)
    }

    fn submit_text(&mut self, text: &str) -> bool {
        let value = self.picker.parse_text(text);
        if value.is_empty() {
            tracing::debug!(text, "unparsable date entry");
            return false;
        }
        tracing::info!(?value, "value entered");
        self.picker.set_value(value);
        if let Some(start) = self.picker.selection_start() {
            self.cursor = start;
        }
        self.state = AppState::Calendar;
        true
    }

    fn placeholder(&self) -> String {
        let pattern = self.picker.input_format().pattern();
        if self.picker.is_range() {
            format!("{pattern}{}{pattern}", self.picker.separator())
        } else {
            pattern.to_owned()
        }
    }

    fn move_cursor(&mut self, days: i64) -> bool {
        let target = self.picker.adapter().add_days(self.cursor, days);
        self.focus(target)
    }

    fn page(&mut self, months: i32) -> bool {
        if !self.picker.move_by(months) {
            return false;
        }
        self.cursor = self.picker.adapter().add_months(self.cursor, months);
        self.picker.set_hovered(Some(self.cursor));
        true
    }

    /// Moves the cursor to `target`, scrolling the window if needed.  Fails
    /// if the window cannot be scrolled to show it.
    fn focus(&mut self, target: Date) -> bool {
        if !self.picker.is_visible(target) {
            let anchor = self.picker.anchor();
            let step = if target > self.cursor { 1 } else { -1 };
            if !(self.picker.move_by(step) && self.picker.is_visible(target)) {
                self.picker.set_anchor(Some(target));
            }
            if !self.picker.is_visible(target) {
                self.picker.set_anchor(Some(anchor));
                return false;
            }
        }
        self.cursor = target;
        self.picker.set_hovered(Some(target));
        true
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn status_line(&self) -> Line<'static> {
        let mut spans = Vec::new();
        let committed = self.picker.display_text();
        if committed.is_empty() {
            spans.push(Span::styled("No selection", STATUS_STYLE));
        } else {
            spans.push(Span::styled(committed, BASE_STYLE));
        }
        if let Some(pending) = self.picker.pending() {
            let draft = self.picker.format_value(pending);
            spans.push(Span::styled(format!("  Draft: {draft} (a to apply)"), DRAFT_STYLE));
        } else if self.picker.phase() == Phase::StartSelected {
            spans.push(Span::styled("  Pick the end date", DRAFT_STYLE));
        }
        spans.push(Span::styled("  ? for help", STATUS_STYLE));
        Line::from(spans)
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        self.picker.set_breakpoint(breakpoint_for_width(area.width));
        let [main_area, status_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
        let main_area = if self.picker.is_fullscreen() {
            main_area
        } else {
            let block = Block::bordered().title(" rangepick ").style(BASE_STYLE);
            let inner = block.inner(main_area);
            block.render(main_area, buf);
            inner
        };
        self.hits.clear();
        let calendar_area = if self.picker.show_presets() {
            let [presets_area, calendar_area] =
                Layout::horizontal([Constraint::Length(PRESETS_WIDTH), Constraint::Min(0)])
                    .areas(main_area);
            let presets = self.picker.resolved_presets();
            PresetList::new(&presets, self.picker.active_preset_index()).render(
                presets_area,
                buf,
                &mut self.hits,
            );
            calendar_area
        } else {
            main_area
        };
        let [calendar_area] = Layout::vertical([MONTH_HEIGHT])
            .flex(Flex::Center)
            .areas(calendar_area);
        let months = self.picker.month_views();
        let styler = PickerStyler::new(&self.picker).cursor(self.cursor);
        Calendar::new(&months, &styler)
            .navigation(self.picker.can_go_prev(), self.picker.can_go_next())
            .render(calendar_area, buf, &mut self.hits);
        self.status_line().render(status_area, buf);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        } else if let AppState::Entering(ref mut state) = self.state {
            Entry.render(area, buf, state);
        }
    }
}

/// Picks a layout tier from the number of columns available
fn breakpoint_for_width(width: u16) -> Breakpoint {
    let month = MONTH_WIDTH + MONTH_GAP;
    let tier = match width.saturating_sub(PRESETS_WIDTH + 2) / month {
        0 => LayoutTier::Xs,
        1 => LayoutTier::Sm,
        2 => LayoutTier::Md,
        3 => LayoutTier::Lg,
        4 => LayoutTier::Xl,
        _ => LayoutTier::Xxl,
    };
    Breakpoint::new(tier)
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Entering(EntryState),
    Quitting,
}
