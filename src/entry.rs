use crate::theme::{
    entry::{PLACEHOLDER_STYLE, READY_ENTER_STYLE},
    BASE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Clear, StatefulWidget, Widget},
};

const OUTER_HEIGHT: u16 = 8;

/// Columns around the typed text: margin, border, and padding on each side
const FRAME_WIDTH: u16 = 6;

const MIN_TEXT_WIDTH: u16 = 12;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Entry;

impl StatefulWidget for Entry {
    type State = EntryState;

    /*
     * ...........................
     * .┌──── Enter Date… ──────┐.
     * .│                       │.
     * .│ yyyy-mm-dd - yyyy-... │.
     * .│                       │.
     * .│        [ENTER]        │.
     * .└───────────────────────┘.
     * ...........................
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let text_width = state.text_width();
        let [outer_area] = Layout::horizontal([text_width.saturating_add(FRAME_WIDTH)])
            .flex(Flex::Center)
            .areas(area);
        let [outer_area] = Layout::vertical([OUTER_HEIGHT])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        Block::bordered()
            .title(" Enter Date… ")
            .title_alignment(Alignment::Center)
            .render(block_area, buf);
        let text_area = block_area.inner(Margin::new(1, 1));
        state.to_text(text_area.width).render(text_area, buf);
    }
}

/// Text typed into the entry overlay, with the layout it is expected in
/// shown until something is typed
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct EntryState {
    text: String,
    placeholder: String,
}

impl EntryState {
    pub(crate) fn new<S: Into<String>>(placeholder: S) -> EntryState {
        EntryState {
            text: String::new(),
            placeholder: placeholder.into(),
        }
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    fn text_width(&self) -> u16 {
        let chars = self.placeholder.chars().count().max(self.text.chars().count());
        u16::try_from(chars)
            .unwrap_or(u16::MAX)
            .max(MIN_TEXT_WIDTH)
    }

    fn to_text(&self, width: u16) -> Text<'static> {
        Text::from_iter([
            Line::styled("", BASE_STYLE),
            self.to_line(usize::from(width)),
            Line::styled("", BASE_STYLE),
            // Style a span and convert it to a line rather than creating a
            // styled line directly so that only the "[ENTER]" text and not any
            // of its centering padding will be underlined:
            Line::from(Span::styled(
                "[ENTER]",
                if self.text.trim().is_empty() {
                    BASE_STYLE
                } else {
                    READY_ENTER_STYLE
                },
            )),
        ])
        .centered()
    }

    fn to_line(&self, width: usize) -> Line<'static> {
        if self.text.is_empty() {
            return Line::from(Span::styled(self.placeholder.clone(), PLACEHOLDER_STYLE));
        }
        // Keep the end of overlong input, where typing happens, in view
        let skip = self.text.chars().count().saturating_sub(width);
        Line::from(Span::styled(
            self.text.chars().skip(skip).collect::<String>(),
            BASE_STYLE,
        ))
    }

    pub(crate) fn handle_input(&mut self, input: EntryInput) -> EntryOutput {
        match input {
            EntryInput::Char(c) if !c.is_control() => {
                self.text.push(c);
                EntryOutput::Ok
            }
            EntryInput::Backspace => {
                if self.text.pop().is_some() {
                    EntryOutput::Ok
                } else {
                    EntryOutput::Invalid
                }
            }
            EntryInput::Clear => {
                self.text.clear();
                EntryOutput::Ok
            }
            EntryInput::Enter if !self.text.trim().is_empty() => {
                EntryOutput::Submit(self.text.clone())
            }
            _ => EntryOutput::Invalid,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum EntryInput {
    Char(char),
    Backspace,
    Clear,
    Enter,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum EntryOutput {
    Ok,
    Invalid,
    Submit(String),
}
