use ratatui::{
    buffer::Buffer,
    layout::Flex,
    layout::{Alignment, Layout, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Widget},
};

static TEXT: &[&str] = &[
    "h, LEFT         Move cursor back one day\n",
    "l, RIGHT        Move cursor ahead one day\n",
    "k, UP           Move cursor back one week\n",
    "j, DOWN         Move cursor ahead one week\n",
    "[, PAGE UP      Show the previous month\n",
    "], PAGE DOWN    Show the next month\n",
    "t, HOME         Jump to today\n",
    "ENTER, SPACE    Select the day under the cursor\n",
    "1-9, 0          Select a preset\n",
    "a               Apply the pending selection\n",
    "r               Clear the selection\n",
    "/               Type a date or range\n",
    "?               Show this help\n",
    "ESC             Cancel the selection, or quit\n",
    "q               Quit\n",
    "\n",
    "Click a day to select it; drag sideways to\n",
    "change months.\n",
    "\n",
    "Press the Any Key to dismiss.\n",
];

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help(pub(crate) Style);

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = TEXT.iter().map(|&s| Line::raw(s)).collect::<Vec<_>>();
        let text = Text::from(lines);
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .min(area.height)
            .saturating_add(2);
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .min(area.width)
            .saturating_add(2);
        let para = Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(" Commands ")
                    .title_alignment(Alignment::Center),
            )
            .style(self.0);
        let [help_area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let [help_area] = Layout::vertical([height])
            .flex(Flex::Center)
            .areas(help_area);
        let outer_area = Rect {
            x: help_area.x.saturating_sub(1),
            y: help_area.y,
            width: help_area.width.saturating_add(2),
            height: help_area.height,
        };
        Clear.render(outer_area, buf);
        Block::new().style(self.0).render(outer_area, buf);
        para.render(help_area, buf);
    }
}
