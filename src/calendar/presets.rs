use super::HitMap;
use crate::theme::{
    presets::{ACTIVE_STYLE, KEY_STYLE},
    BASE_STYLE,
};
use rangepick::presets::ResolvedPreset;
use ratatui::{prelude::*, widgets::*};
use time::Date;

/// Width of the preset column, including its border
pub(crate) const PRESETS_WIDTH: u16 = 19;

/// Keys that select the first ten presets
pub(crate) const PRESET_KEYS: [char; 10] = ['1', '2', '3', '4', '5', '6', '7', '8', '9', '0'];

/// The preset ranges in a bordered column, the active one highlighted
#[derive(Clone, Copy, Debug)]
pub(crate) struct PresetList<'a> {
    presets: &'a [ResolvedPreset<Date>],
    active: Option<usize>,
}

impl<'a> PresetList<'a> {
    pub(crate) fn new(presets: &'a [ResolvedPreset<Date>], active: Option<usize>) -> Self {
        PresetList { presets, active }
    }
}

impl StatefulWidget for PresetList<'_> {
    type State = HitMap;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let block = Block::bordered().title(" Presets ").style(BASE_STYLE);
        let inner = block.inner(area);
        block.render(area, buf);
        for (i, (row, preset)) in (inner.top()..inner.bottom())
            .zip(self.presets)
            .enumerate()
        {
            let key = PRESET_KEYS.get(i).copied().unwrap_or(' ');
            let style = if self.active == Some(i) {
                ACTIVE_STYLE
            } else {
                BASE_STYLE
            };
            let line = Line::from_iter([
                Span::styled(format!("{key} "), KEY_STYLE),
                Span::styled(preset.label.as_str(), style),
            ]);
            let row_area = Rect::new(inner.x, row, inner.width, 1);
            line.render(row_area, buf);
            state.add_preset(row_area, i);
        }
    }
}
