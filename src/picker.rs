//! The picker as a whole
//!
//! [`DateRangePicker`] owns one of each component and is what a renderer
//! talks to.  It never stores a committed selection on its own: committed
//! values are handed back to the host as [`PickerEvent::Update`], and the
//! host answers with [`DateRangePicker::set_value`] once it has adopted
//! them.
use crate::adapter::DateAdapter;
use crate::config::{ConfigError, FullscreenMode, PickerOptions};
use crate::gesture::{GestureInterpreter, MoveFeedback, NavCommand, TouchSample};
use crate::hover::{HoverPreview, PreviewRange};
use crate::model::{DatePair, ModelValue, RangeBoundary};
use crate::presets::{PresetSet, ResolvedPreset};
use crate::selection::{Outcome, Phase, SelectionMachine, SelectionRules};
use crate::text::{
    format_display_value, parse_input_value, DisplayFormat, FormatOptions, InputFormat,
    ParseOptions,
};
use crate::viewport::{Breakpoint, MonthDescriptor, MonthWindow};

/// Notifications for the host
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PickerEvent<D> {
    /// A new committed model value
    Update(ModelValue<D>),
    /// A buffered selection awaiting [`DateRangePicker::apply`]
    Draft(ModelValue<D>),
    /// The user confirmed the selection
    Apply,
    /// The user abandoned the selection
    Cancel,
    RangeStart(D),
    RangeEnd(D),
}

#[derive(Debug)]
pub struct DateRangePicker<A: DateAdapter> {
    adapter: A,
    value: ModelValue<A::Date>,
    selection: SelectionMachine<A>,
    window: MonthWindow<A>,
    hover: HoverPreview<A::Date>,
    presets: PresetSet<A>,
    gesture: GestureInterpreter,
    separator: String,
    input_format: InputFormat,
    display_format: DisplayFormat<A::Date>,
    fullscreen: FullscreenMode,
    swipeable: bool,
    show_presets: bool,
}

impl<A: DateAdapter + Clone + 'static> DateRangePicker<A> {
    pub fn new(adapter: A, options: PickerOptions<A>) -> Result<Self, ConfigError> {
        options.validate(&adapter)?;
        let PickerOptions {
            range,
            months,
            auto_apply,
            min,
            max,
            allowed_dates,
            separator,
            input_format,
            display_format,
            fullscreen,
            swipeable,
            swipe,
            presets,
            show_presets,
        } = options;
        let selection = SelectionMachine::new(
            adapter.clone(),
            SelectionRules {
                range,
                auto_apply,
                min,
                max,
                allowed_dates,
            },
        );
        let window =
            MonthWindow::new(adapter.clone(), months, Breakpoint::default()).bounds(min, max);
        let presets = presets.map_or_else(PresetSet::defaults, PresetSet::new);
        Ok(DateRangePicker {
            adapter,
            value: ModelValue::Empty,
            selection,
            window,
            hover: HoverPreview::new(),
            presets,
            gesture: GestureInterpreter::new(swipe),
            separator,
            input_format,
            display_format,
            fullscreen,
            swipeable,
            show_presets,
        })
    }
}

impl<A: DateAdapter> DateRangePicker<A> {
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn is_range(&self) -> bool {
        self.selection.is_range()
    }

    /// The last value received through [`DateRangePicker::set_value`]
    pub fn value(&self) -> &ModelValue<A::Date> {
        &self.value
    }

    /// Adopts a new externally owned value.  Selection state is rebuilt from
    /// it and the month window is moved to show its start.  No events
    /// result.
    pub fn set_value(&mut self, value: ModelValue<A::Date>) {
        self.selection.sync_external(value.clone());
        self.window.sync_to_value(&value);
        self.value = value;
    }

    pub fn phase(&self) -> Phase {
        self.selection.phase()
    }

    pub fn pending(&self) -> Option<&ModelValue<A::Date>> {
        self.selection.pending()
    }

    pub fn selection_start(&self) -> Option<A::Date> {
        self.selection.start()
    }

    pub fn selection_end(&self) -> Option<A::Date> {
        self.selection.end()
    }

    /// The selected range, once both of its edges are known
    pub fn selected_range(&self) -> Option<DatePair<A::Date>> {
        let (start, end) = self.selection.start().zip(self.selection.end())?;
        Some(DatePair::new(&self.adapter, start, end))
    }

    pub fn is_selected(&self, date: A::Date) -> bool {
        let edges = self.selection.edges();
        [edges.start, edges.end]
            .into_iter()
            .flatten()
            .any(|edge| self.adapter.is_same_day(edge, date))
    }

    pub fn is_in_selected_range(&self, date: A::Date) -> bool {
        self.selected_range()
            .is_some_and(|range| range.contains(&self.adapter, date))
    }

    pub fn is_date_disabled(&self, date: A::Date) -> bool {
        self.selection.is_date_disabled(date)
    }

    pub fn select_date(&mut self, date: A::Date) -> Vec<PickerEvent<A::Date>> {
        let outcome = self.selection.select_date(date);
        self.events(outcome)
    }

    pub fn set_range(&mut self, a: A::Date, b: A::Date) -> Vec<PickerEvent<A::Date>> {
        let outcome = self.selection.set_range(a, b);
        self.events(outcome)
    }

    pub fn apply(&mut self) -> Vec<PickerEvent<A::Date>> {
        let outcome = self.selection.apply();
        let mut events = self.events(outcome);
        if !events.is_empty() {
            events.push(PickerEvent::Apply);
        }
        events
    }

    pub fn cancel(&mut self) -> Vec<PickerEvent<A::Date>> {
        self.selection.cancel();
        self.hover.clear();
        vec![PickerEvent::Cancel]
    }

    pub fn reset(&mut self) {
        self.selection.reset();
        self.hover.clear();
    }

    pub fn set_bounds(&mut self, min: Option<A::Date>, max: Option<A::Date>) {
        self.selection.set_bounds(min, max);
        self.window.set_bounds(min, max);
    }

    // Viewport

    pub fn month_views(&self) -> Vec<MonthDescriptor<A::Date>> {
        self.window.month_views()
    }

    pub fn effective_months(&self) -> usize {
        self.window.effective_months()
    }

    pub fn anchor(&self) -> A::Date {
        self.window.anchor()
    }

    pub fn set_anchor(&mut self, date: Option<A::Date>) {
        self.window.set_anchor(date);
    }

    pub fn is_visible(&self, date: A::Date) -> bool {
        self.window.is_visible(date)
    }

    pub fn can_go_prev(&self) -> bool {
        self.window.can_go_prev()
    }

    pub fn can_go_next(&self) -> bool {
        self.window.can_go_next()
    }

    pub fn previous(&mut self) -> bool {
        self.window.previous()
    }

    pub fn next(&mut self) -> bool {
        self.window.next()
    }

    pub fn move_by(&mut self, months: i32) -> bool {
        self.window.move_by(months)
    }

    pub fn set_months(&mut self, months: usize) {
        self.window.set_requested_months(months);
    }

    pub fn set_breakpoint(&mut self, breakpoint: Breakpoint) {
        if breakpoint != self.window.breakpoint() {
            tracing::debug!(?breakpoint, "layout changed");
            self.window.set_breakpoint(breakpoint);
        }
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen.resolve(self.window.breakpoint().mobile)
    }

    // Hover

    pub fn hovered(&self) -> Option<A::Date> {
        self.hover.hovered()
    }

    pub fn set_hovered(&mut self, date: Option<A::Date>) {
        self.hover.set_hovered(date);
    }

    pub fn clear_hover(&mut self) {
        self.hover.clear();
    }

    pub fn preview_range(&self) -> Option<PreviewRange<A::Date>> {
        self.hover
            .preview(&self.adapter, self.selection.phase(), self.selection.start())
    }

    pub fn is_in_preview_range(&self, date: A::Date) -> bool {
        self.preview_range()
            .is_some_and(|p| p.contains(&self.adapter, date))
    }

    pub fn is_preview_start(&self, date: A::Date) -> bool {
        self.preview_range()
            .is_some_and(|p| p.is_start(&self.adapter, date))
    }

    pub fn is_preview_end(&self, date: A::Date) -> bool {
        self.preview_range()
            .is_some_and(|p| p.is_end(&self.adapter, date))
    }

    // Presets

    pub fn show_presets(&self) -> bool {
        self.show_presets && !self.presets.is_empty()
    }

    pub fn resolved_presets(&self) -> Vec<ResolvedPreset<A::Date>> {
        self.presets.resolve(&self.adapter)
    }

    pub fn active_preset_index(&self) -> Option<usize> {
        self.presets
            .active_index(&self.adapter, self.selection.start(), self.selection.end())
    }

    /// Selects the range of the preset at `index`.  With auto-apply the
    /// selection is also applied.
    pub fn select_preset(&mut self, index: usize) -> Vec<PickerEvent<A::Date>> {
        let Some(preset) = self.presets.get(index) else {
            return Vec::new();
        };
        let range = preset.value.resolve(&self.adapter);
        tracing::debug!(label = %preset.label, "preset selected");
        let outcome = self.selection.set_range(range.start(), range.end());
        let committed = matches!(outcome, Outcome::Committed(_));
        let mut events = self.events(outcome);
        if committed {
            events.push(PickerEvent::Apply);
        }
        events
    }

    // Gestures

    pub fn touch_start(&mut self, sample: TouchSample) {
        if self.swipeable {
            self.gesture.touch_start(sample);
        }
    }

    pub fn touch_move(&mut self, sample: TouchSample) -> MoveFeedback {
        if self.swipeable {
            self.gesture.touch_move(sample)
        } else {
            MoveFeedback::default()
        }
    }

    /// Finishes a gesture, navigating if it was a swipe
    pub fn touch_end(&mut self, sample: TouchSample) -> Option<NavCommand> {
        if !self.swipeable {
            return None;
        }
        let command = self.gesture.touch_end(sample)?;
        self.window.move_by(command.months());
        Some(command)
    }

    // Text

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn input_format(&self) -> InputFormat {
        self.input_format
    }

    pub fn format_value(&self, value: &ModelValue<A::Date>) -> String {
        format_display_value(
            &self.adapter,
            value,
            &FormatOptions {
                range: self.selection.is_range(),
                separator: &self.separator,
                display: &self.display_format,
            },
        )
    }

    /// The committed value as text
    pub fn display_text(&self) -> String {
        self.format_value(&self.value)
    }

    pub fn parse_text(&self, raw: &str) -> ModelValue<A::Date> {
        parse_input_value(
            &self.adapter,
            raw,
            &ParseOptions {
                range: self.selection.is_range(),
                separator: &self.separator,
                input: self.input_format,
            },
        )
    }

    fn events(&self, outcome: Outcome<A::Date>) -> Vec<PickerEvent<A::Date>> {
        let (value, committed) = match outcome {
            Outcome::Ignored => return Vec::new(),
            Outcome::Pending(value) => (value, false),
            Outcome::Committed(value) => (value, true),
        };
        let RangeBoundary { start, end, .. } = value.boundary();
        let mut events = vec![if committed {
            PickerEvent::Update(value)
        } else {
            PickerEvent::Draft(value)
        }];
        if self.selection.is_range() {
            events.extend(start.map(PickerEvent::RangeStart));
            events.extend(end.map(PickerEvent::RangeEnd));
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::TimeAdapter;
    use crate::gesture::Navigate;
    use crate::presets::PresetDefinition;
    use crate::viewport::LayoutTier;
    use time::macros::date;
    use time::Date;

    const TODAY: Date = date!(2026 - 01 - 15);

    fn picker(options: PickerOptions<TimeAdapter>) -> DateRangePicker<TimeAdapter> {
        let mut p = DateRangePicker::new(TimeAdapter::fixed(TODAY), options).unwrap();
        p.set_breakpoint(Breakpoint::new(LayoutTier::Xl));
        p
    }

    /// Feeds committed values back the way a host would
    fn adopt(p: &mut DateRangePicker<TimeAdapter>, events: &[PickerEvent<Date>]) {
        for ev in events {
            if let PickerEvent::Update(value) = ev {
                p.set_value(value.clone());
            }
        }
    }

    #[test]
    fn test_deferred_range_emits_on_apply() {
        let mut p = picker(PickerOptions::new().range(true).auto_apply(false));
        let first = p.select_date(date!(2026 - 01 - 10));
        assert_eq!(
            first,
            [
                PickerEvent::Draft(ModelValue::Dates(vec![date!(2026 - 01 - 10)])),
                PickerEvent::RangeStart(date!(2026 - 01 - 10)),
            ]
        );
        let second = p.select_date(date!(2026 - 01 - 12));
        assert!(!second.iter().any(|e| matches!(e, PickerEvent::Update(_))));
        let applied = p.apply();
        assert_eq!(
            applied,
            [
                PickerEvent::Update(ModelValue::Dates(vec![
                    date!(2026 - 01 - 10),
                    date!(2026 - 01 - 12)
                ])),
                PickerEvent::RangeStart(date!(2026 - 01 - 10)),
                PickerEvent::RangeEnd(date!(2026 - 01 - 12)),
                PickerEvent::Apply,
            ]
        );
        assert!(p.apply().is_empty());
    }

    #[test]
    fn test_auto_apply_commits_on_second_click() {
        let mut p = picker(PickerOptions::new().range(true));
        p.select_date(date!(2026 - 01 - 20));
        let events = p.select_date(date!(2026 - 01 - 18));
        assert_eq!(
            events.first(),
            Some(&PickerEvent::Update(ModelValue::Dates(vec![
                date!(2026 - 01 - 18),
                date!(2026 - 01 - 20)
            ])))
        );
        adopt(&mut p, &events);
        assert_eq!(p.display_text(), "January 18, 2026 - January 20, 2026");
    }

    #[test]
    fn test_cancel_restores_value() {
        let mut p = picker(PickerOptions::new().range(true).auto_apply(false));
        p.set_value(ModelValue::Dates(vec![
            date!(2026 - 01 - 01),
            date!(2026 - 01 - 03),
        ]));
        p.select_date(date!(2026 - 01 - 20));
        assert_eq!(p.cancel(), [PickerEvent::Cancel]);
        assert_eq!(p.phase(), Phase::Complete);
        assert_eq!(p.selection_start(), Some(date!(2026 - 01 - 01)));
        assert!(p.apply().is_empty());
    }

    #[test]
    fn test_preset_selection_is_reflexive() {
        let mut p = picker(PickerOptions::new().range(true));
        for (i, preset) in p.resolved_presets().into_iter().enumerate() {
            let events = p.select_preset(i);
            assert_eq!(events.last(), Some(&PickerEvent::Apply), "{}", preset.label);
            adopt(&mut p, &events);
            let active = p.active_preset_index().unwrap();
            assert_eq!(
                p.resolved_presets()[active].range,
                preset.range,
                "{}",
                preset.label
            );
        }
        p.select_preset(2);
        assert_eq!(p.active_preset_index(), Some(2));
        assert!(p.select_preset(99).is_empty());
    }

    #[test]
    fn test_preset_without_auto_apply_is_draft() {
        let pair = DatePair::new(
            &TimeAdapter::fixed(TODAY),
            date!(2026 - 01 - 01),
            date!(2026 - 01 - 03),
        );
        let mut p = picker(
            PickerOptions::new()
                .range(true)
                .auto_apply(false)
                .presets(vec![PresetDefinition::fixed("Preset", pair)]),
        );
        let events = p.select_preset(0);
        assert!(matches!(events.first(), Some(PickerEvent::Draft(_))));
        assert!(!events.contains(&PickerEvent::Apply));
        assert_eq!(p.active_preset_index(), Some(0));
    }

    #[test]
    fn test_hover_preview_while_start_selected() {
        let mut p = picker(PickerOptions::new().range(true));
        p.set_hovered(Some(date!(2026 - 01 - 05)));
        assert_eq!(p.preview_range(), None);
        p.select_date(date!(2026 - 01 - 10));
        assert!(p.is_preview_start(date!(2026 - 01 - 05)));
        assert!(p.is_preview_end(date!(2026 - 01 - 10)));
        assert!(p.is_in_preview_range(date!(2026 - 01 - 07)));
        p.clear_hover();
        assert!(!p.is_in_preview_range(date!(2026 - 01 - 07)));
    }

    #[test]
    fn test_external_value_moves_window() {
        let mut p = picker(PickerOptions::new().range(true).months(2));
        p.set_value(ModelValue::Dates(vec![
            date!(2026 - 05 - 20),
            date!(2026 - 06 - 02),
        ]));
        let keys = p.month_views().into_iter().map(|m| m.key).collect::<Vec<_>>();
        assert_eq!(keys, ["2026-4", "2026-5"]);
        p.set_value(ModelValue::Empty);
        assert_eq!(p.phase(), Phase::Idle);
        assert_eq!(p.anchor(), date!(2026 - 05 - 01));
    }

    #[test]
    fn test_max_bound_blocks_next() {
        let mut p = picker(
            PickerOptions::new()
                .range(true)
                .months(2)
                .max(Some(date!(2026 - 03 - 10))),
        );
        p.set_anchor(Some(date!(2026 - 03 - 01)));
        assert_eq!(p.anchor(), date!(2026 - 02 - 01));
        assert!(!p.can_go_next());
        assert!(p.is_date_disabled(date!(2026 - 03 - 11)));
        assert!(p.select_date(date!(2026 - 03 - 11)).is_empty());
    }

    #[test]
    fn test_swipe_navigates() {
        let mut p = picker(PickerOptions::new());
        p.touch_start(TouchSample::new(300.0, 50.0, 0.0));
        p.touch_move(TouchSample::new(270.0, 50.0, 50.0));
        let command = p.touch_end(TouchSample::new(240.0, 50.0, 100.0)).unwrap();
        assert_eq!(command.direction, Navigate::Next);
        assert!(!command.momentum);
        assert_eq!(p.anchor(), date!(2026 - 02 - 01));
        p.touch_start(TouchSample::new(0.0, 50.0, 0.0));
        let command = p.touch_end(TouchSample::new(200.0, 50.0, 100.0)).unwrap();
        assert!(command.momentum);
        assert_eq!(p.anchor(), date!(2025 - 12 - 01));
    }

    #[test]
    fn test_swipe_disabled() {
        let mut p = picker(PickerOptions::new().swipeable(false));
        p.touch_start(TouchSample::new(300.0, 50.0, 0.0));
        assert_eq!(p.touch_end(TouchSample::new(100.0, 50.0, 100.0)), None);
        assert_eq!(p.anchor(), date!(2026 - 01 - 01));
    }

    #[test]
    fn test_text_round_trip() {
        let p = picker(
            PickerOptions::new()
                .range(true)
                .display_format("yyyy-mm-dd")
                .input_format(InputFormat::YearMonthDay),
        );
        let value = ModelValue::Dates(vec![
            date!(2026 - 01 - 10),
            date!(2026 - 01 - 11),
            date!(2026 - 01 - 12),
        ]);
        let text = p.format_value(&value);
        assert_eq!(text, "2026-01-10 - 2026-01-12");
        assert_eq!(p.parse_text(&text), value);
    }

    #[test]
    fn test_fullscreen_auto_follows_layout() {
        let mut p = picker(PickerOptions::new().fullscreen(FullscreenMode::Auto));
        assert!(!p.is_fullscreen());
        p.set_breakpoint(Breakpoint::new(LayoutTier::Sm));
        assert!(p.is_fullscreen());
        assert_eq!(p.effective_months(), 1);
    }

    #[test]
    fn test_invalid_options_rejected() {
        let err = DateRangePicker::new(TimeAdapter::fixed(TODAY), PickerOptions::new().months(0))
            .unwrap_err();
        assert_eq!(err, ConfigError::ZeroMonths);
    }
}
