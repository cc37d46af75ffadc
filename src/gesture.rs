//! Turning drag/touch samples into month navigation
//!
//! A gesture starts with [`GestureInterpreter::touch_start`], is refined by
//! any number of [`GestureInterpreter::touch_move`] calls, and ends with
//! [`GestureInterpreter::touch_end`], which decides whether the gesture was
//! a swipe.  Vertical or slow gestures produce nothing so that normal
//! scrolling keeps working.

/// One pointer position, in pixels (or terminal cells), at a time in
/// milliseconds
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchSample {
    pub x: f64,
    pub y: f64,
    pub time_ms: f64,
}

impl TouchSample {
    pub fn new(x: f64, y: f64, time_ms: f64) -> TouchSample {
        TouchSample { x, y, time_ms }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeThresholds {
    /// Minimum horizontal travel for a swipe
    pub distance_px: f64,
    /// Minimum horizontal speed in px/ms for a swipe
    pub min_velocity: f64,
    /// Speed in px/ms above which a swipe counts as a momentum swipe
    pub momentum_velocity: f64,
    /// Travel on either axis after which the gesture locks to an axis
    pub lock_px: f64,
}

impl Default for SwipeThresholds {
    fn default() -> Self {
        SwipeThresholds {
            distance_px: 50.0,
            min_velocity: 0.3,
            momentum_velocity: 1.0,
            lock_px: 10.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Navigate {
    Previous,
    Next,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NavCommand {
    pub direction: Navigate,
    /// The swipe was fast enough to skip an extra month
    pub momentum: bool,
}

impl NavCommand {
    /// Number of months to move by
    pub fn months(self) -> i32 {
        let steps = if self.momentum { 2 } else { 1 };
        match self.direction {
            Navigate::Previous => -steps,
            Navigate::Next => steps,
        }
    }
}

/// What the host should do while a gesture is in progress
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveFeedback {
    /// Suppress the default scrolling behavior
    pub prevent_scroll: bool,
    /// Live horizontal offset for drag feedback
    pub offset: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum GestureState {
    #[default]
    Idle,
    Tracking {
        origin: TouchSample,
        lock: Option<Axis>,
    },
    Resolved,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureInterpreter {
    thresholds: SwipeThresholds,
    state: GestureState,
}

impl GestureInterpreter {
    pub fn new(thresholds: SwipeThresholds) -> GestureInterpreter {
        GestureInterpreter {
            thresholds,
            state: GestureState::Idle,
        }
    }

    pub fn thresholds(&self) -> SwipeThresholds {
        self.thresholds
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.state, GestureState::Tracking { .. })
    }

    /// The axis the current gesture is locked to, if any
    pub fn lock(&self) -> Option<Axis> {
        match self.state {
            GestureState::Tracking { lock, .. } => lock,
            _ => None,
        }
    }

    pub fn touch_start(&mut self, sample: TouchSample) {
        self.state = GestureState::Tracking {
            origin: sample,
            lock: None,
        };
    }

    pub fn touch_move(&mut self, sample: TouchSample) -> MoveFeedback {
        let GestureState::Tracking { origin, lock } = &mut self.state else {
            return MoveFeedback::default();
        };
        let dx = sample.x - origin.x;
        let dy = sample.y - origin.y;
        let past_lock = dx.abs() > self.thresholds.lock_px || dy.abs() > self.thresholds.lock_px;
        if lock.is_none() && past_lock {
            *lock = Some(if dx.abs() > dy.abs() {
                Axis::Horizontal
            } else {
                Axis::Vertical
            });
        }
        match lock {
            Some(Axis::Horizontal) => MoveFeedback {
                prevent_scroll: true,
                offset: Some(dx),
            },
            _ => MoveFeedback::default(),
        }
    }

    pub fn touch_end(&mut self, sample: TouchSample) -> Option<NavCommand> {
        let GestureState::Tracking { origin, lock } =
            std::mem::replace(&mut self.state, GestureState::Resolved)
        else {
            return None;
        };
        if lock == Some(Axis::Vertical) {
            return None;
        }
        let swipe = classify_swipe(origin, sample, self.thresholds.lock_px);
        if swipe.dy.abs() > swipe.dx.abs() || swipe.dx.abs() < self.thresholds.distance_px {
            return None;
        }
        let velocity = swipe.dx.abs() / swipe.duration_ms.max(1.0);
        if velocity < self.thresholds.min_velocity {
            return None;
        }
        let command = NavCommand {
            direction: if swipe.dx < 0.0 {
                Navigate::Next
            } else {
                Navigate::Previous
            },
            momentum: velocity > self.thresholds.momentum_velocity,
        };
        tracing::debug!(?command, velocity, "swipe recognized");
        Some(command)
    }

    /// Abandons the current gesture without a command
    pub fn cancel(&mut self) {
        self.state = GestureState::Idle;
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
    None,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeResult {
    pub direction: SwipeDirection,
    pub dx: f64,
    pub dy: f64,
    /// Speed along the dominant axis in px/ms
    pub velocity: f64,
    pub duration_ms: f64,
}

/// Describes the movement between two samples.  The direction is that of
/// the dominant axis, provided it moved more than `min_px`.
pub fn classify_swipe(start: TouchSample, end: TouchSample, min_px: f64) -> SwipeResult {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let duration_ms = end.time_ms - start.time_ms;
    let velocity = dx.abs().max(dy.abs()) / duration_ms.max(1.0);
    let direction = if dx.abs() > dy.abs() && dx.abs() > min_px {
        if dx < 0.0 {
            SwipeDirection::Left
        } else {
            SwipeDirection::Right
        }
    } else if dy.abs() > dx.abs() && dy.abs() > min_px {
        if dy < 0.0 {
            SwipeDirection::Up
        } else {
            SwipeDirection::Down
        }
    } else {
        SwipeDirection::None
    };
    SwipeResult {
        direction,
        dx,
        dy,
        velocity,
        duration_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swipe(dx: f64, dy: f64, duration_ms: f64) -> Option<NavCommand> {
        let mut gi = GestureInterpreter::default();
        gi.touch_start(TouchSample::new(200.0, 100.0, 1000.0));
        gi.touch_move(TouchSample::new(
            200.0 + dx / 2.0,
            100.0 + dy / 2.0,
            1000.0 + duration_ms / 2.0,
        ));
        gi.touch_end(TouchSample::new(200.0 + dx, 100.0 + dy, 1000.0 + duration_ms))
    }

    #[test]
    fn test_left_swipe_is_next() {
        assert_eq!(
            swipe(-60.0, 0.0, 100.0),
            Some(NavCommand {
                direction: Navigate::Next,
                momentum: false
            })
        );
    }

    #[test]
    fn test_right_swipe_is_previous() {
        assert_eq!(
            swipe(80.0, 5.0, 100.0),
            Some(NavCommand {
                direction: Navigate::Previous,
                momentum: false
            })
        );
    }

    #[test]
    fn test_fast_swipe_is_momentum() {
        let command = swipe(-150.0, 0.0, 100.0).unwrap();
        assert!(command.momentum);
        assert_eq!(command.months(), 2);
    }

    #[test]
    fn test_short_slow_and_vertical_swipes_ignored() {
        assert_eq!(swipe(-40.0, 0.0, 50.0), None);
        assert_eq!(swipe(-60.0, 0.0, 1000.0), None);
        assert_eq!(swipe(-60.0, -90.0, 100.0), None);
    }

    #[test]
    fn test_vertical_lock_wins() {
        let mut gi = GestureInterpreter::default();
        gi.touch_start(TouchSample::new(0.0, 0.0, 0.0));
        assert_eq!(gi.touch_move(TouchSample::new(2.0, 30.0, 20.0)), MoveFeedback::default());
        assert_eq!(gi.lock(), Some(Axis::Vertical));
        assert_eq!(gi.touch_end(TouchSample::new(-120.0, 30.0, 100.0)), None);
    }

    #[test]
    fn test_horizontal_lock_reports_offset() {
        let mut gi = GestureInterpreter::default();
        gi.touch_start(TouchSample::new(100.0, 0.0, 0.0));
        assert_eq!(gi.touch_move(TouchSample::new(95.0, 0.0, 5.0)), MoveFeedback::default());
        assert_eq!(gi.lock(), None);
        let feedback = gi.touch_move(TouchSample::new(70.0, 3.0, 30.0));
        assert!(feedback.prevent_scroll);
        assert!(feedback
            .offset
            .is_some_and(|o| (o + 30.0).abs() < f64::EPSILON));
    }

    #[test]
    fn test_end_without_start() {
        let mut gi = GestureInterpreter::default();
        assert_eq!(gi.touch_end(TouchSample::new(-100.0, 0.0, 10.0)), None);
        gi.touch_start(TouchSample::new(0.0, 0.0, 0.0));
        assert!(gi.touch_end(TouchSample::new(-100.0, 0.0, 50.0)).is_some());
        assert!(!gi.is_tracking());
        assert_eq!(gi.touch_end(TouchSample::new(-100.0, 0.0, 60.0)), None);
    }

    #[test]
    fn test_classify_swipe() {
        let start = TouchSample::new(0.0, 0.0, 0.0);
        let result = classify_swipe(start, TouchSample::new(-30.0, 4.0, 60.0), 10.0);
        assert_eq!(result.direction, SwipeDirection::Left);
        assert_eq!(
            classify_swipe(start, TouchSample::new(3.0, 40.0, 60.0), 10.0).direction,
            SwipeDirection::Down
        );
        assert_eq!(
            classify_swipe(start, TouchSample::new(5.0, -5.0, 60.0), 10.0).direction,
            SwipeDirection::None
        );
    }
}
