//! Pointer handling for `LifeView`.
//!
//! Pointer input is an explicit state machine. [`transition`] is pure: it
//! takes the current state and an event and returns the next state plus the
//! [`PointerAction`] the viewer should apply. Nothing here touches the
//! buffer or the universe.

use crate::layout::Viewport;

/// What a primary-button press does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerMode {
    /// Drag moves the camera.
    #[default]
    Pan,
    /// Press toggles the cell under the pointer, drag paints more of the same.
    Draw,
}

impl PointerMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pan" | "move" => Some(Self::Pan),
            "draw" | "paint" => Some(Self::Draw),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PointerState {
    #[default]
    Idle,
    /// Dragging the view; last pointer position in logical pixels.
    Panning { last_x: f64, last_y: f64 },
    /// Painting cells to `alive`; the last cell painted.
    Painting { alive: bool, last_cell: (i64, i64) },
}

/// Pointer input in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f64, y: f64, mode: PointerMode },
    Move { x: f64, y: f64 },
    Up,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    None,
    /// Translate the view by a logical-pixel delta, then redraw.
    Pan { dx: f64, dy: f64 },
    /// Set one cell, then present.
    Paint { cell: (i64, i64), alive: bool },
}

/// Compute the next pointer state.
///
/// `is_alive` is only consulted on a draw-mode press, to decide whether the
/// stroke paints or erases.
pub fn transition(
    state: PointerState,
    event: PointerEvent,
    viewport: &Viewport,
    is_alive: impl Fn(i64, i64) -> bool,
) -> (PointerState, PointerAction) {
    match (state, event) {
        (_, PointerEvent::Down { x, y, mode }) => match mode {
            PointerMode::Pan => (
                PointerState::Panning {
                    last_x: x,
                    last_y: y,
                },
                PointerAction::None,
            ),
            PointerMode::Draw => {
                let cell = viewport.pixel_to_cell(x, y);
                let alive = !is_alive(cell.0, cell.1);
                (
                    PointerState::Painting {
                        alive,
                        last_cell: cell,
                    },
                    PointerAction::Paint { cell, alive },
                )
            }
        },
        (PointerState::Panning { last_x, last_y }, PointerEvent::Move { x, y }) => (
            PointerState::Panning {
                last_x: x,
                last_y: y,
            },
            PointerAction::Pan {
                dx: x - last_x,
                dy: y - last_y,
            },
        ),
        (PointerState::Painting { alive, last_cell }, PointerEvent::Move { x, y }) => {
            let cell = viewport.pixel_to_cell(x, y);
            if cell == last_cell {
                return (state, PointerAction::None);
            }
            (
                PointerState::Painting {
                    alive,
                    last_cell: cell,
                },
                PointerAction::Paint { cell, alive },
            )
        }
        (PointerState::Idle, PointerEvent::Move { .. }) => (PointerState::Idle, PointerAction::None),
        (_, PointerEvent::Up) => (PointerState::Idle, PointerAction::None),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        let mut vp = Viewport::with_canvas(100, 100);
        vp.cell_width = 10.0;
        vp.center_view();
        vp
    }

    #[test]
    fn pan_drag_reports_deltas() {
        let vp = viewport();
        let down = PointerEvent::Down {
            x: 10.0,
            y: 10.0,
            mode: PointerMode::Pan,
        };
        let (state, action) = transition(PointerState::Idle, down, &vp, |_, _| false);
        assert_eq!(action, PointerAction::None);

        let (state, action) =
            transition(state, PointerEvent::Move { x: 15.0, y: 7.0 }, &vp, |_, _| false);
        assert_eq!(action, PointerAction::Pan { dx: 5.0, dy: -3.0 });

        let (state, action) =
            transition(state, PointerEvent::Move { x: 16.0, y: 7.0 }, &vp, |_, _| false);
        assert_eq!(action, PointerAction::Pan { dx: 1.0, dy: 0.0 });

        let (state, _) = transition(state, PointerEvent::Up, &vp, |_, _| false);
        assert_eq!(state, PointerState::Idle);
    }

    #[test]
    fn draw_press_toggles_cell_under_pointer() {
        let vp = viewport();
        let down = PointerEvent::Down {
            x: 55.0,
            y: 45.0,
            mode: PointerMode::Draw,
        };
        let (_, action) = transition(PointerState::Idle, down, &vp, |_, _| false);
        assert_eq!(
            action,
            PointerAction::Paint {
                cell: (0, -1),
                alive: true
            }
        );

        let (state, action) = transition(PointerState::Idle, down, &vp, |x, y| (x, y) == (0, -1));
        assert_eq!(
            action,
            PointerAction::Paint {
                cell: (0, -1),
                alive: false
            }
        );
        assert_eq!(
            state,
            PointerState::Painting {
                alive: false,
                last_cell: (0, -1)
            }
        );
    }

    #[test]
    fn drag_paints_once_per_new_cell() {
        let vp = viewport();
        let mut state = transition(
            PointerState::Idle,
            PointerEvent::Down {
                x: 50.0,
                y: 50.0,
                mode: PointerMode::Draw,
            },
            &vp,
            |_, _| false,
        )
        .0;

        let mut painted = Vec::new();
        for x in [51.0, 55.0, 59.0, 60.0, 62.0, 75.0, 71.0] {
            let (next, action) = transition(state, PointerEvent::Move { x, y: 50.0 }, &vp, |_, _| {
                panic!("is_alive is only consulted on press")
            });
            state = next;
            if let PointerAction::Paint { cell, alive } = action {
                assert!(alive);
                painted.push(cell);
            }
        }
        assert_eq!(painted, vec![(1, 0), (2, 0)]);
    }

    #[test]
    fn idle_moves_and_stray_ups_do_nothing() {
        let vp = viewport();
        let (state, action) =
            transition(PointerState::Idle, PointerEvent::Move { x: 1.0, y: 1.0 }, &vp, |_, _| true);
        assert_eq!((state, action), (PointerState::Idle, PointerAction::None));
        let (state, action) = transition(PointerState::Idle, PointerEvent::Up, &vp, |_, _| true);
        assert_eq!((state, action), (PointerState::Idle, PointerAction::None));
    }

    #[test]
    fn mode_names_parse() {
        assert_eq!(PointerMode::parse("Draw"), Some(PointerMode::Draw));
        assert_eq!(PointerMode::parse("pan"), Some(PointerMode::Pan));
        assert_eq!(PointerMode::parse("erase"), None);
    }
}
