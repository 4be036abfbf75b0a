//! Input Capture
//!
//! Device events are decoded outside the core into [`InputEvent`]s.
//! Button events only bump edge counters here; `update` reads and clears
//! the counters, so each discrete press is consumed exactly once however
//! many events arrive between updates.

use serde::{Deserialize, Serialize};

use crate::core::coord::BoardDelta;

// =============================================================================
// BUTTONS
// =============================================================================

/// Logical buttons the core reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ButtonId {
    /// Player hop left
    MoveLeft,
    /// Player hop right
    MoveRight,
    /// Player hop toward the camera
    MoveDown,
    /// Player hop away from the camera
    MoveUp,
    /// Cursor left
    CursorLeft,
    /// Cursor right
    CursorRight,
    /// Cursor toward the camera
    CursorDown,
    /// Cursor away from the camera
    CursorUp,
    /// Classify the active tile
    Commit,
}

impl ButtonId {
    /// Every button, in storage order.
    pub const ALL: [ButtonId; 9] = [
        ButtonId::MoveLeft,
        ButtonId::MoveRight,
        ButtonId::MoveDown,
        ButtonId::MoveUp,
        ButtonId::CursorLeft,
        ButtonId::CursorRight,
        ButtonId::CursorDown,
        ButtonId::CursorUp,
        ButtonId::Commit,
    ];

    /// True for the four player movement buttons.
    #[inline]
    pub fn is_movement(self) -> bool {
        matches!(
            self,
            ButtonId::MoveLeft | ButtonId::MoveRight | ButtonId::MoveDown | ButtonId::MoveUp
        )
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Edge counters for one button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    /// Currently held
    pub pressed: bool,
    /// Press edges since the last drain
    pub downs: u8,
    /// Release edges since the last drain
    pub releases: u8,
}

impl Button {
    /// Record a press. Key repeat while held is not a new edge.
    pub fn press(&mut self) {
        if !self.pressed {
            self.downs = self.downs.saturating_add(1);
        }
        self.pressed = true;
    }

    /// Record a release. A release without a press is ignored.
    pub fn release(&mut self) {
        if self.pressed {
            self.releases = self.releases.saturating_add(1);
            self.pressed = false;
        }
    }

    /// Consume pending releases, reporting whether there were any.
    #[inline]
    fn take_release(&mut self) -> bool {
        let had = self.releases > 0;
        self.releases = 0;
        had
    }
}

// =============================================================================
// INPUT STATE
// =============================================================================

/// Counters for all logical buttons.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    buttons: [Button; 9],
}

impl InputState {
    /// All buttons idle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a button.
    #[inline]
    pub fn button(&self, id: ButtonId) -> &Button {
        &self.buttons[id.index()]
    }

    /// Mutate a button.
    #[inline]
    pub fn button_mut(&mut self, id: ButtonId) -> &mut Button {
        &mut self.buttons[id.index()]
    }

    /// Consume at most one player move.
    ///
    /// Left beats right beats down beats up; only the winning button's
    /// release is consumed.
    pub fn take_player_move(&mut self) -> BoardDelta {
        const ORDER: [(ButtonId, BoardDelta); 4] = [
            (ButtonId::MoveLeft, BoardDelta::LEFT),
            (ButtonId::MoveRight, BoardDelta::RIGHT),
            (ButtonId::MoveDown, BoardDelta::DOWN),
            (ButtonId::MoveUp, BoardDelta::UP),
        ];
        for (id, delta) in ORDER {
            if self.button_mut(id).take_release() {
                return delta;
            }
        }
        BoardDelta::ZERO
    }

    /// Consume every cursor release into one delta.
    ///
    /// Opposite releases in the same update resolve to right and up.
    pub fn take_cursor_move(&mut self) -> BoardDelta {
        let mut delta = BoardDelta::ZERO;
        if self.button_mut(ButtonId::CursorLeft).take_release() {
            delta.x = -1;
        }
        if self.button_mut(ButtonId::CursorRight).take_release() {
            delta.x = 1;
        }
        if self.button_mut(ButtonId::CursorDown).take_release() {
            delta.y = -1;
        }
        if self.button_mut(ButtonId::CursorUp).take_release() {
            delta.y = 1;
        }
        delta
    }

    /// Consume commit presses. Several presses in one update commit once.
    pub fn take_commit(&mut self) -> bool {
        let button = self.button_mut(ButtonId::Commit);
        let had = button.downs > 0;
        button.downs = 0;
        had
    }

    /// Reset counters at the end of an update.
    ///
    /// With `latch_movement`, player movement releases survive so a move
    /// made mid-jump is applied once the jump lands.
    pub fn drain(&mut self, latch_movement: bool) {
        for id in ButtonId::ALL {
            let button = self.button_mut(id);
            button.downs = 0;
            if !(latch_movement && id.is_movement()) {
                button.releases = 0;
            }
        }
    }
}

// =============================================================================
// EVENTS AND SCRIPTS
// =============================================================================

/// Decoded input event.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Button went down
    Press(ButtonId),
    /// Button came up
    Release(ButtonId),
    /// Orbit drag began
    OrbitStart,
    /// Mouse moved by `(xrel, yrel)` pixels
    CameraMotion {
        /// Horizontal motion in pixels
        xrel: f32,
        /// Vertical motion in pixels
        yrel: f32,
        /// Window width in pixels
        window_width: u32,
        /// Window height in pixels
        window_height: u32,
        /// The orbit button is held
        dragging: bool,
    },
    /// Wheel turned; positive dollies in
    Zoom {
        /// Wheel clicks
        wheel: f32,
    },
}

impl InputEvent {
    /// Press then release of one button.
    pub fn tap(id: ButtonId) -> [InputEvent; 2] {
        [InputEvent::Press(id), InputEvent::Release(id)]
    }
}

/// Recorded input: events tagged with the number of updates that had
/// completed when they arrived.
///
/// Entries are kept sorted by that count, stable for equal counts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputScript {
    entries: Vec<(u32, InputEvent)>,
}

impl InputScript {
    /// Empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event arriving after `update` updates.
    pub fn push(&mut self, update: u32, event: InputEvent) {
        let at = self.entries.partition_point(|(u, _)| *u <= update);
        self.entries.insert(at, (update, event));
    }

    /// Record a press/release pair arriving after `update` updates.
    pub fn tap(&mut self, update: u32, id: ButtonId) {
        for event in InputEvent::tap(id) {
            self.push(update, event);
        }
    }

    /// Events that arrived after `update` updates, in arrival order.
    pub fn events_at(&self, update: u32) -> impl Iterator<Item = &InputEvent> {
        let start = self.entries.partition_point(|(u, _)| *u < update);
        let end = self.entries.partition_point(|(u, _)| *u <= update);
        self.entries[start..end].iter().map(|(_, e)| e)
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
