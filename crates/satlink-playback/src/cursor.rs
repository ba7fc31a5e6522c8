//! Scrub cursor - display time decoupled from the clock while dragging

use satlink_core::SimTime;

/// Display position of the timeline.
/// While `dragging`, only user input moves `display_time`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrubCursor {
    display_time: SimTime,
    dragging: bool,
}

impl ScrubCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display_time(&self) -> SimTime {
        self.display_time
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Follow the clock. Ignored while dragging.
    pub fn track(&mut self, t: SimTime) {
        if !self.dragging {
            self.display_time = t;
        }
    }

    /// Scrubber grabbed at `t`
    pub fn begin_drag(&mut self, t: SimTime) {
        self.dragging = true;
        self.display_time = t;
    }

    /// Scrubber moved. Implicitly begins a drag.
    pub fn drag_to(&mut self, t: SimTime) {
        self.begin_drag(t);
    }

    /// Scrubber released; display_time holds until the next track
    pub fn end_drag(&mut self) {
        self.dragging = false;
    }
}
