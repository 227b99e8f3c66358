// crates/coverpick-core/src/preview.rs
//
// PreviewGate: the segment previewer's state machine.
//
// Exactly two states. Entering Playing records the window bounds once, so a
// selection edit made after play starts (there is no UI path for one, but the
// worker results are asynchronous) cannot move the stop boundary mid-flight.
// The stop test is boundary-inclusive: a frame observed exactly at the window
// end already stops playback.

use crate::selection::window_end;

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum PreviewGate {
    #[default]
    Idle,
    Playing { start: f64, end: f64 },
}

impl PreviewGate {
    /// Enter Playing for the segment starting at `selection`. Answers false
    /// (and changes nothing) when a preview is already running.
    pub fn play(&mut self, selection: f64) -> bool {
        if self.is_playing() {
            return false;
        }
        *self = PreviewGate::Playing { start: selection, end: window_end(selection) };
        true
    }

    /// Back to Idle from any state.
    pub fn stop(&mut self) {
        *self = PreviewGate::Idle;
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        matches!(self, PreviewGate::Playing { .. })
    }

    /// The active window bounds, if a preview is running.
    pub fn window(&self) -> Option<(f64, f64)> {
        match *self {
            PreviewGate::Idle => None,
            PreviewGate::Playing { start, end } => Some((start, end)),
        }
    }

    /// True once the observed playback position has reached the window end.
    /// Always false while Idle.
    pub fn should_stop(&self, position: f64) -> bool {
        match *self {
            PreviewGate::Idle => false,
            PreviewGate::Playing { end, .. } => position >= end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SEGMENT_SECS;

    #[test]
    fn play_records_window() {
        let mut gate = PreviewGate::default();
        assert!(!gate.is_playing());
        assert!(gate.play(4.0));
        assert_eq!(gate.window(), Some((4.0, 4.0 + SEGMENT_SECS)));
    }

    #[test]
    fn play_while_playing_is_rejected() {
        let mut gate = PreviewGate::default();
        assert!(gate.play(4.0));
        assert!(!gate.play(10.0));
        // The original window is untouched.
        assert_eq!(gate.window(), Some((4.0, 7.0)));
    }

    #[test]
    fn stop_is_boundary_inclusive() {
        let mut gate = PreviewGate::default();
        gate.play(4.0);
        assert!(!gate.should_stop(6.99));
        assert!(gate.should_stop(7.0));
        assert!(gate.should_stop(8.5));
    }

    #[test]
    fn idle_never_stops() {
        let gate = PreviewGate::Idle;
        assert!(!gate.should_stop(0.0));
        assert!(!gate.should_stop(1e9));
    }

    #[test]
    fn stop_returns_to_idle() {
        let mut gate = PreviewGate::default();
        gate.play(0.0);
        gate.stop();
        assert_eq!(gate, PreviewGate::Idle);
        // A fresh play is accepted again after stop.
        assert!(gate.play(1.0));
    }
}
