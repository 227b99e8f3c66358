// crates/coverpick-core/src/selection.rs
//
// All timeline math in one place: sample spacing, selection clamping,
// pointer-to-timestamp mapping, overlay geometry.
//
// Everything operates on plain f64 seconds and returns finite values for
// every input, including zero, negative, and sub-segment durations. The
// UI and the sampler both call into here; neither reimplements any of it.

// ── Constants ─────────────────────────────────────────────────────────────────

/// Number of filmstrip frames sampled per source.
pub const SAMPLE_COUNT: usize = 12;

/// Fixed preview-segment length in seconds. The selection picks where this
/// window starts; its length never changes.
pub const SEGMENT_SECS: f64 = 3.0;

// ── Sample spacing ────────────────────────────────────────────────────────────

/// Timestamp of filmstrip slot `index`, evenly spaced across the full
/// duration with both endpoints included: slot 0 is t=0, slot 11 is t=duration.
///
/// This is the raw spacing value. It is NOT clamped against the segment
/// window; use [`timestamp_for_sample`] when the result becomes a selection.
///
/// ```
/// use coverpick_core::selection::sample_timestamp;
/// assert_eq!(sample_timestamp(0, 30.0), 0.0);
/// assert_eq!(sample_timestamp(11, 30.0), 30.0);
/// assert!((sample_timestamp(5, 30.0) - 13.6363).abs() < 1e-3);
/// ```
#[inline]
pub fn sample_timestamp(index: usize, duration: f64) -> f64 {
    let index = index.min(SAMPLE_COUNT - 1);
    duration.max(0.0) * index as f64 / (SAMPLE_COUNT - 1) as f64
}

/// All `SAMPLE_COUNT` slot timestamps, ascending, endpoints included.
pub fn sample_timestamps(duration: f64) -> [f64; SAMPLE_COUNT] {
    std::array::from_fn(|i| sample_timestamp(i, duration))
}

// ── Selection clamping ────────────────────────────────────────────────────────

/// Latest legal segment start: `duration - SEGMENT_SECS`, floored at 0.
/// Sources shorter than one segment always answer 0.
#[inline]
pub fn max_start_secs(duration: f64) -> f64 {
    (duration - SEGMENT_SECS).max(0.0)
}

/// `max_start_secs` as a fraction of the full duration, in [0, 1].
/// Answers 0 for zero or unknown duration so callers never divide by zero.
///
/// ```
/// use coverpick_core::selection::max_start_fraction;
/// assert_eq!(max_start_fraction(30.0), 0.9);
/// assert_eq!(max_start_fraction(2.0),  0.0);
/// assert_eq!(max_start_fraction(0.0),  0.0);
/// ```
#[inline]
pub fn max_start_fraction(duration: f64) -> f64 {
    if duration <= 0.0 {
        return 0.0;
    }
    ((duration - SEGMENT_SECS) / duration).max(0.0)
}

/// Clamp a candidate selection into `[0, max_start_secs(duration)]`.
#[inline]
pub fn clamp_selection(t: f64, duration: f64) -> f64 {
    t.clamp(0.0, max_start_secs(duration))
}

/// End of the segment window starting at `start`.
#[inline]
pub fn window_end(start: f64) -> f64 {
    start + SEGMENT_SECS
}

// ── Pointer mapping ───────────────────────────────────────────────────────────

/// Map a pointer x-coordinate over the filmstrip to a segment start.
///
/// The pointer's position across the strip is taken as a fraction of the
/// full duration, then clamped so the segment never overruns the end:
/// positions left of the strip answer 0, positions at or past the usable
/// range answer `max_start_secs`. A degenerate strip (width <= 0) or an
/// unknown duration answers 0.
pub fn timestamp_from_pointer(x: f32, strip_left: f32, strip_width: f32, duration: f64) -> f64 {
    if strip_width <= 0.0 || duration <= 0.0 {
        return 0.0;
    }
    let ratio = ((x - strip_left) / strip_width) as f64;
    ratio.clamp(0.0, max_start_fraction(duration)) * duration
}

/// Segment start for a click on filmstrip slot `index`: the slot's spacing
/// timestamp, clamped so the segment fits. The last slots of any source
/// collapse onto `max_start_secs`.
#[inline]
pub fn timestamp_for_sample(index: usize, duration: f64) -> f64 {
    sample_timestamp(index, duration).min(max_start_secs(duration))
}

// ── Overlay geometry ──────────────────────────────────────────────────────────

/// Left edge of the selection overlay as a fraction of the strip width.
#[inline]
pub fn left_fraction(t: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return 0.0;
    }
    (t / duration).clamp(0.0, 1.0)
}

/// Width of the selection overlay as a fraction of the strip width.
/// Capped at 1 for sources shorter than one segment.
#[inline]
pub fn span_fraction(duration: f64) -> f64 {
    if duration <= 0.0 {
        return 0.0;
    }
    (SEGMENT_SECS / duration).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_timestamps_span_full_duration() {
        let ts = sample_timestamps(30.0);
        assert_eq!(ts.len(), SAMPLE_COUNT);
        assert_eq!(ts[0], 0.0);
        assert_eq!(ts[SAMPLE_COUNT - 1], 30.0);
        for pair in ts.windows(2) {
            assert!(pair[0] < pair[1], "timestamps must ascend: {pair:?}");
        }
    }

    #[test]
    fn sample_timestamps_zero_duration_all_zero() {
        for t in sample_timestamps(0.0) {
            assert_eq!(t, 0.0);
        }
    }

    #[test]
    fn max_start_examples() {
        assert_eq!(max_start_secs(30.0), 27.0);
        assert_eq!(max_start_secs(3.0), 0.0);
        assert_eq!(max_start_secs(1.5), 0.0);
        assert_eq!(max_start_fraction(30.0), 0.9);
        assert_eq!(max_start_fraction(-4.0), 0.0);
    }

    #[test]
    fn pointer_maps_linearly_inside_usable_range() {
        // 200px strip over a 30s source: halfway = 15s.
        let t = timestamp_from_pointer(100.0, 0.0, 200.0, 30.0);
        assert!((t - 15.0).abs() < 1e-9);
    }

    #[test]
    fn pointer_clamps_at_both_ends() {
        // Left of the strip.
        assert_eq!(timestamp_from_pointer(-50.0, 0.0, 200.0, 30.0), 0.0);
        // 95% across would be 28.5s raw; the clamp pins it to 27.0.
        let t = timestamp_from_pointer(190.0, 0.0, 200.0, 30.0);
        assert!((t - 27.0).abs() < 1e-9);
        // Far past the right edge.
        let t = timestamp_from_pointer(10_000.0, 0.0, 200.0, 30.0);
        assert!((t - 27.0).abs() < 1e-9);
    }

    #[test]
    fn pointer_degenerate_inputs_answer_zero() {
        assert_eq!(timestamp_from_pointer(100.0, 0.0, 0.0, 30.0), 0.0);
        assert_eq!(timestamp_from_pointer(100.0, 0.0, -5.0, 30.0), 0.0);
        let t = timestamp_from_pointer(100.0, 0.0, 200.0, 0.0);
        assert_eq!(t, 0.0);
        assert!(t.is_finite());
    }

    #[test]
    fn sample_click_clamps_trailing_slots() {
        assert!((timestamp_for_sample(5, 30.0) - 13.636363636).abs() < 1e-6);
        // Slot 10 (27.27s) and slot 11 (30s) both collapse onto 27.0.
        assert_eq!(timestamp_for_sample(10, 30.0), 27.0);
        assert_eq!(timestamp_for_sample(11, 30.0), 27.0);
        assert_eq!(timestamp_for_sample(0, 30.0), 0.0);
    }

    #[test]
    fn sample_click_short_source_always_zero() {
        for i in 0..SAMPLE_COUNT {
            assert_eq!(timestamp_for_sample(i, 2.0), 0.0);
        }
    }

    #[test]
    fn clamp_selection_bounds() {
        assert_eq!(clamp_selection(-5.0, 30.0), 0.0);
        assert_eq!(clamp_selection(29.0, 30.0), 27.0);
        assert_eq!(clamp_selection(13.0, 30.0), 13.0);
        assert_eq!(clamp_selection(1.5, 2.0), 0.0);
    }

    #[test]
    fn window_covers_segment() {
        assert_eq!(window_end(27.0), 30.0);
        assert_eq!(window_end(0.0), SEGMENT_SECS);
    }

    #[test]
    fn overlay_geometry() {
        assert!((span_fraction(30.0) - 0.1).abs() < 1e-9);
        assert_eq!(span_fraction(2.0), 1.0);
        assert_eq!(span_fraction(0.0), 0.0);
        assert!((left_fraction(27.0, 30.0) - 0.9).abs() < 1e-9);
        assert_eq!(left_fraction(5.0, 0.0), 0.0);
    }
}
