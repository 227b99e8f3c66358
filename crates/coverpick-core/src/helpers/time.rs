// crates/coverpick-core/src/helpers/time.rs
//
// Time formatting for the selection readout and the duration label.

/// Format a timestamp as `MM:SS.CC` (centiseconds).
///
/// Used for the selection window readout, where the user is placing a
/// boundary and sub-second precision matters.
///
/// ```
/// use coverpick_core::helpers::time::format_timecode;
/// assert_eq!(format_timecode(0.0),     "00:00.00");
/// assert_eq!(format_timecode(13.636),  "00:13.63");
/// assert_eq!(format_timecode(87.5),    "01:27.50");
/// ```
pub fn format_timecode(s: f64) -> String {
    let s  = s.max(0.0);
    let m  = (s / 60.0) as u32;
    let sc = (s % 60.0) as u32;
    let cc = ((s * 100.0) as u64 % 100) as u32;
    format!("{m:02}:{sc:02}.{cc:02}")
}

/// Format a duration as `M:SS`, or `H:MM:SS` from an hour up.
///
/// Used for the source-duration label next to the file name, where
/// sub-second precision is noise.
///
/// ```
/// use coverpick_core::helpers::time::format_duration;
/// assert_eq!(format_duration(4.2),    "0:04");
/// assert_eq!(format_duration(187.0),  "3:07");
/// assert_eq!(format_duration(3875.0), "1:04:35");
/// ```
pub fn format_duration(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    if total >= 3600 {
        format!("{}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
    } else {
        format!("{}:{:02}", total / 60, total % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timecode_clamps_negative() {
        assert_eq!(format_timecode(-3.0), "00:00.00");
    }

    #[test]
    fn timecode_rolls_minutes() {
        assert_eq!(format_timecode(59.99), "00:59.99");
        assert_eq!(format_timecode(60.0),  "01:00.00");
    }

    #[test]
    fn duration_boundaries() {
        assert_eq!(format_duration(0.0),    "0:00");
        assert_eq!(format_duration(59.9),   "0:59");
        assert_eq!(format_duration(60.0),   "1:00");
        assert_eq!(format_duration(3600.0), "1:00:00");
    }
}
