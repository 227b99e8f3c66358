// crates/coverpick-ui/src/helpers/format.rs
//
// Display-only string utilities. Anything involving seconds belongs in
// coverpick_core::helpers::time, not here.

/// Truncate a file name from the middle so the extension stays visible:
/// `"a_very_long_recording_name.mp4"` becomes `"a_very_lo…name.mp4"`.
///
/// `max` is a character budget, not bytes, so multibyte names are safe.
/// Names at or under the budget come back unchanged.
pub fn middle_truncate(name: &str, max: usize) -> String {
    let count = name.chars().count();
    if count <= max || max < 2 {
        return name.to_string();
    }
    // One slot goes to the ellipsis; the tail keeps slightly less than half
    // so the extension plus a few preceding characters survive.
    let tail = (max - 1) / 2;
    let head = max - 1 - tail;
    let front: String = name.chars().take(head).collect();
    let back: String = name.chars().skip(count - tail).collect();
    format!("{front}…{back}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_extension() {
        let t = middle_truncate("a_very_long_recording_name.mp4", 18);
        assert!(t.ends_with(".mp4"));
        assert!(t.contains('…'));
        assert_eq!(t.chars().count(), 18);
    }

    #[test]
    fn short_name_unchanged() {
        assert_eq!(middle_truncate("clip.mp4", 18), "clip.mp4");
    }

    #[test]
    fn tiny_budget_is_left_alone() {
        // Budgets under 2 cannot hold head plus ellipsis plus tail; give
        // back the name rather than an empty string.
        assert_eq!(middle_truncate("movie.mp4", 1), "movie.mp4");
    }

    #[test]
    fn multibyte_is_not_split() {
        let t = middle_truncate("été_férié_enregistrement_long.mov", 16);
        assert!(std::str::from_utf8(t.as_bytes()).is_ok());
        assert_eq!(t.chars().count(), 16);
    }
}
