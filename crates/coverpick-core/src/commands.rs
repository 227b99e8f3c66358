// crates/coverpick-core/src/commands.rs
//
// Every user action in CoverPick is expressed as a SelectorCommand.
// Modules emit these; app.rs processes them after the UI pass.
// Adding a new feature = add a variant here + one match arm in app.rs.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum SelectorCommand {
    // ── Source ───────────────────────────────────────────────────────────────
    /// Accept a file (picker result or drag-drop) and start probe + sampling.
    LoadVideo(PathBuf),
    /// Clear a failure banner and return to the empty screen.
    DismissError,

    // ── Selection ────────────────────────────────────────────────────────────
    /// Move the segment start to an already-mapped timestamp (drag path).
    /// app.rs clamps it again on write; the filmstrip maps pointer x through
    /// selection::timestamp_from_pointer before emitting.
    SelectAt(f64),
    /// Snap the segment start to filmstrip slot `index` (click path).
    SelectSample(usize),

    // ── Preview ──────────────────────────────────────────────────────────────
    PlayPreview,
    /// Issued when the observed position reaches the window end or the
    /// stream stalls. There is no user control for this; a running preview
    /// always ends itself.
    StopPreview,

    // ── Output ───────────────────────────────────────────────────────────────
    /// Put the selection summary JSON on the clipboard.
    CopySummary,
}
