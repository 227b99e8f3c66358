// crates/coverpick-media/src/worker.rs
//
// MediaWorker: owns the cover-request slot and the background decode threads.
// All public API that coverpick-ui calls lives here.
//
// Thread layout:
//   - one probe+sampler thread per accepted source (short-lived),
//   - one long-lived cover-capture thread fed by a latest-wins slot,
//   - one long-lived playback thread for the 3-second segment preview.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use uuid::Uuid;

use coverpick_core::media_types::{MediaResult, PlaybackFrame, Still};
use coverpick_core::selection::SEGMENT_SECS;

use crate::decode::SegmentDecoder;
use crate::probe::probe_source;
use crate::sampler::generate_samples;
use crate::still::encode_jpeg;

// ── Internal types ────────────────────────────────────────────────────────────

struct CoverRequest {
    session:   Uuid,
    seq:       u64,
    path:      PathBuf,
    timestamp: f64,
}

enum PlaybackCmd {
    Start { session: Uuid, path: PathBuf, start: f64 },
    Stop,
}

/// Decode a little past the window end so the last frame the UI promotes is
/// at or past the boundary, then stop burning CPU on the rest of the file.
const PLAYBACK_TAIL_SECS: f64 = 0.25;

// ── MediaWorker ───────────────────────────────────────────────────────────────

pub struct MediaWorker {
    /// Shared result channel: probe output, sampler slots, errors.
    pub rx: Receiver<MediaResult>,
    tx:     Sender<MediaResult>,

    /// Dedicated channel for cover captures. The slot is latest-wins so at
    /// most one capture is in flight; a small dedicated channel keeps drag
    /// refreshes responsive while the sampler is flooding `rx`.
    /// `ingest_media_results` drains this one first.
    pub cover_rx: Receiver<MediaResult>,

    /// Latest-wins slot for cover captures.
    cover_req: Arc<(Mutex<Option<CoverRequest>>, Condvar)>,
    /// Capture sequence numbers. Monotonically increasing across sessions;
    /// the UI ignores any Cover whose seq is not newer than the last applied.
    cover_seq: AtomicU64,

    /// Preview playback pipeline: commands in, decoded frames out.
    pb_tx:     Sender<PlaybackCmd>,
    pub pb_rx: Receiver<PlaybackFrame>,

    shutdown: Arc<AtomicBool>,
    /// Cancel flag of the in-flight sampler batch, flipped when a newer
    /// source supersedes it (and on shutdown).
    sample_cancel: Mutex<Option<Arc<AtomicBool>>>,
}

impl MediaWorker {
    pub fn new() -> Self {
        let (tx, rx)             = bounded(512);
        let (cover_tx, cover_rx) = bounded(8);

        let cover_req: Arc<(Mutex<Option<CoverRequest>>, Condvar)> =
            Arc::new((Mutex::new(None), Condvar::new()));

        // ── Cover-capture thread ──────────────────────────────────────────────
        // Blocks on the latest-wins slot; keeps its decoder warm across small
        // forward moves so a steady drag does not re-open the file per frame.
        let slot = Arc::clone(&cover_req);
        thread::spawn(move || {
            let mut live: Option<SegmentDecoder> = None;
            loop {
                let req = {
                    let (lock, cvar) = &*slot;
                    let mut guard = lock.lock().unwrap();
                    while guard.is_none() {
                        guard = cvar.wait(guard).unwrap();
                    }
                    guard.take().unwrap()
                };

                // Poison pill: a request with a nil session signals shutdown.
                if req.session == Uuid::nil() { return; }

                // Re-open (seek to keyframe + burn) when:
                //   a) the request targets another file
                //   b) any backward movement; advance_to() only goes forward
                //   c) forward jump > 2 s; advancing frame-by-frame through
                //      that many frames blocks the thread longer than a fresh
                //      keyframe seek does.
                let needs_reset = live.as_ref().map(|d| {
                    let tpts     = d.ts_to_pts(req.timestamp);
                    let two_secs = d.ts_to_pts(2.0);
                    d.path != req.path
                        || tpts <= d.last_pts
                        || tpts > d.last_pts + two_secs
                }).unwrap_or(true);

                let frame = if needs_reset {
                    match SegmentDecoder::open(&req.path, req.timestamp) {
                        Ok(mut d) => {
                            let f = d.next_frame().map(|(data, w, h, _)| (data, w, h));
                            live = Some(d);
                            f
                        }
                        Err(e) => {
                            eprintln!("[cover] open: {e}");
                            live = None;
                            None
                        }
                    }
                } else if let Some(d) = &mut live {
                    let tpts = d.ts_to_pts(req.timestamp);
                    let f = d.advance_to(tpts);
                    if f.is_none() { live = None; }
                    f
                } else {
                    None
                };

                let Some((rgba, w, h)) = frame else { continue };
                match encode_jpeg(&rgba, w, h) {
                    Ok(jpeg) => {
                        let still = Still {
                            timestamp: req.timestamp,
                            width:     w,
                            height:    h,
                            jpeg:      Arc::from(jpeg),
                        };
                        let _ = cover_tx.send(MediaResult::Cover {
                            session: req.session, seq: req.seq, rgba, still,
                        });
                    }
                    Err(e) => eprintln!("[cover] jpeg: {e}"),
                }
            }
        });

        // ── Playback thread ───────────────────────────────────────────────────
        // Decodes the selected segment ahead of the UI into a bounded channel;
        // the blocking send IS the rate limiter. Stops on Stop, EOF, or once
        // it has decoded past the window end.
        let (pb_tx, pb_cmd_rx)   = bounded::<PlaybackCmd>(4);
        let (pb_frame_tx, pb_rx) = bounded::<PlaybackFrame>(32);

        thread::spawn(move || {
            let mut active: Option<(Uuid, SegmentDecoder, f64)> = None;
            loop {
                // Commands: block while idle, poll between frames while decoding.
                let cmd = if active.is_some() {
                    match pb_cmd_rx.try_recv() {
                        Ok(c) => Some(c),
                        Err(TryRecvError::Empty) => None,
                        Err(TryRecvError::Disconnected) => return,
                    }
                } else {
                    match pb_cmd_rx.recv() {
                        Ok(c) => Some(c),
                        Err(_) => return,
                    }
                };
                if let Some(cmd) = cmd {
                    match cmd {
                        PlaybackCmd::Start { session, path, start } => {
                            active = open_playback(session, &path, start);
                        }
                        PlaybackCmd::Stop => active = None,
                    }
                    continue;
                }

                let Some((session, mut dec, stop_at)) = active.take() else { continue };
                match dec.next_frame() {
                    Some((data, w, h, ts_secs)) => {
                        let f = PlaybackFrame {
                            session, timestamp: ts_secs, width: w, height: h, data,
                        };
                        if pb_frame_tx.send(f).is_err() { return; }
                        // Keep going until the window end has been served.
                        if ts_secs < stop_at {
                            active = Some((session, dec, stop_at));
                        }
                    }
                    None => {} // EOF short of the window end; let it stop
                }
            }
        });

        Self {
            rx, tx, cover_rx, cover_req,
            cover_seq:     AtomicU64::new(0),
            pb_tx, pb_rx,
            shutdown:      Arc::new(AtomicBool::new(false)),
            sample_cancel: Mutex::new(None),
        }
    }

    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // Cancel the in-flight sampler batch, if any.
        if let Some(flag) = self.sample_cancel.lock().unwrap().take() {
            flag.store(true, Ordering::Relaxed);
        }
        // Wake the capture thread with a poison pill; a plain flag would
        // leave it parked on the condvar.
        let (lock, cvar) = &*self.cover_req;
        *lock.lock().unwrap() = Some(CoverRequest {
            session:   Uuid::nil(),
            seq:       0,
            path:      PathBuf::new(),
            timestamp: 0.0,
        });
        cvar.notify_one();
    }

    /// Probe + sample `path` for session `session`. Supersedes any batch
    /// still running for a previous source.
    pub fn load_source(&self, session: Uuid, path: PathBuf) {
        let cancel = Arc::new(AtomicBool::new(false));
        if let Some(old) = self.sample_cancel.lock().unwrap().replace(Arc::clone(&cancel)) {
            old.store(true, Ordering::Relaxed);
        }

        let tx = self.tx.clone();
        let sd = self.shutdown.clone();
        thread::spawn(move || {
            if sd.load(Ordering::Relaxed) { return; }
            let duration = probe_source(&path, session, &tx);
            if duration <= 0.0 { return; } // Error already sent
            if sd.load(Ordering::Relaxed) || cancel.load(Ordering::Relaxed) { return; }
            generate_samples(&path, session, duration, &cancel, &tx);
        });
    }

    /// Ask for a cover still at `timestamp`. Overwrites any pending request;
    /// the capture thread always serves the freshest one.
    pub fn request_cover(&self, session: Uuid, path: PathBuf, timestamp: f64) {
        let seq = self.cover_seq.fetch_add(1, Ordering::Relaxed) + 1;
        let (lock, cvar) = &*self.cover_req;
        *lock.lock().unwrap() = Some(CoverRequest { session, seq, path, timestamp });
        cvar.notify_one();
    }

    /// Start the segment preview at `start` seconds into `path`.
    pub fn start_preview(&self, session: Uuid, path: PathBuf, start: f64) {
        // Flush frames left over from a previous preview.
        while self.pb_rx.try_recv().is_ok() {}
        let _ = self.pb_tx.try_send(PlaybackCmd::Start { session, path, start });
    }

    /// Stop the segment preview pipeline.
    pub fn stop_preview(&self) {
        let _ = self.pb_tx.try_send(PlaybackCmd::Stop);
    }
}

fn open_playback(session: Uuid, path: &Path, start: f64) -> Option<(Uuid, SegmentDecoder, f64)> {
    match SegmentDecoder::open(path, start) {
        Ok(dec) => Some((session, dec, start + SEGMENT_SECS + PLAYBACK_TAIL_SECS)),
        Err(e)  => { eprintln!("[pb] open: {e}"); None }
    }
}
