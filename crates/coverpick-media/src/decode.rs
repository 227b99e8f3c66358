// crates/coverpick-media/src/decode.rs
//
// SegmentDecoder: stateful decoder used by the cover-capture and playback
// threads, opened at a timestamp and read forward from there.
// grab_rgba: one-shot decode used by the sampler, one call per filmstrip slot.
//
// Both rasterize at a quarter of the source's native size (still::raster_dims).

use std::path::{Path, PathBuf};

use anyhow::Result;
use ffmpeg_the_third as ffmpeg;
use ffmpeg::format::{input, Pixel};
use ffmpeg::media::Type;
use ffmpeg::software::scaling::{context::Context as SwsContext, flag::Flags};

use crate::still::raster_dims;

/// Copy one RGBA frame out of a scaled buffer, dropping stride padding.
fn destripe(frame: &ffmpeg::util::frame::video::Video, w: u32, h: u32) -> Vec<u8> {
    let stride = frame.stride(0);
    let raw    = frame.data(0);
    let mut data = Vec::with_capacity(w as usize * h as usize * 4);
    for row in 0..h as usize {
        let s = row * stride;
        data.extend_from_slice(&raw[s..s + w as usize * 4]);
    }
    data
}

// ── Stateful decoder ──────────────────────────────────────────────────────────

pub struct SegmentDecoder {
    pub path:      PathBuf,
    ictx:          ffmpeg::format::context::Input,
    decoder:       ffmpeg::decoder::video::Video,
    video_idx:     usize,
    pub last_pts:  i64,
    tb_num:        i32,
    tb_den:        i32,
    pub out_w:     u32,
    pub out_h:     u32,
    scaler:        SwsContext,
    /// While set, next_frame() burns decoded frames without scaling until it
    /// reaches this pts. Seeks land on the preceding keyframe; the burn walks
    /// the GOP so the first frame returned sits at the requested timestamp.
    skip_until:    Option<i64>,
}

impl SegmentDecoder {
    pub fn open(path: &Path, timestamp: f64) -> Result<Self> {
        let mut ictx = input(path)?;
        let video_idx = ictx.streams().best(Type::Video)
            .ok_or_else(|| anyhow::anyhow!("no video stream"))?.index();

        let (tb_num, tb_den, seek_ts, raw_w, raw_h) = {
            let stream = ictx.stream(video_idx)
                .ok_or_else(|| anyhow::anyhow!("video stream vanished"))?;
            let tb = stream.time_base();
            let seek_ts = (timestamp * tb.denominator() as f64 / tb.numerator() as f64) as i64;
            let (w, h) = unsafe {
                let p = stream.parameters().as_ptr();
                ((*p).width as u32, (*p).height as u32)
            };
            (tb.numerator(), tb.denominator(), seek_ts, w, h)
        };

        // Soft-fail: an unseekable container just decodes from the start.
        let _ = ictx.seek(seek_ts, ..=seek_ts);

        // Codec parameters come from a throwaway second open; `ictx` has
        // already seeked and stays dedicated to the packet walk.
        let psrc    = input(path)?;
        let pstream = psrc.stream(video_idx)
            .ok_or_else(|| anyhow::anyhow!("video stream vanished"))?;
        let dec_ctx = ffmpeg::codec::context::Context::from_parameters(pstream.parameters())?;
        let decoder = dec_ctx.decoder().video()?;

        let (out_w, out_h) = raster_dims(raw_w, raw_h);
        let scaler = SwsContext::get(
            decoder.format(), decoder.width(), decoder.height(),
            Pixel::RGBA, out_w, out_h, Flags::BILINEAR,
        )?;

        Ok(Self {
            path: path.to_path_buf(), ictx, decoder, video_idx,
            last_pts: seek_ts, tb_num, tb_den, out_w, out_h, scaler,
            skip_until: Some(seek_ts),
        })
    }

    pub fn ts_to_pts(&self, t: f64) -> i64 {
        (t * self.tb_den as f64 / self.tb_num as f64) as i64
    }

    pub fn pts_to_secs(&self, pts: i64) -> f64 {
        pts as f64 * self.tb_num as f64 / self.tb_den as f64
    }

    /// Decode the next frame sequentially. Returns `(rgba, w, h, ts_secs)`,
    /// or None at EOF. Frames before a pending `skip_until` target are
    /// decoded but never scaled, so the post-seek burn costs decode time only.
    pub fn next_frame(&mut self) -> Option<(Vec<u8>, u32, u32, f64)> {
        for (stream, packet) in self.ictx.packets().flatten() {
            if stream.index() != self.video_idx { continue; }
            if self.decoder.send_packet(&packet).is_err() { continue; }
            let mut decoded = ffmpeg::util::frame::video::Video::empty();
            while self.decoder.receive_frame(&mut decoded).is_ok() {
                let pts = decoded.pts().unwrap_or(self.last_pts + 1);
                self.last_pts = pts;
                if let Some(target) = self.skip_until {
                    if pts + 2 < target { continue; }
                    self.skip_until = None;
                }
                let mut out = ffmpeg::util::frame::video::Video::empty();
                if self.scaler.run(&decoded, &mut out).is_err() { return None; }
                let data = destripe(&out, self.out_w, self.out_h);
                return Some((data, self.out_w, self.out_h, self.pts_to_secs(pts)));
            }
        }
        None
    }

    /// Read forward until a frame at or past `target_pts`, scaling as we go
    /// so EOF can still answer with the last frame seen. Forward-only; the
    /// caller re-opens for any backward movement.
    pub fn advance_to(&mut self, target_pts: i64) -> Option<(Vec<u8>, u32, u32)> {
        self.skip_until = None;
        let mut last_good: Option<Vec<u8>> = None;
        for (stream, packet) in self.ictx.packets().flatten() {
            if stream.index() != self.video_idx { continue; }
            if self.decoder.send_packet(&packet).is_err() { continue; }
            let mut decoded = ffmpeg::util::frame::video::Video::empty();
            while self.decoder.receive_frame(&mut decoded).is_ok() {
                let pts = decoded.pts().unwrap_or(self.last_pts + 1);
                self.last_pts = pts;
                let mut out = ffmpeg::util::frame::video::Video::empty();
                if self.scaler.run(&decoded, &mut out).is_err() {
                    return last_good.map(|d| (d, self.out_w, self.out_h));
                }
                let data = destripe(&out, self.out_w, self.out_h);
                if pts < target_pts {
                    last_good = Some(data);
                    continue;
                }
                return Some((data, self.out_w, self.out_h));
            }
        }
        last_good.map(|d| (d, self.out_w, self.out_h))
    }
}

// ── One-shot decode ───────────────────────────────────────────────────────────

/// Decode the single frame nearest `timestamp`, quarter resolution.
///
/// Seeks land keyframe-aligned, so frames short of the target (within a
/// 2-tick tolerance) are skipped. If EOF arrives first the last decoded
/// frame is returned instead; requesting the final sample of a source whose
/// metadata slightly overstates its duration still answers with a frame.
pub fn grab_rgba(path: &Path, timestamp: f64) -> Result<(Vec<u8>, u32, u32)> {
    let mut ictx = input(path)?;

    let video_idx = ictx.streams().best(Type::Video)
        .ok_or_else(|| anyhow::anyhow!("no video stream"))?
        .index();

    let (seek_ts, raw_w, raw_h) = {
        let stream = ictx.stream(video_idx)
            .ok_or_else(|| anyhow::anyhow!("video stream vanished"))?;
        let tb = stream.time_base();
        let seek_ts = (timestamp * tb.denominator() as f64 / tb.numerator() as f64) as i64;
        let (w, h) = unsafe {
            let p = stream.parameters().as_ptr();
            ((*p).width as u32, (*p).height as u32)
        };
        (seek_ts, w, h)
    };
    ictx.seek(seek_ts, ..=seek_ts)?;

    let psrc    = input(path)?;
    let pstream = psrc.stream(video_idx)
        .ok_or_else(|| anyhow::anyhow!("video stream vanished"))?;
    let dec_ctx = ffmpeg::codec::context::Context::from_parameters(pstream.parameters())?;
    let mut decoder = dec_ctx.decoder().video()?;

    let (out_w, out_h) = raster_dims(raw_w, raw_h);
    let mut scaler = SwsContext::get(
        decoder.format(), decoder.width(), decoder.height(),
        Pixel::RGBA, out_w, out_h, Flags::BILINEAR,
    )?;

    let mut last_good: Option<Vec<u8>> = None;

    for (stream, packet) in ictx.packets().flatten() {
        if stream.index() != video_idx { continue; }
        decoder.send_packet(&packet)?;
        let mut decoded = ffmpeg::util::frame::video::Video::empty();
        while decoder.receive_frame(&mut decoded).is_ok() {
            let mut out = ffmpeg::util::frame::video::Video::empty();
            scaler.run(&decoded, &mut out)?;
            let data = destripe(&out, out_w, out_h);
            if let Some(pts) = decoded.pts() {
                if pts + 2 < seek_ts {
                    last_good = Some(data);
                    continue;
                }
            }
            return Ok((data, out_w, out_h));
        }
    }

    last_good
        .map(|d| (d, out_w, out_h))
        .ok_or_else(|| anyhow::anyhow!("no frame found at t={timestamp:.3}"))
}
