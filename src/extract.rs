use std::{fs::File, io::BufReader, path::Path};

use image::{AnimationDecoder, RgbaImage, codecs::gif::GifDecoder, imageops};

use crate::{
    error::{ScanimateError, ScanimateResult},
    output,
};

const STAGE: &str = "extract";

/// Union bounding box over per-frame rectangles `(left, top, width, height)`.
///
/// Returns `(min_x, min_y, width, height)`. The box always includes the
/// origin, so a frame declared at negative coordinates still lands inside the
/// computed canvas instead of being clipped away.
pub fn union_canvas_bounds<I>(rects: I) -> (i64, i64, i64, i64)
where
    I: IntoIterator<Item = (i64, i64, i64, i64)>,
{
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (0i64, 0i64, 0i64, 0i64);
    for (left, top, w, h) in rects {
        min_x = min_x.min(left);
        min_y = min_y.min(top);
        max_x = max_x.max(left + w);
        max_y = max_y.max(top + h);
    }
    (min_x, min_y, max_x - min_x, max_y - min_y)
}

/// Decode an animated GIF into an ordered sequence of fully painted frames.
///
/// Each GIF frame only covers its own sub-rectangle of the canvas; frames are
/// painted cumulatively over the previous canvas state (disposal-by-overpaint)
/// so every returned frame is a complete picture. Frame 0 is painted with
/// unconditional replacement to establish an opaque base.
///
/// As a side effect, every painted frame is written to `frames_dir` as
/// `frame-<index>.png`. Any open, decode, or write failure aborts the whole
/// extraction.
pub fn extract_frames(input: &Path, frames_dir: &Path) -> ScanimateResult<Vec<RgbaImage>> {
    let file = File::open(input).map_err(|e| ScanimateError::io(STAGE, input, e))?;
    let decoder =
        GifDecoder::new(BufReader::new(file)).map_err(|e| ScanimateError::image(STAGE, input, e))?;
    let raw = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| ScanimateError::image(STAGE, input, e))?;
    if raw.is_empty() {
        return Err(ScanimateError::invalid_input(format!(
            "gif '{}' contains no frames",
            input.display()
        )));
    }

    let (min_x, min_y, width, height) = union_canvas_bounds(raw.iter().map(|f| {
        let buf = f.buffer();
        (
            i64::from(f.left()),
            i64::from(f.top()),
            i64::from(buf.width()),
            i64::from(buf.height()),
        )
    }));
    if width == 0 || height == 0 {
        return Err(ScanimateError::invalid_input(format!(
            "gif '{}' has an empty canvas",
            input.display()
        )));
    }

    output::ensure_dir(STAGE, frames_dir)?;

    let mut canvas = RgbaImage::new(width as u32, height as u32);
    let first = &raw[0];
    imageops::replace(
        &mut canvas,
        first.buffer(),
        i64::from(first.left()) - min_x,
        i64::from(first.top()) - min_y,
    );

    let mut frames = Vec::with_capacity(raw.len());
    for (i, frame) in raw.iter().enumerate() {
        imageops::overlay(
            &mut canvas,
            frame.buffer(),
            i64::from(frame.left()) - min_x,
            i64::from(frame.top()) - min_y,
        );
        output::write_frame_png(STAGE, frames_dir, i, &canvas)?;
        frames.push(canvas.clone());
    }
    tracing::debug!(count = frames.len(), width, height, "extracted gif frames");
    Ok(frames)
}
