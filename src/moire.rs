use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::{
    error::{ScanimateError, ScanimateResult},
    output,
};

const STAGE: &str = "compose";

/// Binary frames encode booleans in their pixels: black is true, white is
/// false. Only the red channel is consulted when reading; all three color
/// channels are written identically.
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

fn is_set(px: &Rgba<u8>) -> bool {
    px[0] == 0
}

fn bw(set: bool) -> Rgba<u8> {
    if set { BLACK } else { WHITE }
}

/// Per-frame interference pattern: black exactly where both the subject and
/// the mask are black (pixel-wise AND).
pub fn moire_frame(subject: &RgbaImage, mask: &RgbaImage) -> RgbaImage {
    RgbaImage::from_fn(subject.width(), subject.height(), |x, y| {
        bw(is_set(subject.get_pixel(x, y)) && is_set(mask.get_pixel(x, y)))
    })
}

/// Fold one moiré frame into the running accumulator: black where either is
/// black (pixel-wise OR). Returns a fresh frame; neither input is mutated.
pub fn accumulate_frame(acc: &RgbaImage, frame: &RgbaImage) -> RgbaImage {
    RgbaImage::from_fn(acc.width(), acc.height(), |x, y| {
        bw(is_set(acc.get_pixel(x, y)) || is_set(frame.get_pixel(x, y)))
    })
}

/// Reset a canvas to all-white (the accumulator's false state).
pub fn fill_white(img: &mut RgbaImage) {
    for px in img.pixels_mut() {
        *px = WHITE;
    }
}

/// Turn every pure white pixel fully transparent, leaving pure black pixels
/// untouched. Anything else means a frame slipped through normalization
/// un-binarized; those pixels are reported and left as-is rather than guessed
/// into one of the two states.
pub fn white_to_transparent(img: &mut RgbaImage) {
    for px in img.pixels_mut() {
        let Rgba([r, g, b, _]) = *px;
        if (r, g, b) == (255, 255, 255) {
            *px = Rgba([0, 0, 0, 0]);
        } else if (r, g, b) != (0, 0, 0) {
            tracing::warn!(r, g, b, "non-binary pixel in front image derivation");
        }
    }
}

/// Reduce the aligned subject and mask sequences to the single back image and
/// write it to `out_path`.
///
/// Starting from an all-white accumulator, each aligned pair contributes its
/// interference pattern via OR, so a pixel that ever turns black stays black.
/// The sequences must be non-empty, equal in length, and uniform in frame
/// dimensions.
#[tracing::instrument(skip(subject, mask))]
pub fn back_image(
    subject: &[RgbaImage],
    mask: &[RgbaImage],
    out_path: &Path,
) -> ScanimateResult<RgbaImage> {
    if subject.len() != mask.len() {
        return Err(ScanimateError::invalid_input(format!(
            "subject has {} frames but mask has {}",
            subject.len(),
            mask.len()
        )));
    }
    let Some(first) = subject.first() else {
        return Err(ScanimateError::invalid_input(
            "cannot compose an empty frame sequence",
        ));
    };
    let dims = first.dimensions();
    for (i, (s, m)) in subject.iter().zip(mask).enumerate() {
        if s.dimensions() != dims || m.dimensions() != dims {
            return Err(ScanimateError::invalid_input(format!(
                "frame {i} dimensions differ (subject {:?}, mask {:?}, expected {dims:?})",
                s.dimensions(),
                m.dimensions()
            )));
        }
    }

    let mut acc = RgbaImage::new(dims.0, dims.1);
    fill_white(&mut acc);
    for (s, m) in subject.iter().zip(mask) {
        acc = accumulate_frame(&acc, &moire_frame(s, m));
    }

    output::write_png(STAGE, out_path, &acc)?;
    Ok(acc)
}

/// Derive the front image from a single mask frame and write it to
/// `out_path`: a copy with all white turned transparent, so only the black
/// grid prints on the overlay layer.
pub fn front_image(mask: &RgbaImage, out_path: &Path) -> ScanimateResult<RgbaImage> {
    let mut front = mask.clone();
    white_to_transparent(&mut front);
    output::write_png(STAGE, out_path, &front)?;
    Ok(front)
}
