use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::{error::ScanimateResult, model::Resolution, output};

const STAGE: &str = "normalize";

/// Same-coordinate resize: destination pixel `(x, y)` samples source pixel
/// `(x, y)`, so this crops or pads rather than scaling. Reads past the source
/// bounds yield transparent black. Not a resample on purpose: swapping in one
/// would change every composited pixel downstream.
pub fn resize_exact(src: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        if x < src.width() && y < src.height() {
            *src.get_pixel(x, y)
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

/// Threshold to pure black/white on the raw `r + g + b` sum.
///
/// `flip` inverts the polarity: without it, bright pixels become white;
/// with it, bright pixels become black. Alpha is forced opaque either way.
pub fn threshold_bw(src: &RgbaImage, threshold: u32, flip: bool) -> RgbaImage {
    RgbaImage::from_fn(src.width(), src.height(), |x, y| {
        let Rgba([r, g, b, _]) = *src.get_pixel(x, y);
        let brightness = u32::from(r) + u32::from(g) + u32::from(b);
        let white = (brightness > threshold) != flip;
        let v = if white { 255 } else { 0 };
        Rgba([v, v, v, 255])
    })
}

/// Resize and threshold a frame sequence, writing each result to `out_dir`
/// as `frame-<index>.png`. Produces a fresh sequence of the same length;
/// the input frames are left untouched.
pub fn normalize_frames(
    frames: &[RgbaImage],
    out_dir: &Path,
    resolution: Resolution,
    threshold: u32,
    flip: bool,
) -> ScanimateResult<Vec<RgbaImage>> {
    output::ensure_dir(STAGE, out_dir)?;
    let mut normalized = Vec::with_capacity(frames.len());
    for (i, frame) in frames.iter().enumerate() {
        let resized = resize_exact(frame, resolution.width, resolution.height);
        let bw = threshold_bw(&resized, threshold, flip);
        output::write_frame_png(STAGE, out_dir, i, &bw)?;
        normalized.push(bw);
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test]
    fn resize_crops_and_pads_at_same_coordinates() {
        let mut src = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        src.put_pixel(3, 3, Rgba([1, 2, 3, 4]));

        let out = resize_exact(&src, 6, 3);
        assert_eq!(out.dimensions(), (6, 3));
        // in-bounds pixels are copied verbatim
        assert_eq!(*out.get_pixel(0, 0), Rgba([10, 20, 30, 255]));
        // pad region reads transparent black
        assert_eq!(*out.get_pixel(5, 0), Rgba([0, 0, 0, 0]));
        // rows past the destination height are cropped away
        assert!(out.get_pixel_checked(3, 3).is_none());
    }

    #[test]
    fn threshold_truth_table() {
        // threshold 510: (200,200,200) sums to 600 (bright), (100,100,100)
        // sums to 300 (dark)
        let mut src = RgbaImage::new(2, 1);
        src.put_pixel(0, 0, Rgba([200, 200, 200, 128]));
        src.put_pixel(1, 0, Rgba([100, 100, 100, 0]));

        let plain = threshold_bw(&src, 510, false);
        assert_eq!(*plain.get_pixel(0, 0), WHITE);
        assert_eq!(*plain.get_pixel(1, 0), BLACK);

        let flipped = threshold_bw(&src, 510, true);
        assert_eq!(*flipped.get_pixel(0, 0), BLACK);
        assert_eq!(*flipped.get_pixel(1, 0), WHITE);
    }

    #[test]
    fn brightness_exactly_at_threshold_is_dark() {
        let src = RgbaImage::from_pixel(1, 1, Rgba([170, 170, 170, 255])); // sums to 510
        assert_eq!(*threshold_bw(&src, 510, false).get_pixel(0, 0), BLACK);
        assert_eq!(*threshold_bw(&src, 510, true).get_pixel(0, 0), WHITE);
    }

    #[test]
    fn normalized_frames_are_binary_and_opaque() {
        let src = vec![
            RgbaImage::from_pixel(3, 3, Rgba([7, 99, 180, 13])),
            RgbaImage::from_pixel(5, 2, Rgba([250, 250, 250, 200])),
        ];
        let root = std::env::temp_dir().join(format!(
            "scanimate_normalize_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));

        let out = normalize_frames(
            &src,
            &root,
            Resolution {
                width: 4,
                height: 4,
            },
            510,
            false,
        )
        .unwrap();

        assert_eq!(out.len(), src.len());
        for (i, frame) in out.iter().enumerate() {
            assert_eq!(frame.dimensions(), (4, 4));
            for px in frame.pixels() {
                assert!(*px == WHITE || *px == BLACK);
            }
            assert!(output::frame_path(&root, i).exists());
        }
        std::fs::remove_dir_all(&root).unwrap();
    }
}
