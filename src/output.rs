use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::error::{ScanimateError, ScanimateResult};

pub fn ensure_dir(stage: &'static str, dir: &Path) -> ScanimateResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| ScanimateError::io(stage, dir, e))
}

/// `frame-<index>.png`, the naming shared by the extractor and normalizer.
pub fn frame_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("frame-{index}.png"))
}

pub fn write_frame_png(
    stage: &'static str,
    dir: &Path,
    index: usize,
    img: &RgbaImage,
) -> ScanimateResult<()> {
    write_png(stage, &frame_path(dir, index), img)
}

pub fn write_png(stage: &'static str, path: &Path, img: &RgbaImage) -> ScanimateResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_dir(stage, parent)?;
    }
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| match e {
            image::ImageError::IoError(io) => ScanimateError::io(stage, path, io),
            other => ScanimateError::image(stage, path, other),
        })
}
