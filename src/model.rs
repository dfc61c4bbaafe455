use std::path::{Path, PathBuf};

use crate::error::{ScanimateError, ScanimateResult};

/// Brightness is the raw `r + g + b` sum, so the largest meaningful
/// threshold is one below three full channels.
pub const MAX_BRIGHTNESS: u32 = 255 * 3;

/// Pixel dimensions of the normalized frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn square(side: u32) -> Self {
        Self {
            width: side,
            height: side,
        }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::square(480)
    }
}

/// A full compositing job: two input GIFs plus every knob the pipeline has.
///
/// Serializable so jobs can live in JSON files next to their inputs; the
/// defaults reproduce the production configuration (480×480, threshold 510,
/// inverted animation polarity).
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Job {
    /// Subject animation GIF.
    pub animation: PathBuf,
    /// Interference mask GIF.
    pub mask: PathBuf,
    /// Output directory root. Stage subdirectories are created under it.
    pub out_dir: PathBuf,
    #[serde(default)]
    pub resolution: Resolution,
    /// Binary threshold on the `r + g + b` sum, in `0..765`.
    #[serde(default = "default_threshold")]
    pub threshold: u32,
    /// Normalize the subject animation with inverted polarity.
    #[serde(default = "default_flip_animation")]
    pub flip_animation: bool,
    /// Polarity of the mask variant the front image is derived from. The back
    /// image always consumes the opposite-polarity variant.
    #[serde(default)]
    pub flip_mask: bool,
}

fn default_threshold() -> u32 {
    510
}

fn default_flip_animation() -> bool {
    true
}

impl Job {
    pub fn new(
        animation: impl Into<PathBuf>,
        mask: impl Into<PathBuf>,
        out_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            animation: animation.into(),
            mask: mask.into(),
            out_dir: out_dir.into(),
            resolution: Resolution::default(),
            threshold: default_threshold(),
            flip_animation: default_flip_animation(),
            flip_mask: false,
        }
    }

    pub fn validate(&self) -> ScanimateResult<()> {
        if self.resolution.width == 0 || self.resolution.height == 0 {
            return Err(ScanimateError::validation(
                "resolution width/height must be > 0",
            ));
        }
        if self.threshold >= MAX_BRIGHTNESS {
            return Err(ScanimateError::validation(format!(
                "threshold {} leaves no brightness above it (must be < {MAX_BRIGHTNESS})",
                self.threshold
            )));
        }
        stem(&self.animation)?;
        stem(&self.mask)?;
        Ok(())
    }

    /// Raw extracted frames of the subject animation.
    pub fn animation_frames_dir(&self) -> ScanimateResult<PathBuf> {
        Ok(self.out_dir.join("animation").join(stem(&self.animation)?))
    }

    pub fn animation_normalized_dir(&self) -> ScanimateResult<PathBuf> {
        Ok(self
            .out_dir
            .join("animation-normalized")
            .join(stem(&self.animation)?))
    }

    /// Raw extracted frames of the mask animation.
    pub fn mask_frames_dir(&self) -> ScanimateResult<PathBuf> {
        Ok(self.out_dir.join("mask").join(stem(&self.mask)?))
    }

    pub fn mask_normalized_dir(&self) -> ScanimateResult<PathBuf> {
        Ok(self.out_dir.join("mask-normalized").join(stem(&self.mask)?))
    }

    pub fn mask_normalized_flipped_dir(&self) -> ScanimateResult<PathBuf> {
        Ok(self
            .out_dir
            .join("mask-normalized-flipped")
            .join(stem(&self.mask)?))
    }

    pub fn back_path(&self) -> PathBuf {
        self.out_dir.join("moire-back.png")
    }

    pub fn front_path(&self) -> PathBuf {
        self.out_dir.join("moire-front.png")
    }
}

fn stem(path: &Path) -> ScanimateResult<&std::ffi::OsStr> {
    path.file_stem().ok_or_else(|| {
        ScanimateError::validation(format!(
            "input path '{}' has no file name stem",
            path.display()
        ))
    })
}
