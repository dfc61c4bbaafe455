use image::RgbaImage;
use tracing::info;

use crate::{
    error::{ScanimateError, ScanimateResult},
    extract::extract_frames,
    model::Job,
    moire::{back_image, front_image},
    normalize::normalize_frames,
};

/// Everything a completed job produced, beyond the files on disk.
#[derive(Clone, Debug)]
pub struct JobArtifacts {
    pub animation_frames: usize,
    pub mask_frames: usize,
    pub back: RgbaImage,
    pub front: RgbaImage,
}

/// Run a whole compositing job: extract both GIFs, normalize, and reduce to
/// the moiré back/front pair.
///
/// Pipeline:
/// 1. [`extract_frames`] on the subject animation and the mask
/// 2. [`normalize_frames`] on each (the mask in both polarities)
/// 3. [`back_image`] over the animation and the opposite-polarity mask,
///    [`front_image`] from the first front-polarity mask frame
///
/// Every stage writes its frames under `job.out_dir` as it goes; the first
/// failure aborts the run with nothing retried or skipped.
pub fn run_job(job: &Job) -> ScanimateResult<JobArtifacts> {
    job.validate()?;

    info!(path = %job.animation.display(), "extracting animation");
    let anim_raw = extract_frames(&job.animation, &job.animation_frames_dir()?)?;
    let anim = normalize_frames(
        &anim_raw,
        &job.animation_normalized_dir()?,
        job.resolution,
        job.threshold,
        job.flip_animation,
    )?;

    info!(path = %job.mask.display(), "extracting mask");
    let mask_raw = extract_frames(&job.mask, &job.mask_frames_dir()?)?;
    let mask = normalize_frames(
        &mask_raw,
        &job.mask_normalized_dir()?,
        job.resolution,
        job.threshold,
        job.flip_mask,
    )?;
    let mask_flipped = normalize_frames(
        &mask_raw,
        &job.mask_normalized_flipped_dir()?,
        job.resolution,
        job.threshold,
        !job.flip_mask,
    )?;

    info!(
        animation_frames = anim.len(),
        mask_frames = mask.len(),
        "compositing moiré pair"
    );
    let back = back_image(&anim, &mask_flipped, &job.back_path())?;
    let front_mask = mask
        .first()
        .ok_or_else(|| ScanimateError::invalid_input("mask produced no frames"))?;
    let front = front_image(front_mask, &job.front_path())?;

    Ok(JobArtifacts {
        animation_frames: anim.len(),
        mask_frames: mask.len(),
        back,
        front,
    })
}
