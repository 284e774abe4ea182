//! Preview images and video of the relabeled frames

use image::GrayImage;
use log::{debug, info};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{NightError, NightResult};
use crate::pipeline::OutputDirectory;
use crate::raster::{Raster, RasterReader};
use crate::relabel::list_frames;
use crate::utils::logger::Logger;

/// Turns frames into 8-bit previews and, through ffmpeg, a video
pub struct FrameRenderer<'a> {
    framerate: u32,
    ffmpeg: String,
    logger: &'a Logger,
}

fn read_frame(path: &Path) -> NightResult<Raster> {
    RasterReader::open(path)
        .and_then(|mut reader| reader.read_all())
        .map_err(|e| NightError::tiff(path, e))
}

/// Linear stretch of `value` from `[min, max]` onto `0..=255`
fn stretch(value: f64, min: f64, max: f64) -> u8 {
    if !value.is_finite() || max <= min {
        return 0;
    }
    ((value - min) / (max - min) * 255.0).round().clamp(0.0, 255.0) as u8
}

impl<'a> FrameRenderer<'a> {
    pub fn new(framerate: u32, ffmpeg: impl Into<String>, logger: &'a Logger) -> Self {
        FrameRenderer {
            framerate,
            ffmpeg: ffmpeg.into(),
            logger,
        }
    }

    /// Writes `previews/frame_NNN.png` for every frame
    ///
    /// All previews share one stretch between the smallest and largest
    /// finite value of the whole batch.
    pub fn write_previews(&self, output: &OutputDirectory) -> NightResult<Vec<PathBuf>> {
        let frames = list_frames(output.root())?;
        if frames.is_empty() {
            return Err(NightError::io(
                format!("Rendering {}", output.root().display()),
                io::Error::new(io::ErrorKind::NotFound, "no frames to render"),
            ));
        }

        let mut range: Option<(f64, f64)> = None;
        for frame in &frames {
            for &v in read_frame(frame)?.data.iter().filter(|v| v.is_finite()) {
                range = Some(match range {
                    None => (v, v),
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                });
            }
        }
        let (min, max) = range.unwrap_or((0.0, 0.0));
        debug!("Preview stretch {} .. {}", min, max);

        let previews = output.previews_dir();
        fs::create_dir_all(&previews)
            .map_err(|e| NightError::io(format!("Failed to create {}", previews.display()), e))?;

        let mut written = Vec::with_capacity(frames.len());
        for frame in &frames {
            let raster = read_frame(frame)?;
            let pixels: Vec<u8> = raster.data.iter().map(|&v| stretch(v, min, max)).collect();
            let image = GrayImage::from_raw(raster.width() as u32, raster.height() as u32, pixels)
                .ok_or_else(|| NightError::Plot(format!("{} does not fit its own dimensions", frame.display())))?;

            let stem = frame.file_stem().and_then(|s| s.to_str()).unwrap_or("frame");
            let target = previews.join(format!("{}.png", stem));
            image.save(&target).map_err(|e| {
                NightError::io(format!("Failed to write preview {}", target.display()), io::Error::new(io::ErrorKind::Other, e))
            })?;
            written.push(target);
        }

        self.logger.log(&format!("Wrote {} previews to {}", written.len(), previews.display()))
            .map_err(NightError::run_log)?;
        Ok(written)
    }

    /// Arguments passed to ffmpeg for `output`
    pub fn ffmpeg_args(&self, output: &OutputDirectory) -> Vec<OsString> {
        let pattern = output.previews_dir().join("frame_%03d.png");
        vec![
            "-y".into(),
            "-framerate".into(),
            self.framerate.to_string().into(),
            "-start_number".into(),
            "1".into(),
            "-i".into(),
            pattern.into_os_string(),
            "-c:v".into(),
            "libx264".into(),
            "-pix_fmt".into(),
            "yuv420p".into(),
            output.video_path().into_os_string(),
        ]
    }

    /// Encodes the previews into `output.mp4`
    pub fn encode_video(&self, output: &OutputDirectory) -> NightResult<PathBuf> {
        let args = self.ffmpeg_args(output);
        info!("Running {} {:?}", self.ffmpeg, args);

        let result = Command::new(&self.ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| NightError::ExternalTool(format!("could not run {}: {}", self.ffmpeg, e)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let last_line = stderr.lines().last().unwrap_or("").trim();
            return Err(NightError::ExternalTool(format!(
                "{} exited with {}: {}", self.ffmpeg, result.status, last_line
            )));
        }

        let video = output.video_path();
        self.logger.log(&format!("Video created: {}", video.display()))
            .map_err(NightError::run_log)?;
        Ok(video)
    }
}
