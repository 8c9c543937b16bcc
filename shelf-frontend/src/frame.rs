//! Still-frame extraction used as the last cover fallback for videos.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use crate::error::MaterializeError;

/// Default offset into the video for the fallback still.
pub const DEFAULT_FRAME_OFFSET: Duration = Duration::from_secs(10);

/// Grabs a single JPEG frame from a video.
pub trait FrameExtractor {
    /// Write the frame at `offset` of `video` to `dest` as a JPEG.
    fn extract_frame(&self, video: &Path, offset: Duration, dest: &Path) -> Result<(), MaterializeError>;
}

/// Disabled extraction; every call fails softly.
#[derive(Debug, Default)]
pub struct NoFrameExtractor;

impl FrameExtractor for NoFrameExtractor {
    fn extract_frame(&self, video: &Path, _offset: Duration, _dest: &Path) -> Result<(), MaterializeError> {
        Err(MaterializeError::Frame {
            path: video.display().to_string(),
            reason: "frame extraction is disabled".into(),
        })
    }
}

/// Runs the `ffmpeg` binary as a child process.
#[derive(Debug, Clone)]
pub struct FfmpegFrameExtractor {
    program: PathBuf,
}

impl FfmpegFrameExtractor {
    /// `program` defaults to `ffmpeg` on `PATH`.
    pub fn new(program: Option<PathBuf>) -> Self {
        Self {
            program: program.unwrap_or_else(|| PathBuf::from("ffmpeg")),
        }
    }

    fn args(video: &Path, offset: Duration, dest: &Path) -> Vec<std::ffi::OsString> {
        let mut args: Vec<std::ffi::OsString> = vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-y".into(),
            "-ss".into(),
            format!("{:.3}", offset.as_secs_f64()).into(),
            "-i".into(),
        ];
        args.push(video.as_os_str().to_owned());
        args.extend(["-frames:v", "1", "-q:v", "2", "-f", "image2"].map(std::ffi::OsString::from));
        args.push(dest.as_os_str().to_owned());
        args
    }
}

impl Default for FfmpegFrameExtractor {
    fn default() -> Self {
        Self::new(None)
    }
}

impl FrameExtractor for FfmpegFrameExtractor {
    fn extract_frame(&self, video: &Path, offset: Duration, dest: &Path) -> Result<(), MaterializeError> {
        let fail = |reason: String| MaterializeError::Frame {
            path: video.display().to_string(),
            reason,
        };

        log::debug!(
            "{} -ss {:?} on {}",
            self.program.display(),
            offset,
            video.display()
        );
        let output = Command::new(&self.program)
            .args(Self::args(video, offset, dest))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| fail(format!("could not run {}: {e}", self.program.display())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(fail(format!("{}: {}", output.status, stderr.trim())));
        }
        if !dest.is_file() {
            return Err(fail("no frame was written".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ffmpeg_arguments() {
        let args = FfmpegFrameExtractor::args(Path::new("/v/a.mp4"), Duration::from_secs(10), Path::new("/o/p.jpg"));
        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            [
                "-hide_banner", "-loglevel", "error", "-y", "-ss", "10.000", "-i", "/v/a.mp4",
                "-frames:v", "1", "-q:v", "2", "-f", "image2", "/o/p.jpg"
            ]
        );
    }

    #[test]
    fn missing_binary_is_an_error() {
        let extractor = FfmpegFrameExtractor::new(Some(PathBuf::from("/nonexistent/ffmpeg-binary")));
        let dir = tempfile::tempdir().unwrap();
        let err = extractor
            .extract_frame(Path::new("/v/a.mp4"), DEFAULT_FRAME_OFFSET, &dir.path().join("p.jpg"))
            .unwrap_err();
        assert!(matches!(err, MaterializeError::Frame { .. }));
    }
}
