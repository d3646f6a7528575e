/*!
 * ffmpeg/ffprobe front-ends for the encoding side of a run.
 *
 * Three subprocess operations live here: probing a clip's duration, burning
 * an ASS overlay into a clip while normalizing it to the output canvas, and
 * concatenating the processed clips into the final montage. All of them run
 * under a timeout and report filtered stderr on failure.
 */

use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use log::{debug, error};
use serde_json::Value;
use tokio::process::Command;

use crate::subtitle_extractor::filter_ffmpeg_stderr;

// Encoding can legitimately take a while on long clips
const ENCODE_TIMEOUT: Duration = Duration::from_secs(600);
const PROBE_TIMEOUT: Duration = Duration::from_secs(60);

/// Probe the container duration of a clip in milliseconds
pub async fn probe_duration_ms<P: AsRef<Path>>(video_path: P) -> Result<u64> {
    let video_path = video_path.as_ref();

    if !video_path.exists() {
        return Err(anyhow!("Video file not found: {:?}", video_path));
    }

    let ffprobe_future = Command::new("ffprobe")
        .args([
            "-v", "quiet",
            "-print_format", "json",
            "-show_format",
            video_path.to_str().unwrap_or_default(),
        ])
        .output();

    let output = tokio::select! {
        result = ffprobe_future => {
            result.map_err(|e| anyhow!("Failed to execute ffprobe command: {}", e))?
        },
        _ = tokio::time::sleep(PROBE_TIMEOUT) => {
            return Err(anyhow!("ffprobe command timed out after 60 seconds"));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!("ffprobe failed: {}", stderr);
        return Err(anyhow!("ffprobe command failed: {}", stderr));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: Value = serde_json::from_str(&stdout)
        .context("Failed to parse ffprobe JSON output")?;

    let duration_secs: f64 = json
        .get("format")
        .and_then(|f| f.get("duration"))
        .and_then(|d| d.as_str())
        .and_then(|d| d.parse().ok())
        .ok_or_else(|| anyhow!("ffprobe reported no duration for {:?}", video_path))?;

    Ok((duration_secs * 1000.0).round() as u64)
}

/// Burn an ASS overlay into a clip, scaling and cropping to the output size.
///
/// The clip is scaled up to cover the canvas and center-cropped, so mixed
/// input resolutions all land on the same geometry before concatenation.
pub async fn burn_subtitles(
    input: &Path,
    ass_file: &Path,
    output: &Path,
    video_size: (u32, u32),
    fonts_dir: Option<&Path>,
) -> Result<()> {
    let (width, height) = video_size;

    let mut filter = format!(
        "scale={w}:{h}:force_original_aspect_ratio=increase,crop={w}:{h},subtitles='{ass}'",
        w = width,
        h = height,
        ass = escape_filter_path(ass_file),
    );
    if let Some(fonts_dir) = fonts_dir {
        filter.push_str(&format!(":fontsdir='{}'", escape_filter_path(fonts_dir)));
    }

    debug!("Burning subtitles: {:?} -> {:?}", input, output);

    let args = [
        "-y",
        "-loglevel", "error",
        "-i", input.to_str().unwrap_or_default(),
        "-vf", &filter,
        "-c:a", "copy",
        output.to_str().unwrap_or_default(),
    ];
    run_ffmpeg(&args, "subtitle burn-in").await
}

/// Concatenate processed clips into one montage file.
///
/// Every input goes through `setsar=1` so clips with differing sample
/// aspect ratios concatenate cleanly; video and audio are re-encoded into
/// a single stream pair.
pub async fn concat_clips(inputs: &[impl AsRef<Path>], output: &Path) -> Result<()> {
    if inputs.is_empty() {
        return Err(anyhow!("No clips to concatenate"));
    }

    let mut args: Vec<String> = vec!["-y".to_string(), "-loglevel".to_string(), "error".to_string()];
    for input in inputs {
        args.push("-i".to_string());
        args.push(input.as_ref().to_string_lossy().into_owned());
    }

    let mut filter = String::new();
    for i in 0..inputs.len() {
        filter.push_str(&format!("[{i}:v]setsar=1[v{i}];"));
    }
    for i in 0..inputs.len() {
        filter.push_str(&format!("[v{i}][{i}:a]"));
    }
    filter.push_str(&format!("concat=n={}:v=1:a=1[v][a]", inputs.len()));

    args.extend([
        "-filter_complex".to_string(),
        filter,
        "-map".to_string(), "[v]".to_string(),
        "-map".to_string(), "[a]".to_string(),
        output.to_string_lossy().into_owned(),
    ]);

    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    run_ffmpeg(&arg_refs, "concatenation").await
}

/// Run one ffmpeg invocation under the encode timeout
async fn run_ffmpeg(args: &[&str], operation: &str) -> Result<()> {
    let ffmpeg_future = Command::new("ffmpeg").args(args).output();

    let output = tokio::select! {
        result = ffmpeg_future => {
            result.map_err(|e| anyhow!("Failed to execute ffmpeg for {}: {}", operation, e))?
        },
        _ = tokio::time::sleep(ENCODE_TIMEOUT) => {
            return Err(anyhow!("ffmpeg {} timed out after 10 minutes", operation));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let filtered = filter_ffmpeg_stderr(&stderr);
        error!("ffmpeg {} failed: {}", operation, filtered);
        return Err(anyhow!("ffmpeg {} failed: {}", operation, filtered));
    }

    Ok(())
}

/// Escape a path for use inside a quoted ffmpeg filter argument
fn escape_filter_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace(':', "\\:")
}
