use anyhow::{anyhow, Context, Result};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use tempfile::TempDir;

use crate::app_config::Config;
use crate::ass_builder::{self, AssSettings, CueCaption, CueLine};
use crate::file_utils::FileManager;
use crate::karaoke_renderer;
use crate::language_utils;
use crate::phrase_inference::{self, PhraseSelection};
use crate::phrase_matcher;
use crate::run_context::RunContext;
use crate::sequencer::{self, Clip};
use crate::subtitle_extractor::ClipSubtitles;
use crate::translation::{CueTranslation, CueTranslator, LogEntry, TranslationService};
use crate::video_encoder;

// @module: Application controller for the montage pipeline

// Extraction is subprocess-bound; a small pool keeps ffmpeg instances in check
const EXTRACTION_CONCURRENCY: usize = 4;

/// One clip that survived extraction, ready for matching and rendering
struct PreparedClip {
    /// Path of the source video
    path: PathBuf,

    /// Probed duration in milliseconds
    duration_ms: u64,

    /// Word-timed cues extracted from the embedded track
    subtitles: ClipSubtitles,

    /// Per-clip working directory under the run workspace
    work_dir: PathBuf,
}

/// Main application controller for the clip montage workflow
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Run the full workflow over a folder of clips.
    ///
    /// Extraction fans out across clips, the common phrase is fixed at the
    /// barrier, then one rendition is encoded per configured language plus
    /// the untranslated one. Per-clip failures degrade, never abort.
    pub async fn run(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !input_dir.is_dir() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let clip_paths = FileManager::find_clip_files(&input_dir)?;
        if clip_paths.is_empty() {
            return Err(anyhow!("No video clips found in directory: {:?}", input_dir));
        }
        let total_clips = clip_paths.len();
        info!("Found {} clips in {:?}", total_clips, input_dir);

        let output_dir = PathBuf::from(&self.config.output_dir);
        FileManager::ensure_dir(&output_dir)?;

        // Run workspace; per-clip subdirectories live underneath
        let workspace = TempDir::with_prefix("karacut-")
            .context("Failed to create run workspace")?;

        let mut ctx = RunContext::new();
        let multi_progress = MultiProgress::new();

        // Parallel core: extraction and duration probing per clip
        let mut prepared = self
            .prepare_clips(&clip_paths, workspace.path(), &multi_progress, &mut ctx)
            .await;

        if prepared.is_empty() {
            return Err(anyhow!(
                "No clips with usable subtitle tracks ({} of {} failed extraction)",
                ctx.skipped.len(),
                total_clips
            ));
        }

        // Fan-in barrier: the phrase is fixed before any rendering starts
        let clip_refs: Vec<&ClipSubtitles> = prepared.iter().map(|p| &p.subtitles).collect();
        ctx.phrase =
            phrase_inference::select_phrase(self.config.target_phrase.as_deref(), &clip_refs);
        info!("Highlighting {}", ctx.phrase.describe());

        if let Some(tokens) = ctx.phrase.tokens().map(<[String]>::to_vec) {
            for clip in &mut prepared {
                let matches = phrase_matcher::find_phrase_matches(&clip.subtitles, &tokens);
                debug!(
                    "{}: {} phrase occurrence(s)",
                    clip.path.display(),
                    matches.len()
                );
                phrase_matcher::tag_phrase_matches(&mut clip.subtitles, &matches);
            }
        }

        // One rendition per language, plus the untranslated one
        let mut renditions: Vec<Option<String>> = vec![None];
        for code in &self.config.target_languages {
            let normalized = language_utils::normalize_to_part1_or_part2t(code)?;
            renditions.push(Some(normalized));
        }

        let service = if self.config.target_languages.is_empty() {
            None
        } else {
            let service = TranslationService::new(&self.config.translation);
            if let Err(e) = service.test_connection(None).await {
                ctx.warn(format!(
                    "Translation connection test failed, cues may degrade: {}",
                    e
                ));
            }
            Some(service)
        };

        let encode_bar = multi_progress.add(ProgressBar::new(
            (prepared.len() * renditions.len()) as u64,
        ));
        encode_bar.set_style(progress_style("clips"));
        encode_bar.set_message("Encoding");

        for language in &renditions {
            let result = self
                .render_rendition(
                    &prepared,
                    language.as_deref(),
                    service.as_ref(),
                    &output_dir,
                    force_overwrite,
                    &encode_bar,
                    &mut ctx,
                )
                .await;
            if let Err(e) = result {
                error!(
                    "Rendition {} failed: {}",
                    language.as_deref().unwrap_or("original"),
                    e
                );
                ctx.warn(format!(
                    "Rendition {} failed: {}",
                    language.as_deref().unwrap_or("original"),
                    e
                ));
            }
        }
        encode_bar.finish_and_clear();

        if self.config.keep_temp {
            let kept = workspace.keep();
            info!("Keeping temporary files in {:?}", kept);
        }

        // Final statistics block and issues log
        info!("{}", ctx.summary(total_clips));
        for usage in &ctx.usage {
            info!("{}", usage.summary());
        }
        if ctx.has_warnings() {
            let log_path = output_dir.join("karacut.issues.log");
            let context = format!(
                "{} ({})",
                input_dir.display(),
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
            );
            if let Err(e) = ctx.write_issues_log(&log_path, &context) {
                warn!("Failed to write issues log: {}", e);
            } else {
                info!("Issues written to {}", log_path.display());
            }
        }
        info!(
            "Done in {}",
            Self::format_duration(start_time.elapsed())
        );

        Ok(())
    }

    /// Extract subtitles and probe duration for every clip in parallel.
    ///
    /// Failed clips are recorded and excluded; they never cancel the others.
    async fn prepare_clips(
        &self,
        clip_paths: &[PathBuf],
        workspace: &Path,
        multi_progress: &MultiProgress,
        ctx: &mut RunContext,
    ) -> Vec<PreparedClip> {
        let extract_bar = multi_progress.add(ProgressBar::new(clip_paths.len() as u64));
        extract_bar.set_style(progress_style("clips"));
        extract_bar.set_message("Extracting subtitles");

        let results = stream::iter(clip_paths.iter().cloned().enumerate())
            .map(|(index, path)| {
                let work_dir = workspace.join(format!("clip{:04}", index));
                let bar = extract_bar.clone();
                async move {
                    let outcome = Self::prepare_one_clip(&path, &work_dir).await;
                    bar.inc(1);
                    (index, path, work_dir, outcome)
                }
            })
            .buffer_unordered(EXTRACTION_CONCURRENCY)
            .collect::<Vec<_>>()
            .await;
        extract_bar.finish_and_clear();

        // Restore filename order after the unordered fan-out
        let mut results = results;
        results.sort_by_key(|(index, ..)| *index);

        let mut prepared = Vec::with_capacity(results.len());
        for (_, path, work_dir, outcome) in results {
            match outcome {
                Ok((duration_ms, subtitles)) => {
                    for warning in &subtitles.warnings {
                        ctx.warn(format!("{}: {}", path.display(), warning));
                    }
                    prepared.push(PreparedClip {
                        path,
                        duration_ms,
                        subtitles,
                        work_dir,
                    });
                }
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    ctx.skip_clip(&path, e.to_string());
                }
            }
        }
        prepared
    }

    /// Extraction and probing for a single clip
    async fn prepare_one_clip(path: &Path, work_dir: &Path) -> Result<(u64, ClipSubtitles)> {
        FileManager::ensure_dir(work_dir)?;

        let duration_ms = video_encoder::probe_duration_ms(path).await?;

        let srt_path = work_dir.join("track.srt");
        let subtitles = ClipSubtitles::extract_from_clip(path, &srt_path).await?;

        Ok((duration_ms, subtitles))
    }

    /// Encode one rendition: burn every clip, then concatenate in order
    #[allow(clippy::too_many_arguments)]
    async fn render_rendition(
        &self,
        prepared: &[PreparedClip],
        language: Option<&str>,
        service: Option<&TranslationService>,
        output_dir: &Path,
        force_overwrite: bool,
        encode_bar: &ProgressBar,
        ctx: &mut RunContext,
    ) -> Result<()> {
        let (width, height) = self.config.video_dimensions()?;
        let settings = AssSettings {
            video_width: width,
            video_height: height,
            font_name: self.config.font_name.clone(),
            font_size: self.config.font_size,
            website_text: self.config.website_text.clone(),
        };

        let phrase_text = match &ctx.phrase {
            PhraseSelection::Explicit(tokens) | PhraseSelection::Inferred(tokens) => {
                tokens.join(" ")
            }
            PhraseSelection::None => String::new(),
        };
        let output_name =
            FileManager::final_output_name(&self.config.video_size, &phrase_text, language);
        let output_path = output_dir.join(&output_name);

        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping rendition, output already exists (use -f to force overwrite): {}",
                output_path.display()
            );
            encode_bar.inc(prepared.len() as u64);
            return Ok(());
        }

        let mut processed = Vec::with_capacity(prepared.len());
        for clip in prepared {
            let processed_path = self
                .burn_one_clip(clip, language, service, &settings, ctx)
                .await?;
            processed.push(Clip::new(processed_path, clip.duration_ms));
            encode_bar.inc(1);
        }

        // Cumulative offsets are the contract with the concat step
        let sequenced = sequencer::sequence_clips(processed);
        let ordered: Vec<&PathBuf> = sequenced.iter().map(|s| &s.clip.path).collect();
        video_encoder::concat_clips(&ordered, &output_path).await?;

        info!(
            "Rendition complete ({:.1}s): {}",
            sequencer::total_duration_ms(&sequenced) as f64 / 1000.0,
            output_path.display()
        );
        Ok(())
    }

    /// Translate (when requested), render and burn one clip
    async fn burn_one_clip(
        &self,
        clip: &PreparedClip,
        language: Option<&str>,
        service: Option<&TranslationService>,
        settings: &AssSettings,
        ctx: &mut RunContext,
    ) -> Result<PathBuf> {
        let mut captions: Vec<CueCaption> = Vec::new();

        let translations = match (language, service) {
            (Some(language), Some(service)) => {
                let log_capture = Arc::new(Mutex::new(Vec::<LogEntry>::new()));
                let translator = CueTranslator::new(service.clone());
                let (translations, stats) = translator
                    .translate_cues(&clip.subtitles.cues, language, log_capture.clone(), |_, _| {})
                    .await;

                let degraded = translations.iter().filter(|t| t.is_degraded()).count();
                if degraded > 0 {
                    ctx.add_degraded_cues(degraded);
                    ctx.warn(format!(
                        "{}: {} cue(s) kept their original text ({})",
                        clip.path.display(),
                        degraded,
                        language
                    ));
                }
                for entry in log_capture.lock().iter() {
                    if entry.level == "ERROR" || entry.level == "WARN" {
                        ctx.entries.push(entry.clone());
                    }
                }
                ctx.add_usage(stats);

                // Translated karaoke keeps the source line visible underneath
                for (cue_index, outcome) in translations.iter().enumerate() {
                    if matches!(outcome, CueTranslation::Translated(_)) {
                        let cue = &clip.subtitles.cues[cue_index];
                        captions.push(CueCaption {
                            cue_index,
                            start_time_ms: cue.start_time_ms,
                            end_time_ms: cue.end_time_ms,
                            text: cue.text.clone(),
                        });
                    }
                }

                Some(translations)
            }
            _ => None,
        };

        // The base dialogue shows the full display line even when the track
        // carried fewer timing entries than tokens
        let lines: Vec<CueLine> = clip
            .subtitles
            .cues
            .iter()
            .enumerate()
            .map(|(cue_index, cue)| {
                let text = match translations.as_ref().and_then(|t| t.get(cue_index)) {
                    Some(CueTranslation::Translated(result)) => result.translated_text.clone(),
                    _ => cue.text.clone(),
                };
                CueLine { cue_index, text }
            })
            .collect();

        let instructions =
            karaoke_renderer::render_clip(&clip.subtitles.cues, translations.as_deref());
        let document = ass_builder::build_document(&instructions, &lines, &captions, settings);

        let ass_name = match language {
            Some(lang) => format!("overlay_{}.ass", lang),
            None => "overlay.ass".to_string(),
        };
        let ass_path = clip.work_dir.join(ass_name);
        FileManager::write_to_file(&ass_path, &document)?;

        let processed_path = clip
            .work_dir
            .join(FileManager::processed_clip_name(&clip.path, language));
        let fonts_dir = self.config.fonts_dir.as_ref().map(Path::new);
        video_encoder::burn_subtitles(
            &clip.path,
            &ass_path,
            &processed_path,
            (settings.video_width, settings.video_height),
            fonts_dir,
        )
        .await?;

        Ok(processed_path)
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

fn progress_style(unit: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {unit} ({{percent}}%) {{msg}} {{eta}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░")
}
