use std::path::{Path, PathBuf};

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use lofty::config::WriteOptions;
use lofty::prelude::*;
use lofty::tag::Tag;
use log::{debug, error, info};

use crate::error::RetagError;
use crate::musicbrainz::{MusicBrainzClient, TrackInfo};
use crate::tags;

/// User-supplied fallbacks merged into every file.
#[derive(Debug, Default, Clone)]
pub struct UpdateOptions {
    pub default_genre: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Default, PartialEq)]
pub struct RunSummary {
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Walk one directory and update every `.mp3` file in it. Files fail
/// independently: a per-file error is logged and counted, never aborts the
/// run. The progress bar advances once per directory entry, mp3 or not.
pub async fn update_directory(
    dir: &Path,
    client: &MusicBrainzClient,
    opts: &UpdateOptions,
    multi: &MultiProgress,
) -> Result<RunSummary, RetagError> {
    if !dir.exists() {
        return Err(RetagError::PathNotFound(dir.to_path_buf()));
    }
    let entries = list_entries(dir)?;

    let progress = multi.add(ProgressBar::new(entries.len() as u64));
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut summary = RunSummary::default();
    for path in entries {
        progress.set_message(file_name(&path));
        progress.inc(1);
        if !is_mp3(&path) {
            continue;
        }
        match update_file(&path, client, opts).await {
            Ok(true) => summary.updated += 1,
            Ok(false) => summary.skipped += 1,
            Err(e) => {
                error!("Error updating tags for {}: {}", file_name(&path), e);
                summary.failed += 1;
            }
        }
    }
    progress.finish_with_message("done");
    Ok(summary)
}

/// Read the file's tag, look the track up, merge the results and persist if
/// anything changed. Returns whether a write happened.
async fn update_file(
    path: &Path,
    client: &MusicBrainzClient,
    opts: &UpdateOptions,
) -> Result<bool, RetagError> {
    let mut tag = tags::read_tag(path)?;
    let artist = tags::artist_or_default(&tag);
    let title = tags::title_or_default(&tag);
    debug!("Looking up {} - {}", artist, title);

    let mut info = client.find_track_info(&artist, &title).await?;
    if merge_into_tag(&mut tag, &mut info, opts) {
        tag.save_to_path(path, WriteOptions::default())?;
        info!("Updating tags for {}: {}", file_name(path), info);
        Ok(true)
    } else {
        info!("Skipped {}", path.display());
        Ok(false)
    }
}

/// The merge policy. Looked-up fields win; the default genre applies only
/// when the lookup found none; the comment always applies when supplied.
/// Fallbacks that were applied are reflected back into `info` so the
/// confirmation message shows what was actually written.
fn merge_into_tag(tag: &mut Tag, info: &mut TrackInfo, opts: &UpdateOptions) -> bool {
    let mut updated = false;
    if let Some(date) = info.date.clone() {
        tag.insert_text(ItemKey::RecordingDate, date);
        updated = true;
    }
    if let Some(genre) = info.genre.clone() {
        tag.set_genre(genre);
        updated = true;
    } else if let Some(default_genre) = &opts.default_genre {
        tag.set_genre(default_genre.clone());
        info.genre = Some(default_genre.clone());
        updated = true;
    }
    if let Some(comment) = &opts.comment {
        tag.set_comment(comment.clone());
        info.comment = Some(comment.clone());
        updated = true;
    }
    updated
}

/// Directory entries in platform order. The order is whatever the OS
/// returns; nothing downstream depends on it.
fn list_entries(dir: &Path) -> Result<Vec<PathBuf>, RetagError> {
    let read_dir = dir.read_dir().map_err(|source| RetagError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|source| RetagError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        entries.push(entry.path());
    }
    Ok(entries)
}

fn is_mp3(path: &Path) -> bool {
    path.extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("mp3"))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
