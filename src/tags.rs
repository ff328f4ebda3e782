use std::path::Path;

use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::Tag;

use crate::error::RetagError;

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Open the file's tag container. Prefers the primary tag for the file
/// type, falls back to the first one present; a file with no tag at all is
/// an error the caller logs and skips.
pub fn read_tag(path: &Path) -> Result<Tag, RetagError> {
    let tagged_file = Probe::open(path)?.read()?;
    let tag_option = match tagged_file.primary_tag() {
        Some(primary_tag) => Some(primary_tag),
        None => tagged_file.first_tag(),
    };
    tag_option.cloned().ok_or(RetagError::NoTags)
}

pub fn artist_or_default(tag: &Tag) -> String {
    tag.artist().as_deref().unwrap_or(UNKNOWN_ARTIST).to_string()
}

pub fn title_or_default(tag: &Tag) -> String {
    tag.title().as_deref().unwrap_or(UNKNOWN_TITLE).to_string()
}
