//! Background image discovery.
//!
//! Only the pixel size of the picked image matters here: it bounds the
//! drift pan. The image itself is never decoded.

use rand::seq::IndexedRandom;
use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backdrop {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// `prefix` matches case-insensitively and may be followed by digits only
/// (`background`, `Background2`, `background017`).
pub fn matches_prefix(file_stem: &str, prefix: &str) -> bool {
    let (stem, prefix) = (file_stem.to_lowercase(), prefix.to_lowercase());
    match stem.strip_prefix(&prefix) {
        Some(rest) => rest.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

/// All `<prefix><digits>.png` files in `directory`, sorted by name.
pub fn candidates(directory: &Path, prefix: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(directory)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
        })
        .filter(|path| {
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .is_some_and(|stem| matches_prefix(stem, prefix))
        })
        .collect();
    paths.sort();
    Ok(paths)
}

/// Pick one candidate at random and read its dimensions from the header.
/// Any failure leaves the background standing still.
pub fn pick<R: Rng + ?Sized>(directory: &Path, prefix: &str, rng: &mut R) -> Option<Backdrop> {
    let paths = match candidates(directory, prefix) {
        Ok(paths) => paths,
        Err(e) => {
            debug!("Cannot scan {} for backdrops: {}", directory.display(), e);
            return None;
        }
    };

    let Some(path) = paths.choose(rng) else {
        debug!("No {}*.png in {}", prefix, directory.display());
        return None;
    };

    match image::image_dimensions(path) {
        Ok((width, height)) => {
            debug!("Backdrop {} is {}x{}", path.display(), width, height);
            Some(Backdrop {
                path: path.clone(),
                width,
                height,
            })
        }
        Err(e) => {
            debug!("Unreadable backdrop {}: {}", path.display(), e);
            None
        }
    }
}
