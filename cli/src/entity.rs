//! Entity directories on disk.
//!
//! An entity directory holds one HTML file per page class. Files are read in
//! file-name order, which is the page-class order, and each file stem names
//! its page class (`1-overview.html` -> `1-overview`).

use std::fs;
use std::path::{Path, PathBuf};

use untable::{EntityPages, HtmlReader};

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
}

/// HTML pages of an entity directory, sorted by file name.
pub fn page_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_html(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Entity directories directly under `root`, sorted by name.
pub fn entity_dirs(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Read an entity directory. The directory name is the entity id.
pub fn read_entity(dir: &Path, reader: &HtmlReader) -> Result<EntityPages, Box<dyn std::error::Error>> {
    let id = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| format!("Not an entity directory: {}", dir.display()))?;

    let files = page_files(dir)?;
    if files.is_empty() {
        log::warn!("{}: no HTML pages", dir.display());
    }

    let mut entity = EntityPages::new(id);
    for file in files {
        let html = fs::read_to_string(&file)?;
        let class = file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        entity.pages.push(reader.read(&html, &class));
    }
    Ok(entity)
}
