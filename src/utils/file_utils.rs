use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Regular files directly inside `dir` whose name ends in `.<extension>`, sorted by path.
/// Like a `*.png` glob, a bare `.png` matches and a missing directory lists nothing.
pub fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read directory: {}", dir.display()))
        }
    };

    let suffix = format!(".{}", extension);
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .map_or(false, |name| name.as_encoded_bytes().ends_with(suffix.as_bytes()))
        })
        .collect();

    // Sort alphabetically (works for padded numbers like image_001.png)
    files.sort();

    Ok(files)
}

pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))
}
