use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Recursively find PDF files (any case of the `.pdf` extension) under `root`.
///
/// Hidden files and directories are skipped, as is `exclude` (the output
/// directory), so a second run does not pick up files written by the first.
/// Files are returned sorted by name within each directory.
pub fn discover(root: &Path, exclude: Option<&Path>) -> Result<Vec<PathBuf>> {
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || !(is_hidden(entry) || Some(entry.path()) == exclude)
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(err).with_context(|| format!("Failed to scan {}", root.display()));
            }
            Err(err) => {
                log::warn!("{}; skipped", err);
                continue;
            }
        };

        if entry.file_type().is_file() && is_pdf(entry.path()) {
            files.push(entry.into_path());
        }
    }

    log::info!("Found {} PDF file(s) in {}", files.len(), root.display());
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
