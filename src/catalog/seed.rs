use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::config::CatalogSettings;

fn is_audio_file(path: &Path, settings: &CatalogSettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// List the bundled sound file names directly inside `dir`, sorted by name.
///
/// Only the root itself failing to enumerate is an error; unreadable
/// individual entries are skipped.
pub(super) fn scan_bundled(dir: &Path, settings: &CatalogSettings) -> io::Result<Vec<String>> {
    let mut names = Vec::new();

    for entry in WalkDir::new(dir)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(_) => continue,
        };
        if entry.depth() == 0 {
            continue;
        }

        let path = entry.path();
        if path.is_file()
            && (settings.include_hidden || !is_hidden(path))
            && is_audio_file(path, settings)
        {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
    }

    Ok(names)
}
