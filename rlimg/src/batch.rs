//! Input expansion and size formatting.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rasterload::ImageFormat;

/// Expand input patterns into a deduplicated, sorted list of files.
///
/// Handles:
/// - Glob patterns (containing `*`, `?`, `[`)
/// - Plain file paths (kept even if they are not images, so the load
///   reports why)
/// - Directories (recursive discovery by content signature)
pub fn expand_inputs(patterns: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for pattern in patterns {
        if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
            for entry in glob::glob(pattern)? {
                let path = entry?;
                if path.is_file() && is_image(&path) {
                    push_unique(path, &mut seen, &mut files);
                }
            }
        } else {
            let path = PathBuf::from(pattern);
            if path.is_dir() {
                for_each_image_in_dir(&path, &mut seen, &mut files);
            } else if path.exists() {
                push_unique(path, &mut seen, &mut files);
            } else {
                // let the loader report NotFound for this one
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

fn push_unique(path: PathBuf, seen: &mut HashSet<PathBuf>, files: &mut Vec<PathBuf>) {
    if let Ok(canonical) = path.canonicalize() {
        if seen.insert(canonical) {
            files.push(path);
        }
    }
}

/// Check whether a file starts with a recognized image signature.
pub fn is_image(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };
    matches!(ImageFormat::sniff(&mut BufReader::new(file)), Ok(Some(_)))
}

/// Recursively find image files in a directory.
fn for_each_image_in_dir(dir: &Path, seen: &mut HashSet<PathBuf>, files: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            log::warn!("skipping {}: {e}", dir.display());
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            for_each_image_in_dir(&path, seen, files);
        } else if path.is_file() && is_image(&path) {
            push_unique(path, seen, files);
        }
    }
}

/// Format a byte size into a human-readable string.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(format_size(12), "12 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn missing_plain_path_is_kept() {
        let files = expand_inputs(&["/no/such/image.png".to_string()]).unwrap();
        assert_eq!(files, vec![PathBuf::from("/no/such/image.png")]);
    }

    #[test]
    fn signature_not_extension_decides() {
        let dir = std::env::temp_dir().join(format!("rlimg-batch-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("real.dat"), [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
        std::fs::write(dir.join("fake.png"), b"not an image").unwrap();

        let files = expand_inputs(&[dir.display().to_string()]).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("real.dat"));
    }
}
