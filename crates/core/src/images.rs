//! Lookup table of clothing photos found under an image root.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::errors::LoadError;

pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Clone, Debug, Default)]
pub struct ImageIndex {
    root: PathBuf,
    by_relative_path: BTreeMap<String, PathBuf>,
    by_file_name: BTreeMap<String, PathBuf>,
}

impl ImageIndex {
    /// Recursively collects image files below `root`.
    ///
    /// Walk order is sorted by file name, so when two folders hold a file
    /// with the same name the first one in that order wins the by-name lookup.
    pub fn scan(root: impl AsRef<Path>) -> Result<Self, LoadError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(LoadError::ImageRoot { path: root.to_path_buf() });
        }

        let mut by_relative_path = BTreeMap::new();
        let mut by_file_name = BTreeMap::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    warn!(
                        event_name = "images.scan.entry_skipped",
                        root = %root.display(),
                        error = %error,
                        "skipping unreadable entry under image root"
                    );
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_image(entry.path()) {
                continue;
            }

            let path = entry.path().to_path_buf();
            if let Ok(relative) = path.strip_prefix(root) {
                by_relative_path.insert(normalize_reference(&relative.to_string_lossy()), path.clone());
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            by_file_name.entry(file_name).or_insert(path);
        }

        debug!(
            event_name = "images.scan.completed",
            root = %root.display(),
            image_count = by_relative_path.len(),
            "image root scanned"
        );

        Ok(Self { root: root.to_path_buf(), by_relative_path, by_file_name })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.by_relative_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_relative_path.is_empty()
    }

    /// Images by file name, sorted, one per name.
    pub fn files(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.by_file_name.iter().map(|(name, path)| (name.as_str(), path.as_path()))
    }

    /// `path` relative to the root, with forward slashes.
    pub fn relative(&self, path: &Path) -> Option<String> {
        path.strip_prefix(&self.root)
            .ok()
            .map(|relative| normalize_reference(&relative.to_string_lossy()))
    }

    /// Finds an image by its path relative to the root, falling back to its file name.
    pub fn resolve(&self, reference: &str) -> Option<&Path> {
        let normalized = normalize_reference(reference);
        if let Some(path) = self.by_relative_path.get(&normalized) {
            return Some(path);
        }

        let file_name = Path::new(&normalized).file_name()?.to_string_lossy().into_owned();
        self.by_file_name.get(&file_name).map(PathBuf::as_path)
    }
}

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|extension| extension.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|extension| IMAGE_EXTENSIONS.contains(&extension.as_str()))
}

fn normalize_reference(reference: &str) -> String {
    reference.trim().trim_start_matches("./").replace('\\', "/")
}
