//! Resources folder import
//!
//! Walks a directory and registers every file in a [`Resources`] store under
//! its logical path: the path relative to the root, `/` separated, without
//! the file extension. `Textures/Logo.png` becomes `Textures/Logo`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::handle::{Asset, AssetType};
use super::storage::{AssetError, Resources, validate_path};
use super::types::{BinaryAsset, Prefab, TextAsset, Texture2D};

/// Resources folder configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcesConfig {
    /// Directory that maps to the empty logical path
    pub root: PathBuf,
    /// Descend into subdirectories
    pub recursive: bool,
    /// Skip files and directories whose name starts with `.`
    pub skip_hidden: bool,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets/Resources"),
            recursive: true,
            skip_hidden: true,
        }
    }
}

impl ResourcesConfig {
    /// Set the root directory
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Enable or disable descending into subdirectories
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Enable or disable skipping hidden entries
    pub fn with_skip_hidden(mut self, skip_hidden: bool) -> Self {
        self.skip_hidden = skip_hidden;
        self
    }

    /// Parse a config from RON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid config
    pub fn from_ron_str(text: &str) -> Result<Self, AssetError> {
        ron::from_str(text).map_err(|e| AssetError::ConfigError(e.to_string()))
    }

    /// Load a config from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let content = fs::read_to_string(path).map_err(|e| AssetError::IoError(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Load a config from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let content = fs::read_to_string(path).map_err(|e| AssetError::IoError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| AssetError::ConfigError(e.to_string()))
    }
}

/// What a file turns into, decided by its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImportKind {
    Text,
    /// Text if it decodes as UTF-8, otherwise binary
    Bytes,
    Texture,
    Prefab,
    Binary,
}

impl ImportKind {
    fn from_extension(ext: Option<&str>) -> Self {
        match ext.map(str::to_ascii_lowercase).as_deref() {
            Some("txt" | "json" | "xml" | "csv" | "md" | "yaml" | "yml" | "html") => Self::Text,
            Some("bytes") => Self::Bytes,
            Some("png" | "jpg" | "jpeg" | "bmp") => Self::Texture,
            Some("ron" | "prefab") => Self::Prefab,
            _ => Self::Binary,
        }
    }
}

/// Per-kind totals of one import pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Text documents
    pub texts: usize,
    /// Decoded images
    pub textures: usize,
    /// Prefabs
    pub prefabs: usize,
    /// Opaque files
    pub binaries: usize,
}

impl ImportSummary {
    /// Total number of imported files
    #[must_use]
    pub fn total(&self) -> usize {
        self.texts + self.textures + self.prefabs + self.binaries
    }
}

impl Resources {
    /// Build a store from a resources folder.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or file cannot be read, or a file
    /// cannot be decoded as its kind
    pub fn load_dir(config: &ResourcesConfig) -> Result<Self, AssetError> {
        let mut store = Self::new();
        store.import_dir(config)?;
        Ok(store)
    }

    /// Import a resources folder into this store.
    ///
    /// # Errors
    ///
    /// See [`Resources::load_dir`]
    pub fn import_dir(&mut self, config: &ResourcesConfig) -> Result<ImportSummary, AssetError> {
        let mut files = Vec::new();
        collect_files(&config.root, config, &mut files)?;
        files.sort();

        let mut summary = ImportSummary::default();
        for file in &files {
            let Some(logical) = logical_path(&config.root, file) else {
                log::warn!("Skipping {} (not a valid resource name)", file.display());
                continue;
            };
            self.import_file(file, logical, &mut summary)?;
        }

        log::info!(
            "Imported {} resource(s) from {} ({} text, {} texture, {} prefab, {} binary)",
            summary.total(),
            config.root.display(),
            summary.texts,
            summary.textures,
            summary.prefabs,
            summary.binaries
        );
        Ok(summary)
    }

    fn import_file(
        &mut self,
        file: &Path,
        logical: String,
        summary: &mut ImportSummary,
    ) -> Result<(), AssetError> {
        let bytes = fs::read(file).map_err(|e| AssetError::IoError(e.to_string()))?;
        let kind = ImportKind::from_extension(file.extension().and_then(|e| e.to_str()));
        log::debug!("Importing {} as {kind:?} at {logical:?}", file.display());

        match kind {
            ImportKind::Text => {
                self.insert_counted(logical, TextAsset::from_bytes(bytes)?, &mut summary.texts)?;
            }
            ImportKind::Bytes => match String::from_utf8(bytes) {
                Ok(text) => {
                    self.insert_counted(logical, TextAsset::new(text), &mut summary.texts)?;
                }
                Err(e) => {
                    let asset = BinaryAsset { bytes: e.into_bytes() };
                    self.insert_counted(logical, asset, &mut summary.binaries)?;
                }
            },
            ImportKind::Texture => {
                let texture = Texture2D::from_bytes(&bytes)?;
                self.insert_counted(logical, texture, &mut summary.textures)?;
            }
            ImportKind::Prefab => {
                let text =
                    String::from_utf8(bytes).map_err(|e| AssetError::DecodeError(e.to_string()))?;
                self.insert_counted(logical, Prefab::from_ron(&text)?, &mut summary.prefabs)?;
            }
            ImportKind::Binary => {
                self.insert_counted(logical, BinaryAsset { bytes }, &mut summary.binaries)?;
            }
        }
        Ok(())
    }

    /// Insert and bump `counter` only if the asset was not already stored
    fn insert_counted<T: Asset>(
        &mut self,
        logical: String,
        asset: T,
        counter: &mut usize,
    ) -> Result<(), AssetError> {
        let before = self.len();
        let handle = self.insert(logical.clone(), asset)?;
        if self.len() > before {
            *counter += 1;
        } else {
            log::warn!(
                "{logical:?} already holds a {}; keeping asset {}",
                AssetType::of::<T>(),
                handle.id()
            );
        }
        Ok(())
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

fn collect_files(
    dir: &Path,
    config: &ResourcesConfig,
    out: &mut Vec<PathBuf>,
) -> Result<(), AssetError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| AssetError::IoError(format!("{}: {e}", dir.display())))?;

    for entry in entries {
        let entry = entry.map_err(|e| AssetError::IoError(e.to_string()))?;
        let path = entry.path();
        if config.skip_hidden && is_hidden(&path) {
            continue;
        }

        // `file_type` does not follow symlinks
        let file_type = entry
            .file_type()
            .map_err(|e| AssetError::IoError(format!("{}: {e}", path.display())))?;
        if file_type.is_dir() {
            if config.recursive {
                collect_files(&path, config, out)?;
            }
        } else if file_type.is_symlink() && path.is_dir() {
            log::debug!("Skipping symlinked directory {}", path.display());
        } else {
            out.push(path);
        }
    }
    Ok(())
}

/// `root/a/b.png` -> `a/b`
fn logical_path(root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?.with_extension("");
    let segments = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    let joined = segments.join("/");
    if joined.is_empty() || validate_path(&joined).is_err() {
        return None;
    }
    Some(joined)
}
