//! Asset storage and lookup
//!
//! Provides the [`AssetSource`] contract the resource loader talks to and
//! [`Resources`], an in-memory store keyed by logical path.

use std::collections::BTreeMap;
use std::ops::Bound;

use smallvec::SmallVec;

use super::handle::{Asset, AssetHandle, AssetType, UntypedHandle};

/// Something the resource loader can pull assets from.
///
/// "Not found" is never an error: `load_one` answers `Ok(None)` and
/// `load_all` answers an empty list. Errors are reserved for failures of the
/// store itself, such as a malformed path.
pub trait AssetSource {
    /// Load exactly one asset by logical path.
    ///
    /// With a type filter, only an asset of that type qualifies. A filter of
    /// [`AssetType::object`] behaves like no filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot serve the request
    fn load_one(&self, path: &str, ty: Option<AssetType>)
    -> Result<Option<UntypedHandle>, AssetError>;

    /// Load every asset whose logical path lies under `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot serve the request
    fn load_all(&self, path: &str, ty: Option<AssetType>) -> Result<Vec<UntypedHandle>, AssetError>;
}

impl<S: AssetSource + ?Sized> AssetSource for &S {
    fn load_one(
        &self,
        path: &str,
        ty: Option<AssetType>,
    ) -> Result<Option<UntypedHandle>, AssetError> {
        (**self).load_one(path, ty)
    }

    fn load_all(&self, path: &str, ty: Option<AssetType>) -> Result<Vec<UntypedHandle>, AssetError> {
        (**self).load_all(path, ty)
    }
}

/// Check a logical path.
///
/// Paths are `/` separated and relative. A single trailing `/` marks a
/// folder; the empty path is the root folder.
///
/// # Errors
///
/// Returns [`AssetError::InvalidPath`] for absolute paths, backslashes,
/// `.`/`..` segments and empty segments
pub fn validate_path(path: &str) -> Result<(), AssetError> {
    if path.is_empty() {
        return Ok(());
    }
    if path.starts_with('/') || path.contains('\\') {
        return Err(AssetError::InvalidPath(path.to_string()));
    }

    let body = path.strip_suffix('/').unwrap_or(path);
    if body
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(AssetError::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// In-memory asset store keyed by logical path.
///
/// Several assets of different types may share one path. Paths iterate in
/// lexical order, which makes folder loads deterministic.
#[derive(Debug, Default)]
pub struct Resources {
    /// Assets per logical path, in registration order
    entries: BTreeMap<String, SmallVec<[UntypedHandle; 1]>>,
    /// Total number of stored assets
    count: usize,
}

impl Resources {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset under a logical path and return a handle to it.
    ///
    /// If an asset of the same type is already stored at that path, the
    /// existing handle is returned and `asset` is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is malformed or names a folder
    pub fn insert<T: Asset>(
        &mut self,
        path: impl Into<String>,
        asset: T,
    ) -> Result<AssetHandle<T>, AssetError> {
        let path = path.into();
        validate_path(&path)?;
        if path.is_empty() || path.ends_with('/') {
            return Err(AssetError::InvalidPath(path));
        }

        let slot = self.entries.entry(path).or_default();
        if let Some(existing) = slot.iter().find_map(UntypedHandle::typed::<T>) {
            return Ok(existing);
        }

        let handle = AssetHandle::new(asset);
        slot.push(handle.untyped());
        self.count += 1;
        Ok(handle)
    }

    /// Get an asset of type `T` stored at exactly `path`
    #[must_use]
    pub fn get<T: Asset>(&self, path: &str) -> Option<AssetHandle<T>> {
        self.entries
            .get(path)
            .and_then(|slot| slot.iter().find_map(UntypedHandle::typed::<T>))
    }

    /// Check if anything is stored at exactly `path`
    #[must_use]
    pub fn contains_path(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Remove every asset stored at `path`
    ///
    /// Returns the number of assets removed
    pub fn remove(&mut self, path: &str) -> usize {
        let removed = self.entries.remove(path).map_or(0, |slot| slot.len());
        self.count -= removed;
        removed
    }

    /// Get the number of stored assets
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Clear all assets
    pub fn clear(&mut self) {
        self.entries.clear();
        self.count = 0;
    }

    /// Iterate over all logical paths in order
    pub fn paths(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }
}

/// A filter of `None` or the object type lets everything through.
fn matches(filter: Option<AssetType>, handle: &UntypedHandle) -> bool {
    filter.is_none_or(|ty| ty.accepts(handle.asset_type()))
}

impl AssetSource for Resources {
    fn load_one(
        &self,
        path: &str,
        ty: Option<AssetType>,
    ) -> Result<Option<UntypedHandle>, AssetError> {
        validate_path(path)?;
        Ok(self
            .entries
            .get(path)
            .and_then(|slot| slot.iter().find(|handle| matches(ty, handle)))
            .cloned())
    }

    fn load_all(&self, path: &str, ty: Option<AssetType>) -> Result<Vec<UntypedHandle>, AssetError> {
        validate_path(path)?;

        let found: Vec<UntypedHandle> = self
            .entries
            .range::<str, _>((Bound::Included(path), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(path))
            .flat_map(|(_, slot)| slot.iter())
            .filter(|handle| matches(ty, handle))
            .cloned()
            .collect();

        log::trace!("load_all({path:?}) found {} asset(s)", found.len());
        Ok(found)
    }
}

/// Errors that can occur in the asset layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// The logical path is malformed
    InvalidPath(String),
    /// IO error while importing
    IoError(String),
    /// Error decoding asset data
    DecodeError(String),
    /// Error reading configuration
    ConfigError(String),
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPath(p) => write!(f, "Invalid asset path: {p:?}"),
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::DecodeError(e) => write!(f, "Decode error: {e}"),
            Self::ConfigError(e) => write!(f, "Config error: {e}"),
        }
    }
}

impl std::error::Error for AssetError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Resources {
        let mut store = Resources::new();
        store.insert("Logo", "logo text".to_string()).unwrap();
        store.insert("Logo", 7_u32).unwrap();
        store.insert("Sprites/b", 2_u32).unwrap();
        store.insert("Sprites/a", 1_u32).unwrap();
        store.insert("Sprites/readme", "hi".to_string()).unwrap();
        store.insert("SpritesExtra", 3_u32).unwrap();
        store
    }

    #[test]
    fn test_insert_deduplicates_per_type() {
        let mut store = Resources::new();
        let first = store.insert("test/asset", 42_i32).unwrap();
        let second = store.insert("test/asset", 100_i32).unwrap();

        assert_eq!(first.id(), second.id());
        assert_eq!(*second.get(), 42);
        assert_eq!(store.len(), 1);

        store.insert("test/asset", "other".to_string()).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_insert_rejects_folder_paths() {
        let mut store = Resources::new();
        assert!(store.insert("", 1_u8).is_err());
        assert!(store.insert("dir/", 1_u8).is_err());
        assert!(store.insert("../up", 1_u8).is_err());
    }

    #[test]
    fn test_load_one_without_filter_returns_first_registered() {
        let store = sample();
        let found = store.load_one("Logo", None).unwrap().unwrap();
        assert!(found.is::<String>());
    }

    #[test]
    fn test_load_one_with_filter() {
        let store = sample();
        let found = store
            .load_one("Logo", Some(AssetType::of::<u32>()))
            .unwrap()
            .unwrap();
        assert_eq!(found.downcast_ref::<u32>(), Some(&7));

        let object = store.load_one("Logo", Some(AssetType::object())).unwrap();
        assert!(object.unwrap().is::<String>());

        assert!(store.load_one("Logo", Some(AssetType::of::<f64>())).unwrap().is_none());
    }

    #[test]
    fn test_load_one_missing_is_not_an_error() {
        let store = sample();
        assert_eq!(store.load_one("Nope", None), Ok(None));
    }

    #[test]
    fn test_load_all_folder_is_ordered_and_filtered() {
        let store = sample();
        let found = store.load_all("Sprites/", Some(AssetType::of::<u32>())).unwrap();
        let values: Vec<u32> = found.iter().map(|h| *h.downcast_ref::<u32>().unwrap()).collect();
        assert_eq!(values, vec![1, 2]);

        let everything = store.load_all("Sprites/", None).unwrap();
        assert_eq!(everything.len(), 3);
    }

    #[test]
    fn test_load_all_root_returns_everything() {
        let store = sample();
        assert_eq!(store.load_all("", None).unwrap().len(), store.len());
        assert!(store.load_all("Missing/", None).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_paths_are_errors() {
        let store = sample();
        for path in ["/abs", "a\\b", "a//b", "./a", "a/../b"] {
            assert_eq!(
                store.load_one(path, None),
                Err(AssetError::InvalidPath(path.to_string()))
            );
        }
        assert!(store.load_all("a//", None).is_err());
    }

    #[test]
    fn test_remove_and_clear() {
        let mut store = sample();
        assert_eq!(store.remove("Logo"), 2);
        assert!(!store.contains_path("Logo"));
        assert_eq!(store.len(), 4);

        store.clear();
        assert!(store.is_empty());
    }
}
