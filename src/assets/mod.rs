//! Asset and resource management
//!
//! Provides path-based asset lookup with:
//! - Type-safe and untyped asset handles
//! - An in-memory store that answers single and folder requests
//! - Import of a resources folder from disk

mod handle;
mod import;
mod storage;
mod types;

pub use handle::{Asset, AssetHandle, AssetType, UntypedHandle};
pub use import::{ImportSummary, ResourcesConfig};
pub use storage::{AssetError, AssetSource, Resources, validate_path};
pub use types::{BinaryAsset, Prefab, TextAsset, Texture2D, Transform};
