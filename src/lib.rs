//! Annotation-driven resource loading
//!
//! This crate provides:
//! - Typed and untyped asset handles
//! - A path-based asset store with folder import from disk
//! - `Resource` annotations that fill component members from the store

pub mod assets;
pub mod resource;

// Re-exports for convenience
pub use glam;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::assets::{
        AssetError, AssetHandle, AssetSource, AssetType, Prefab, Resources, ResourcesConfig,
        TextAsset, Texture2D, UntypedHandle,
    };
    pub use crate::resource::{Behaviour, LoadResources, Member, MemberCache, Resource};
}
