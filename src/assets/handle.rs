//! Asset handle implementation
//!
//! Provides type-safe handles for referencing assets without owning them,
//! plus the untyped handle the asset store hands out.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Global counter for generating unique asset IDs
static NEXT_ASSET_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a new unique asset ID
fn next_id() -> u64 {
    NEXT_ASSET_ID.fetch_add(1, Ordering::Relaxed)
}

/// Marker for anything that can live in an asset store.
pub trait Asset: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Asset for T {}

/// Stand-in for "any asset", see [`AssetType::object`].
enum Object {}

/// Runtime identity of an asset type.
#[derive(Debug, Clone, Copy)]
pub struct AssetType {
    id: TypeId,
    name: &'static str,
}

impl AssetType {
    /// The asset type of `T`
    #[must_use]
    pub fn of<T: Asset>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The generic object type: requesting it is the same as requesting
    /// without a type filter.
    #[must_use]
    pub fn object() -> Self {
        Self {
            id: TypeId::of::<Object>(),
            name: "Object",
        }
    }

    /// Whether this is exactly the generic object type
    #[must_use]
    pub fn is_object(&self) -> bool {
        *self == Self::object()
    }

    /// Get the underlying type id
    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Get the readable type name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether an asset of type `actual` satisfies this type as a filter
    #[must_use]
    pub fn accepts(&self, actual: AssetType) -> bool {
        self.is_object() || *self == actual
    }
}

impl PartialEq for AssetType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AssetType {}

impl Hash for AssetType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A strong handle to an asset of type `T`.
///
/// Assets are kept alive as long as at least one `AssetHandle` exists.
/// When all handles are dropped, the asset becomes eligible for cleanup.
#[derive(Debug)]
pub struct AssetHandle<T> {
    /// Unique identifier for this asset
    id: u64,
    /// Reference-counted pointer to the asset
    inner: Arc<T>,
}

impl<T> AssetHandle<T> {
    /// Create a new asset handle wrapping the given value
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            id: next_id(),
            inner: Arc::new(value),
        }
    }

    /// Get the unique ID of this asset
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Get a reference to the underlying asset
    #[must_use]
    pub fn get(&self) -> &T {
        &self.inner
    }
}

impl<T: Asset> AssetHandle<T> {
    /// Erase the type, keeping the same asset id
    #[must_use]
    pub fn untyped(&self) -> UntypedHandle {
        UntypedHandle {
            id: self.id,
            ty: AssetType::of::<T>(),
            inner: Arc::clone(&self.inner) as Arc<dyn Any + Send + Sync>,
        }
    }
}

impl<T> Clone for AssetHandle<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for AssetHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for AssetHandle<T> {}

impl<T> Hash for AssetHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> std::ops::Deref for AssetHandle<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// A handle to an asset of any type.
///
/// This is the reference the asset store returns; typed members get an
/// [`AssetHandle`] back through [`UntypedHandle::typed`].
#[derive(Clone)]
pub struct UntypedHandle {
    id: u64,
    ty: AssetType,
    inner: Arc<dyn Any + Send + Sync>,
}

impl UntypedHandle {
    /// Wrap a freshly created asset
    #[must_use]
    pub fn new<T: Asset>(value: T) -> Self {
        AssetHandle::new(value).untyped()
    }

    /// Get the unique ID of this asset
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Get the concrete type of the asset
    #[must_use]
    pub const fn asset_type(&self) -> AssetType {
        self.ty
    }

    /// Check whether the asset is a `T`
    #[must_use]
    pub fn is<T: Asset>(&self) -> bool {
        self.ty == AssetType::of::<T>()
    }

    /// Borrow the asset as a `T`
    #[must_use]
    pub fn downcast_ref<T: Asset>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Recover the typed handle; the id is preserved.
    ///
    /// Returns `None` if the asset is not a `T`.
    #[must_use]
    pub fn typed<T: Asset>(&self) -> Option<AssetHandle<T>> {
        Arc::clone(&self.inner)
            .downcast::<T>()
            .ok()
            .map(|inner| AssetHandle { id: self.id, inner })
    }
}

impl fmt::Debug for UntypedHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UntypedHandle")
            .field("id", &self.id)
            .field("type", &self.ty.name())
            .finish()
    }
}

impl PartialEq for UntypedHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for UntypedHandle {}

impl Hash for UntypedHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_clone() {
        let handle1 = AssetHandle::new("test".to_string());
        let handle2 = handle1.clone();
        assert_eq!(handle1.id(), handle2.id());
        assert_eq!(handle1, handle2);
        assert_ne!(handle1, AssetHandle::new("test".to_string()));
    }

    #[test]
    fn test_untyped_round_trip_keeps_id() {
        let handle = AssetHandle::new(42_i32);
        let untyped = handle.untyped();

        assert_eq!(untyped.id(), handle.id());
        assert!(untyped.is::<i32>());
        assert_eq!(untyped.typed::<i32>(), Some(handle));
        assert!(untyped.typed::<u8>().is_none());
    }

    #[test]
    fn test_object_type_is_a_sentinel() {
        let object = AssetType::object();
        assert!(object.is_object());
        assert!(!AssetType::of::<String>().is_object());
        assert!(object.accepts(AssetType::of::<String>()));
        assert!(AssetType::of::<String>().accepts(AssetType::of::<String>()));
        assert!(!AssetType::of::<String>().accepts(AssetType::of::<u32>()));
    }
}
