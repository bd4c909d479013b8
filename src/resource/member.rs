//! Member declarations
//!
//! A [`Behaviour`] lists its members once as [`Member`] values: name, kind,
//! value type, a typed writer and any attached [`Resource`] annotations.
//! Discovery in [`MemberCache`](super::MemberCache) filters that list down to
//! [`ResourceMember`] descriptors.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use super::attribute::Resource;
use crate::assets::{Asset, AssetHandle, AssetType, UntypedHandle};

/// Writes a loaded value into one member of `H`
type Writer<H> = Arc<dyn Fn(&mut H, Loaded) + Send + Sync>;

/// Kind of a declared member; fields sort before properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MemberKind {
    /// Plain storage slot
    Field,
    /// Accessor pair
    Property,
}

/// Declared value type of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// A single asset reference
    Asset(AssetType),
    /// An array of asset references
    AssetArray(AssetType),
    /// Anything the asset store cannot produce
    Other(&'static str),
}

impl ValueType {
    /// Element type for asset members, `None` for everything else
    #[must_use]
    pub const fn element(&self) -> Option<AssetType> {
        match self {
            Self::Asset(ty) | Self::AssetArray(ty) => Some(*ty),
            Self::Other(_) => None,
        }
    }

    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::AssetArray(_))
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asset(ty) => write!(f, "{ty}"),
            Self::AssetArray(ty) => write!(f, "[{ty}]"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// A value coming back from the asset store
#[derive(Debug, Clone)]
pub enum Loaded {
    /// Result of a single-asset request; `None` when nothing was found
    One(Option<UntypedHandle>),
    /// Result of a folder request
    Many(Vec<UntypedHandle>),
}

/// A member type the loader knows how to fill.
///
/// `None` is the unassigned state, so a folder member that found nothing can
/// be told apart from one that was given an empty list.
pub trait AssetSlot: Sized + 'static {
    /// The declared value type
    fn value_type() -> ValueType;

    /// Build the member value from a store result
    fn from_loaded(loaded: Loaded) -> Self;
}

fn typed_or_warn<T: Asset>(handle: &UntypedHandle) -> Option<AssetHandle<T>> {
    let typed = handle.typed::<T>();
    if typed.is_none() {
        log::warn!(
            "Asset {} is a {}, expected {}",
            handle.id(),
            handle.asset_type(),
            AssetType::of::<T>()
        );
    }
    typed
}

impl<T: Asset> AssetSlot for Option<AssetHandle<T>> {
    fn value_type() -> ValueType {
        ValueType::Asset(AssetType::of::<T>())
    }

    fn from_loaded(loaded: Loaded) -> Self {
        match loaded {
            Loaded::One(handle) => handle.as_ref().and_then(typed_or_warn::<T>),
            // Folder results are never assigned to scalar members
            Loaded::Many(_) => None,
        }
    }
}

impl AssetSlot for Option<UntypedHandle> {
    fn value_type() -> ValueType {
        ValueType::Asset(AssetType::object())
    }

    fn from_loaded(loaded: Loaded) -> Self {
        match loaded {
            Loaded::One(handle) => handle,
            Loaded::Many(_) => None,
        }
    }
}

impl<T: Asset> AssetSlot for Option<Vec<AssetHandle<T>>> {
    fn value_type() -> ValueType {
        ValueType::AssetArray(AssetType::of::<T>())
    }

    fn from_loaded(loaded: Loaded) -> Self {
        match loaded {
            Loaded::One(handle) => handle.as_ref().and_then(typed_or_warn::<T>).map(|h| vec![h]),
            Loaded::Many(handles) => Some(handles.iter().filter_map(typed_or_warn::<T>).collect()),
        }
    }
}

impl AssetSlot for Option<Vec<UntypedHandle>> {
    fn value_type() -> ValueType {
        ValueType::AssetArray(AssetType::object())
    }

    fn from_loaded(loaded: Loaded) -> Self {
        match loaded {
            Loaded::One(handle) => handle.map(|h| vec![h]),
            Loaded::Many(handles) => Some(handles),
        }
    }
}

/// One declared member of `H`
pub struct Member<H> {
    name: &'static str,
    kind: MemberKind,
    value: ValueType,
    writer: Option<Writer<H>>,
    resources: SmallVec<[Resource; 1]>,
}

impl<H: 'static> Member<H> {
    /// A field reached through `accessor`
    pub fn field<S: AssetSlot>(name: &'static str, accessor: fn(&mut H) -> &mut S) -> Self {
        Self {
            name,
            kind: MemberKind::Field,
            value: S::value_type(),
            writer: Some(Arc::new(move |host: &mut H, loaded: Loaded| {
                *accessor(host) = S::from_loaded(loaded);
            })),
            resources: SmallVec::new(),
        }
    }

    /// A property written through `setter`
    pub fn property<S: AssetSlot>(name: &'static str, setter: fn(&mut H, S)) -> Self {
        Self {
            name,
            kind: MemberKind::Property,
            value: S::value_type(),
            writer: Some(Arc::new(move |host: &mut H, loaded: Loaded| {
                setter(host, S::from_loaded(loaded));
            })),
            resources: SmallVec::new(),
        }
    }

    /// A property without a setter
    pub fn read_only<S: AssetSlot>(name: &'static str) -> Self {
        Self {
            name,
            kind: MemberKind::Property,
            value: S::value_type(),
            writer: None,
            resources: SmallVec::new(),
        }
    }

    /// A member whose type the asset store cannot produce
    pub fn opaque(name: &'static str, kind: MemberKind, type_name: &'static str) -> Self {
        Self {
            name,
            kind,
            value: ValueType::Other(type_name),
            writer: None,
            resources: SmallVec::new(),
        }
    }

    /// Attach a `Resource` annotation
    #[must_use]
    pub fn with(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    /// Lift the members of an embedded base `P` into `H`.
    ///
    /// Writers go through `project` to reach the base.
    pub fn inherit<P: 'static>(members: Vec<Member<P>>, project: fn(&mut H) -> &mut P) -> Vec<Self> {
        members
            .into_iter()
            .map(|member| Self {
                name: member.name,
                kind: member.kind,
                value: member.value,
                writer: member.writer.map(|write| {
                    Arc::new(move |host: &mut H, loaded: Loaded| write(project(host), loaded))
                        as Writer<H>
                }),
                resources: member.resources,
            })
            .collect()
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn kind(&self) -> MemberKind {
        self.kind
    }

    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        self.value
    }

    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.writer.is_some()
    }

    /// Annotations attached to this member
    #[must_use]
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Turn into a descriptor if the member is loadable.
    ///
    /// Loadable means: asset-typed, writable and carrying exactly one
    /// annotation. The error names the first failed condition.
    pub(crate) fn into_descriptor(self) -> Result<ResourceMember<H>, (&'static str, &'static str)> {
        let Some(element) = self.value.element() else {
            return Err((self.name, "not an asset type"));
        };
        let Some(writer) = self.writer else {
            return Err((self.name, "read-only"));
        };
        let [resource] = <[Resource; 1]>::try_from(self.resources.into_vec())
            .map_err(|_| (self.name, "needs exactly one Resource annotation"))?;

        Ok(ResourceMember {
            name: self.name,
            kind: self.kind,
            value: self.value,
            element,
            resource,
            writer,
        })
    }
}

impl<H> fmt::Debug for Member<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("value", &self.value)
            .field("writable", &self.writer.is_some())
            .field("resources", &self.resources)
            .finish()
    }
}

/// A discovered, loadable member
pub struct ResourceMember<H> {
    name: &'static str,
    kind: MemberKind,
    value: ValueType,
    element: AssetType,
    resource: Resource,
    writer: Writer<H>,
}

impl<H> ResourceMember<H> {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Declared value type
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        self.value
    }

    /// Array element type, or the declared type for scalars
    #[must_use]
    pub const fn element_type(&self) -> AssetType {
        self.element
    }

    #[must_use]
    pub const fn is_array(&self) -> bool {
        self.value.is_array()
    }

    /// The member's annotation
    #[must_use]
    pub const fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Write a loaded value into `host`
    pub fn assign(&self, host: &mut H, loaded: Loaded) {
        (self.writer)(host, loaded);
    }
}

impl<H> fmt::Debug for ResourceMember<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceMember")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("value", &self.value)
            .field("resource", &self.resource)
            .finish()
    }
}

/// A type whose members can be populated from the asset store.
///
/// `members` is the declaration table; it is read once per type by
/// [`MemberCache`](super::MemberCache).
pub trait Behaviour: Sized + 'static {
    /// Every member of the type, annotated or not
    fn members() -> Vec<Member<Self>>;
}
