//! Declarative resource loading
//!
//! A [`Behaviour`] declares its members once. Members annotated with a
//! [`Resource`] are filled from an [`AssetSource`](crate::assets::AssetSource)
//! by [`LoadResources::load_resources`], with the member list discovered once
//! per type and kept in a [`MemberCache`].

mod attribute;
mod cache;
mod loader;
mod member;

pub use attribute::Resource;
pub use cache::MemberCache;
pub use loader::{LoadResources, populate};
pub use member::{AssetSlot, Behaviour, Loaded, Member, MemberKind, ResourceMember, ValueType};
