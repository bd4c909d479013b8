//! Per-type member cache
//!
//! Discovery reads a type's declaration table, keeps the loadable members and
//! sorts them. It runs at most once per type for the lifetime of the cache;
//! every later lookup returns the same shared list.

use std::any::{Any, TypeId};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::member::{Behaviour, ResourceMember};

/// Registry of discovered members, keyed by host type.
///
/// Construct one at startup and hand it to every call site that loads
/// resources. Entries are never evicted.
#[derive(Default)]
pub struct MemberCache {
    /// `TypeId` of `H` -> `Arc<[ResourceMember<H>]>`
    entries: RwLock<FxHashMap<TypeId, Box<dyn Any + Send + Sync>>>,
    /// Number of discovery passes run so far
    scans: AtomicUsize,
}

impl MemberCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loadable members of `H`, in processing order.
    ///
    /// The first call for a type runs discovery; concurrent first calls are
    /// serialized so the scan still happens once.
    pub fn resolve<H: Behaviour>(&self) -> Arc<[ResourceMember<H>]> {
        let type_id = TypeId::of::<H>();

        if let Some(members) = self.entries.read().get(&type_id).and_then(|e| downcast::<H>(&**e)) {
            return members;
        }

        let mut entries = self.entries.write();
        if let Some(members) = entries.get(&type_id).and_then(|e| downcast::<H>(&**e)) {
            return members;
        }

        let members = self.discover::<H>();
        entries.insert(type_id, Box::new(Arc::clone(&members)));
        members
    }

    fn discover<H: Behaviour>(&self) -> Arc<[ResourceMember<H>]> {
        self.scans.fetch_add(1, Ordering::Relaxed);

        let mut members: Vec<ResourceMember<H>> = H::members()
            .into_iter()
            .filter_map(|member| match member.into_descriptor() {
                Ok(descriptor) => Some(descriptor),
                Err((name, reason)) => {
                    log::trace!("{}::{name} skipped: {reason}", std::any::type_name::<H>());
                    None
                }
            })
            .collect();
        members.sort_by(|a, b| a.kind().cmp(&b.kind()).then_with(|| a.name().cmp(b.name())));

        log::debug!(
            "Discovered {} resource member(s) on {}",
            members.len(),
            std::any::type_name::<H>()
        );
        members.into()
    }

    /// Whether discovery has run for `H`
    #[must_use]
    pub fn contains<H: Behaviour>(&self) -> bool {
        self.entries.read().contains_key(&TypeId::of::<H>())
    }

    /// Number of cached types
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Total discovery passes run by this cache
    #[must_use]
    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::Relaxed)
    }
}

fn downcast<H: Behaviour>(entry: &(dyn Any + Send + Sync)) -> Option<Arc<[ResourceMember<H>]>> {
    entry.downcast_ref::<Arc<[ResourceMember<H>]>>().cloned()
}
