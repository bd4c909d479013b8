//! Resource population
//!
//! Walks the cached members of a host and fills each from the asset store.
//!
//! # Modes
//!
//! - **Folder**: the annotation name is empty or ends in `/`. Every asset
//!   under the path is requested, filtered by the member's element type. An
//!   empty result leaves the member as it was. Results are only assigned to
//!   array members.
//! - **Single**: anything else. One asset is requested by path, with the
//!   declared type as filter only when `force_type` is set. The result is
//!   assigned even when nothing was found, clearing the member.
//!
//! # Example
//!
//! ```ignore
//! let cache = MemberCache::new();
//! let store = Resources::load_dir(&ResourcesConfig::default())?;
//!
//! let mut tester = Tester::default();
//! tester.load_resources(&cache, &store)?;
//! ```

use crate::assets::{AssetError, AssetSource, AssetType};

use super::cache::MemberCache;
use super::member::{Behaviour, Loaded, ResourceMember};

/// Fill every loadable member of `host` from `source`.
///
/// # Errors
///
/// Returns the first error reported by `source`. Members processed before
/// the failure keep their new values.
pub fn populate<H, S>(cache: &MemberCache, source: &S, host: &mut H) -> Result<(), AssetError>
where
    H: Behaviour,
    S: AssetSource + ?Sized,
{
    let members = cache.resolve::<H>();
    for member in members.iter() {
        populate_member(source, host, member)?;
    }
    Ok(())
}

fn populate_member<H, S>(
    source: &S,
    host: &mut H,
    member: &ResourceMember<H>,
) -> Result<(), AssetError>
where
    S: AssetSource + ?Sized,
{
    let resource = member.resource();
    let element = member.element_type();

    if resource.is_folder() {
        let filter = (!element.is_object()).then_some(element);
        let found = source.load_all(resource.name(), filter)?;

        if found.is_empty() {
            log::debug!("{}: nothing under {:?}", member.name(), resource.name());
            return Ok(());
        }
        if !member.is_array() {
            // Loaded but never assigned: a folder result has no scalar form.
            log::debug!(
                "{}: discarding {} asset(s) from {:?} (member is not an array)",
                member.name(),
                found.len(),
                resource.name()
            );
            return Ok(());
        }

        log::trace!("{}: assigning {} asset(s)", member.name(), found.len());
        member.assign(host, Loaded::Many(found));
    } else {
        let filter: Option<AssetType> = resource.force_type().then_some(element);
        let found = source.load_one(resource.name(), filter)?;

        if found.is_none() {
            log::debug!("{}: {:?} not found", member.name(), resource.name());
        }
        member.assign(host, Loaded::One(found));
    }
    Ok(())
}

/// Extension for loading resources straight from a host value.
pub trait LoadResources {
    /// Fill every loadable member from `source`; see [`populate`].
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `source`
    fn load_resources<S: AssetSource + ?Sized>(
        &mut self,
        cache: &MemberCache,
        source: &S,
    ) -> Result<(), AssetError>;
}

impl<H: Behaviour> LoadResources for H {
    fn load_resources<S: AssetSource + ?Sized>(
        &mut self,
        cache: &MemberCache,
        source: &S,
    ) -> Result<(), AssetError> {
        populate(cache, source, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetHandle, Resources, UntypedHandle};
    use crate::resource::{Member, Resource};

    use std::cell::RefCell;

    /// Records every request and answers from a `Resources` store
    #[derive(Default)]
    struct Recording {
        store: Resources,
        calls: RefCell<Vec<(String, String, Option<AssetType>)>>,
    }

    impl AssetSource for Recording {
        fn load_one(
            &self,
            path: &str,
            ty: Option<AssetType>,
        ) -> Result<Option<UntypedHandle>, AssetError> {
            self.calls.borrow_mut().push(("one".into(), path.into(), ty));
            self.store.load_one(path, ty)
        }

        fn load_all(
            &self,
            path: &str,
            ty: Option<AssetType>,
        ) -> Result<Vec<UntypedHandle>, AssetError> {
            self.calls.borrow_mut().push(("all".into(), path.into(), ty));
            self.store.load_all(path, ty)
        }
    }

    #[derive(Debug, PartialEq)]
    struct Sprite(u8);

    #[derive(Default)]
    struct Host {
        single: Option<UntypedHandle>,
        forced: Option<AssetHandle<Sprite>>,
        sprites: Option<Vec<AssetHandle<Sprite>>>,
        objects: Option<Vec<UntypedHandle>>,
        scalar_from_folder: Option<AssetHandle<Sprite>>,
    }

    impl Behaviour for Host {
        fn members() -> Vec<Member<Self>> {
            vec![
                Member::field("single", |h: &mut Self| &mut h.single)
                    .with(Resource::new("Foo/Bar")),
                Member::field("forced", |h: &mut Self| &mut h.forced)
                    .with(Resource::forced("Foo/Bar")),
                Member::field("sprites", |h: &mut Self| &mut h.sprites)
                    .with(Resource::new("Folder/")),
                Member::field("objects", |h: &mut Self| &mut h.objects).with(Resource::new("")),
                Member::field("scalar_from_folder", |h: &mut Self| &mut h.scalar_from_folder)
                    .with(Resource::new("Folder/")),
            ]
        }
    }

    fn source() -> (Recording, AssetHandle<String>, Vec<AssetHandle<Sprite>>) {
        let mut source = Recording::default();
        let text = source.store.insert("Foo/Bar", "bar".to_string()).unwrap();
        source.store.insert("Foo/Bar", Sprite(9)).unwrap();
        let sprites = vec![
            source.store.insert("Folder/a", Sprite(1)).unwrap(),
            source.store.insert("Folder/b", Sprite(2)).unwrap(),
            source.store.insert("Folder/c", Sprite(3)).unwrap(),
        ];
        (source, text, sprites)
    }

    #[test]
    fn test_single_mode_assigns_store_result() {
        let (source, text, _) = source();
        let cache = MemberCache::new();
        let mut host = Host::default();

        host.load_resources(&cache, &source).unwrap();

        assert_eq!(host.single, Some(text.untyped()));
        assert_eq!(host.forced.as_deref(), Some(&Sprite(9)));
    }

    #[test]
    fn test_single_mode_not_found_clears_member() {
        let cache = MemberCache::new();
        let store = Resources::new();
        let mut host = Host {
            single: Some(UntypedHandle::new(5_u32)),
            forced: Some(AssetHandle::new(Sprite(0))),
            ..Default::default()
        };

        populate(&cache, &store, &mut host).unwrap();

        assert!(host.single.is_none());
        assert!(host.forced.is_none());
    }

    #[test]
    fn test_folder_mode_fills_typed_array_in_order() {
        let (source, _, sprites) = source();
        let cache = MemberCache::new();
        let mut host = Host::default();

        host.load_resources(&cache, &source).unwrap();

        assert_eq!(host.sprites, Some(sprites));
    }

    #[test]
    fn test_folder_mode_object_array_is_unfiltered() {
        let (source, _, _) = source();
        let cache = MemberCache::new();
        let mut host = Host::default();

        host.load_resources(&cache, &source).unwrap();

        assert_eq!(host.objects.map(|o| o.len()), Some(source.store.len()));
        let calls = source.calls.borrow();
        assert!(calls.contains(&("all".into(), String::new(), None)));
        assert!(calls.contains(&("all".into(), "Folder/".into(), Some(AssetType::of::<Sprite>()))));
    }

    #[test]
    fn test_folder_mode_empty_leaves_member_untouched() {
        let cache = MemberCache::new();
        let store = Resources::new();
        let previous = vec![AssetHandle::new(Sprite(7))];
        let mut host = Host {
            sprites: Some(previous.clone()),
            ..Default::default()
        };

        populate(&cache, &store, &mut host).unwrap();

        assert_eq!(host.sprites, Some(previous));
        assert!(host.objects.is_none());
    }

    #[test]
    fn test_folder_mode_scalar_member_is_not_assigned() {
        let (source, _, _) = source();
        let cache = MemberCache::new();
        let previous = AssetHandle::new(Sprite(7));
        let mut host = Host {
            scalar_from_folder: Some(previous.clone()),
            ..Default::default()
        };

        host.load_resources(&cache, &source).unwrap();

        assert_eq!(host.scalar_from_folder, Some(previous));
        let calls = source.calls.borrow();
        let folder_loads = calls
            .iter()
            .filter(|call| **call == ("all".into(), "Folder/".into(), Some(AssetType::of::<Sprite>())))
            .count();
        // One for `sprites`, one for `scalar_from_folder`
        assert_eq!(folder_loads, 2);
    }

    #[test]
    fn test_force_type_flag_controls_filter() {
        let (source, _, _) = source();
        let cache = MemberCache::new();
        let mut host = Host::default();

        host.load_resources(&cache, &source).unwrap();

        let calls = source.calls.borrow();
        let singles: Vec<_> = calls.iter().filter(|(kind, _, _)| kind == "one").collect();
        assert_eq!(singles.len(), 2);
        // Members run in name order: "forced" before "single"
        assert_eq!(singles[0].2, Some(AssetType::of::<Sprite>()));
        assert_eq!(singles[1].2, None);
    }

    #[test]
    fn test_forced_array_in_single_mode_filters_by_element() {
        #[derive(Default)]
        struct Forced {
            sprites: Option<Vec<AssetHandle<Sprite>>>,
        }

        impl Behaviour for Forced {
            fn members() -> Vec<Member<Self>> {
                vec![Member::field("sprites", |f: &mut Self| &mut f.sprites)
                    .with(Resource::forced("Foo/Bar"))]
            }
        }

        let (source, _, _) = source();
        let cache = MemberCache::new();
        let mut forced = Forced::default();

        forced.load_resources(&cache, &source).unwrap();

        assert_eq!(
            *source.calls.borrow(),
            vec![("one".to_string(), "Foo/Bar".to_string(), Some(AssetType::of::<Sprite>()))]
        );
        let sprites = forced.sprites.unwrap();
        assert_eq!(sprites.len(), 1);
        assert_eq!(*sprites[0], Sprite(9));
    }

    #[test]
    fn test_store_errors_propagate() {
        struct Bad {
            x: Option<UntypedHandle>,
        }

        impl Behaviour for Bad {
            fn members() -> Vec<Member<Self>> {
                vec![Member::field("x", |b: &mut Self| &mut b.x).with(Resource::new("../escape"))]
            }
        }

        let cache = MemberCache::new();
        let store = Resources::new();
        let mut bad = Bad { x: None };
        let err = bad.load_resources(&cache, &store).unwrap_err();
        assert!(bad.x.is_none());
        assert_eq!(err, AssetError::InvalidPath("../escape".into()));
    }
}
