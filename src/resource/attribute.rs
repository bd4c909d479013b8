//! The `Resource` annotation

use std::borrow::Cow;

/// Declares that a member is filled from the asset store.
///
/// `name` is the logical asset path. An empty name, or one ending in `/`,
/// names a folder: every asset under it is loaded. With `force_type` the
/// member's declared type is passed to the store as a filter; otherwise the
/// store picks whatever asset lives at the path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resource {
    name: Cow<'static, str>,
    force_type: bool,
}

impl Resource {
    /// Annotation without a type filter
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self::with_force_type(name, false)
    }

    /// Annotation with an explicit force-type flag
    pub fn with_force_type(name: impl Into<Cow<'static, str>>, force_type: bool) -> Self {
        Self {
            name: name.into(),
            force_type,
        }
    }

    /// Annotation that requests the member's declared type
    pub fn forced(name: impl Into<Cow<'static, str>>) -> Self {
        Self::with_force_type(name, true)
    }

    /// Logical asset path
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn force_type(&self) -> bool {
        self.force_type
    }

    /// Whether the name selects a folder rather than one asset
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.name.is_empty() || self.name.ends_with('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let r = Resource::new("Logo");
        assert_eq!(r.name(), "Logo");
        assert!(!r.force_type());
        assert!(Resource::forced("Logo").force_type());
        assert_eq!(Resource::with_force_type("Logo", false), r);
    }

    #[test]
    fn test_folder_names() {
        assert!(Resource::new("").is_folder());
        assert!(Resource::new("Sprites/").is_folder());
        assert!(!Resource::new("Sprites/hero").is_folder());
        assert!(Resource::new(String::from("dyn/")).is_folder());
    }
}
