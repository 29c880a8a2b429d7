//! Cache Key Namespace
//!
//! Keys have the form `<resource>:<owner>` (optionally followed by more
//! `:`-separated segments). Prefix invalidation matches raw key strings, so
//! every producer and consumer of a key goes through [`CacheKey`].

use std::fmt;

/// Cached resource families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Profile,
    Media,
    Stories,
    Audience,
    Wrapped,
}

impl Resource {
    /// Every resource, in invalidation order.
    pub const ALL: [Resource; 5] = [
        Resource::Profile,
        Resource::Media,
        Resource::Stories,
        Resource::Audience,
        Resource::Wrapped,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Profile => "profile",
            Resource::Media => "media",
            Resource::Stories => "stories",
            Resource::Audience => "audience",
            Resource::Wrapped => "wrapped",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builder for cache keys and owner prefixes.
pub struct CacheKey;

impl CacheKey {
    /// `<resource>:<owner>`
    pub fn owner_prefix(resource: Resource, owner_id: &str) -> String {
        format!("{}:{}", resource, owner_id)
    }

    /// Key for a per-owner resource.
    pub fn for_owner(resource: Resource, owner_id: &str) -> String {
        Self::owner_prefix(resource, owner_id)
    }

    /// `wrapped:<owner>:<year>`, covered by the owner's wrapped prefix.
    pub fn wrapped(owner_id: &str, year: i32) -> String {
        format!("{}:{}", Self::owner_prefix(Resource::Wrapped, owner_id), year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_keys() {
        assert_eq!(CacheKey::for_owner(Resource::Profile, "u1"), "profile:u1");
        assert_eq!(CacheKey::for_owner(Resource::Media, "42"), "media:42");
        assert_eq!(CacheKey::for_owner(Resource::Stories, "42"), "stories:42");
        assert_eq!(CacheKey::for_owner(Resource::Audience, "42"), "audience:42");
    }

    #[test]
    fn test_wrapped_key_shares_owner_prefix() {
        let key = CacheKey::wrapped("u1", 2025);
        assert_eq!(key, "wrapped:u1:2025");
        assert!(key.starts_with(&CacheKey::owner_prefix(Resource::Wrapped, "u1")));
    }

    #[test]
    fn test_all_resources_distinct() {
        let names: std::collections::HashSet<_> =
            Resource::ALL.iter().map(|r| r.as_str()).collect();
        assert_eq!(names.len(), Resource::ALL.len());
    }
}
