//! Declaration identity for nominal types.
//!
//! Classes and enums are compared by the declaration they came from, not by
//! their shape. A [`TypeHash`] is computed from the declaration's qualified
//! name (`main::Point`, `Geometry::Shape`), so the same declaration always
//! hashes to the same value and the identity survives a trip through the
//! text bytecode format.
//!
//! # Examples
//!
//! ```
//! use venice_core::TypeHash;
//!
//! let a = TypeHash::from_name("main::Point");
//! let b = TypeHash::from_name("main::Point");
//! assert_eq!(a, b);
//! assert_ne!(a, TypeHash::from_name("Geometry::Point"));
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain marker mixed into every declaration hash.
const DECLARATION: u64 = 0x2fac10b63a6cc57c;

/// Mixing constant for disambiguating redeclarations under one name.
const GENERATION: u64 = 0x9e3779b97f4a7c15;

/// A deterministic 64-bit identity for a class or enum declaration.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Identity of the builtin `Optional<T>` enum.
    pub const OPTIONAL: TypeHash = TypeHash(0x5ea77ffbcdf5f302);

    /// Hash a qualified declaration name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(DECLARATION ^ xxh64(name.as_bytes(), 0))
    }

    /// Derive a distinct identity for the `generation`-th declaration that
    /// reuses an already-taken qualified name.
    #[inline]
    pub fn with_generation(self, generation: u64) -> Self {
        TypeHash(self.0 ^ GENERATION.wrapping_mul(generation.wrapping_add(1)))
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_same_hash() {
        assert_eq!(
            TypeHash::from_name("main::Shape"),
            TypeHash::from_name("main::Shape")
        );
    }

    #[test]
    fn qualifier_changes_hash() {
        assert_ne!(
            TypeHash::from_name("main::Shape"),
            TypeHash::from_name("Geo::Shape")
        );
    }

    #[test]
    fn generations_are_distinct() {
        let base = TypeHash::from_name("main::Node");
        assert_ne!(base, base.with_generation(0));
        assert_ne!(base.with_generation(0), base.with_generation(1));
    }

    #[test]
    fn builtin_optional_is_not_a_user_name() {
        assert_ne!(TypeHash::OPTIONAL, TypeHash::from_name("main::Optional"));
        assert_ne!(TypeHash::OPTIONAL, TypeHash::from_name("Optional"));
    }

    #[test]
    fn debug_format() {
        let hash = TypeHash(0x1234);
        assert_eq!(format!("{:?}", hash), "TypeHash(0x0000000000001234)");
        assert_eq!(format!("{}", hash), "0x0000000000001234");
    }
}
