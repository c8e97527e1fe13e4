//! Catalog records addressed by a typed id.

/// Anything the catalog stores and looks up by id. Ids are small `Copy`
/// integers, so they are returned by value and can be used as sort keys.
pub trait Entity {
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> Self::Id;
}
