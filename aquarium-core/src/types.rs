/// Identifier for a fish in a [`crate::fish::School`].
///
/// This is an index into `School::fish`. Fish are never destroyed, so an id
/// stays valid for the lifetime of a given `School`.
pub type FishId = usize;

/// Identifier for a food crumb.
///
/// Unlike [`FishId`] this is not an index: crumbs are removed from the middle
/// of the active collection, so every crumb gets a fresh number from a
/// monotonic counter and ids are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FoodId(pub u64);
