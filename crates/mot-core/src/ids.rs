//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` to allow
//! direct indexing into external tables via `id.0 as usize`, but callers
//! should prefer the `.index()` helpers for clarity.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" — equivalent to the type's MAX.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a table index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Game-object catalog entry.  One transport template per entry.
    pub struct EntryId(u32);
}

typed_id! {
    /// A world map (continent or instance).
    pub struct MapId(u32);
}

typed_id! {
    /// Index into the taxi-path node table.
    pub struct PathId(u32);
}

typed_id! {
    /// A scripted event fired on node arrival or departure.
    pub struct EventId(u32);
}

typed_id! {
    /// A live world object: carrier, player, creature or game object.
    ///
    /// `u64` matches the guid width of the surrounding server; carriers and
    /// their passengers share this id space, which is what lets a boarded
    /// vehicle appear as a passenger of another carrier.
    pub struct ObjectId(u64);
}
