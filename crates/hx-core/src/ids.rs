//! Strongly typed, zero-cost identifier wrappers.
//!
//! Input tables key everything by external string ids (`"10045"`,
//! `"1234_0"`, …).  Loaders intern those strings once and hand out dense
//! indices, so every store downstream is a plain `Vec` indexed by
//! `id.index()`.  The external name stays on the owning record for export.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
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

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a reconstructed agent in a `Population`.
    pub struct AgentId(u32);
}

typed_id! {
    /// Index of a network node.
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a directed network link.
    pub struct LinkId(u32);
}

typed_id! {
    /// Index of a land-use parcel.
    pub struct ParcelId(u32);
}

typed_id! {
    /// Index of a temperature curve in a `CurveStore`.
    pub struct CurveId(u32);
}
