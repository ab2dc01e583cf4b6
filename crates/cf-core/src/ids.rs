use core::fmt;
use core::num::NonZeroU32;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Create an id from a 0-based index (stored as index+1).
            pub fn from_index(index: usize) -> Self {
                let raw = u32::try_from(index)
                    .ok()
                    .and_then(|i| i.checked_add(1))
                    .and_then(NonZeroU32::new)
                    .unwrap_or(NonZeroU32::MAX);
                Self(raw)
            }

            /// Recover the 0-based index.
            pub fn index(self) -> usize {
                (self.0.get() - 1) as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.index())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.index())
            }
        }
    };
}

define_id!(
    /// Handle of a connection (stream) owned by a network.
    ConnId,
    "c"
);

define_id!(
    /// Handle of a component owned by a network.
    CompId,
    "u"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_index() {
        for i in [0_usize, 1, 2, 42, 10_000] {
            assert_eq!(ConnId::from_index(i).index(), i);
            assert_eq!(CompId::from_index(i).index(), i);
        }
    }

    #[test]
    fn option_id_is_niche_optimized() {
        assert_eq!(
            core::mem::size_of::<ConnId>(),
            core::mem::size_of::<Option<ConnId>>()
        );
    }

    #[test]
    fn display_prefixes() {
        assert_eq!(ConnId::from_index(3).to_string(), "c3");
        assert_eq!(CompId::from_index(0).to_string(), "u0");
        assert_eq!(format!("{:?}", ConnId::from_index(7)), "ConnId(7)");
    }
}
