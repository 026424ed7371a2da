use core::fmt;
use core::num::NonZeroU32;

/// Defines a compact arena index.
///
/// Stored as `index + 1` in a `NonZeroU32` so `Option<Id>` costs nothing extra.
macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $tag:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Create an id from a 0-based arena position.
            pub fn from_index(index: usize) -> Self {
                let raw = u32::try_from(index).unwrap_or(u32::MAX - 1);
                Self(NonZeroU32::MIN.saturating_add(raw))
            }

            /// Recover the 0-based arena position.
            pub fn index(self) -> usize {
                (self.0.get() - 1) as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "({})"), self.index())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.index())
            }
        }
    };
}

arena_id!(
    /// Index of a curve inside a `CurveSet`.
    CurveId,
    "CurveId"
);
arena_id!(
    /// Index of an operating mode inside its performance record (0-based).
    ModeId,
    "ModeId"
);
arena_id!(
    /// Index of a speed inside its operating mode (0-based; speed number is index + 1).
    SpeedId,
    "SpeedId"
);

impl SpeedId {
    /// 1-based speed number as used in input files and reports.
    pub fn number(self) -> usize {
        self.index() + 1
    }
}

impl ModeId {
    /// 1-based mode number, matching the value a mode schedule produces.
    pub fn number(self) -> usize {
        self.index() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trip_index() {
        for i in [0_usize, 1, 2, 42, 10_000] {
            assert_eq!(CurveId::from_index(i).index(), i);
            assert_eq!(SpeedId::from_index(i).number(), i + 1);
        }
    }

    #[test]
    fn option_id_is_small() {
        assert_eq!(
            core::mem::size_of::<ModeId>(),
            core::mem::size_of::<Option<ModeId>>()
        );
    }

    #[test]
    fn debug_shows_kind() {
        assert_eq!(format!("{:?}", ModeId::from_index(3)), "ModeId(3)");
    }
}
