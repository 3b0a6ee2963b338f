use std::{
    fmt,
    ops::{BitOr, BitOrAssign},
};

///
/// OrderFlags
///
/// Bit flags for one order directive. Combine with `|`; the builder passes
/// the combined mask through and only the engine interprets it.
/// The empty mask means ascending, ASCII case-insensitive, nulls first,
/// signed comparison.
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct OrderFlags(u32);

impl OrderFlags {
    pub const NONE: Self = Self(0);

    /// Reverse the order from ascending to descending.
    pub const DESCENDING: Self = Self(1);

    /// Sort upper case letters (e.g. "Z") before lower case letters (e.g. "a").
    pub const CASE_SENSITIVE: Self = Self(2);

    /// Compare scalars as unsigned.
    pub const UNSIGNED: Self = Self(4);

    /// Put null values last instead of first.
    pub const NULLS_LAST: Self = Self(8);

    /// Treat null scalars as zero.
    pub const NULLS_ZERO: Self = Self(16);

    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for OrderFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl BitOrAssign for OrderFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl fmt::Display for OrderFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(OrderFlags, &str); 5] = [
            (OrderFlags::DESCENDING, "desc"),
            (OrderFlags::CASE_SENSITIVE, "case"),
            (OrderFlags::UNSIGNED, "unsigned"),
            (OrderFlags::NULLS_LAST, "nulls_last"),
            (OrderFlags::NULLS_ZERO, "nulls_zero"),
        ];

        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();

        if names.is_empty() {
            write!(f, "asc")
        } else {
            write!(f, "{}", names.join("|"))
        }
    }
}

///
/// OrderDirective
///
/// One sort key. Directives are applied in append order: the first is primary,
/// later ones only break ties.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OrderDirective {
    pub property_id: u32,
    pub flags: OrderFlags,
}

impl OrderDirective {
    #[must_use]
    pub const fn new(property_id: u32, flags: OrderFlags) -> Self {
        Self { property_id, flags }
    }
}
