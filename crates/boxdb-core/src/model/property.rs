use std::fmt;

///
/// PropertyKind
///
/// Semantic type of one entity property as seen by the engine.
/// Operand compatibility is checked by the engine, not by the builder.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PropertyKind {
    /// Primary key (unsigned 64-bit, assigned by the engine on first put).
    Id,
    Bool,
    Int,
    Float,
    Text,
}

impl PropertyKind {
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::Id | Self::Bool | Self::Int)
    }

    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Id | Self::Bool | Self::Int | Self::Float)
    }
}

///
/// Property
///
/// Immutable identity of one entity field: a stable numeric id plus its
/// semantic kind and owning entity.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Property {
    pub entity: &'static str,
    pub id: u32,
    pub name: &'static str,
    pub kind: PropertyKind,
}

impl Property {
    #[must_use]
    pub const fn new(
        entity: &'static str,
        id: u32,
        name: &'static str,
        kind: PropertyKind,
    ) -> Self {
        Self {
            entity,
            id,
            name,
            kind,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}#{}", self.entity, self.name, self.id)
    }
}
