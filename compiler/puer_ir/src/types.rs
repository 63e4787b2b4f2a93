//! Declared and runtime type tags.

use std::fmt;

/// Type tag shared by declarations and runtime values.
///
/// `Any` only appears in builtin signatures as a wildcard; no runtime value
/// ever carries it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Int,
    UInt,
    Long,
    Float,
    Bool,
    Str,
    Array,
    Record,
    Void,
    Any,
}

impl TypeTag {
    /// All tags, in declaration order.
    pub const ALL: [TypeTag; 10] = [
        TypeTag::Int,
        TypeTag::UInt,
        TypeTag::Long,
        TypeTag::Float,
        TypeTag::Bool,
        TypeTag::Str,
        TypeTag::Array,
        TypeTag::Record,
        TypeTag::Void,
        TypeTag::Any,
    ];

    /// Tags that take part in numeric widening.
    pub const NUMERIC: [TypeTag; 5] = [
        TypeTag::Bool,
        TypeTag::Int,
        TypeTag::UInt,
        TypeTag::Long,
        TypeTag::Float,
    ];

    /// Position in the widening order `bool < int < unsigned < long < float`.
    ///
    /// Returns `None` for tags that cannot be coerced.
    #[inline]
    pub const fn numeric_rank(self) -> Option<u8> {
        match self {
            TypeTag::Bool => Some(0),
            TypeTag::Int => Some(1),
            TypeTag::UInt => Some(2),
            TypeTag::Long => Some(3),
            TypeTag::Float => Some(4),
            TypeTag::Str | TypeTag::Array | TypeTag::Record | TypeTag::Void | TypeTag::Any => None,
        }
    }

    #[inline]
    pub const fn is_numeric(self) -> bool {
        self.numeric_rank().is_some()
    }

    /// Tags whose values are handles to collector-owned objects.
    #[inline]
    pub const fn is_reference(self) -> bool {
        matches!(self, TypeTag::Str | TypeTag::Array | TypeTag::Record)
    }

    /// Source-level spelling, used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            TypeTag::Int => "int",
            TypeTag::UInt => "unsigned",
            TypeTag::Long => "long",
            TypeTag::Float => "float",
            TypeTag::Bool => "bool",
            TypeTag::Str => "string",
            TypeTag::Array => "array",
            TypeTag::Record => "record",
            TypeTag::Void => "void",
            TypeTag::Any => "any",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
