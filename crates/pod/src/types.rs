/// Alignment, in bytes, applied to every POD value and to the cursor after
/// every pushed/popped compound frame.
pub const ALIGNMENT: usize = 8;

/// Width of the `{size, type}` prefix written before every top-level POD
/// value (scalars, structs, objects) and before array/prop frames.
pub const PREFIX_LEN: usize = 8;

/// Discriminant of a POD value's type, carried in the `type` half of its
/// `{size, type}` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PodType {
    Invalid = 0,
    Bool = 1,
    Int = 2,
    Long = 3,
    Float = 4,
    Double = 5,
    String = 6,
    Bytes = 7,
    Rectangle = 8,
    Fraction = 9,
    Array = 10,
    Struct = 11,
    Object = 12,
    Prop = 13,
}

impl PodType {
    pub fn from_u32(value: u32) -> Option<Self> {
        Some(match value {
            0 => Self::Invalid,
            1 => Self::Bool,
            2 => Self::Int,
            3 => Self::Long,
            4 => Self::Float,
            5 => Self::Double,
            6 => Self::String,
            7 => Self::Bytes,
            8 => Self::Rectangle,
            9 => Self::Fraction,
            10 => Self::Array,
            11 => Self::Struct,
            12 => Self::Object,
            13 => Self::Prop,
            _ => return None,
        })
    }

    /// Whether this type's frame puts the builder into "in-array" mode,
    /// suppressing per-element type prefixes between children.
    pub fn is_array_like(self) -> bool {
        matches!(self, Self::Array | Self::Prop)
    }
}
