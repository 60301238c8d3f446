//! Property bags: an ordered list of key/flags/value entries, each optionally
//! carrying alternative values alongside its default. Used by the control
//! codec for `NODE_UPDATE`/`PORT_UPDATE` property payloads.

use bytes::Bytes;

use crate::builder::PodBuilder;
use crate::error::PodError;
use crate::types::PodType;
use crate::value::{PodStruct, PodValue, decode_pod};

/// A scalar value a property can carry. Properties intentionally stick to
/// fixed-size scalars — a property whose value is itself a nested struct or
/// array has no use case in this codec and would defeat the point of the
/// tightly-packed alternatives list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Rectangle { width: u32, height: u32 },
    Fraction { num: u32, denom: u32 },
}

impl PropertyValue {
    pub(crate) fn pod_type(self) -> PodType {
        match self {
            Self::Bool(_) => PodType::Bool,
            Self::Int(_) => PodType::Int,
            Self::Long(_) => PodType::Long,
            Self::Float(_) => PodType::Float,
            Self::Double(_) => PodType::Double,
            Self::Rectangle { .. } => PodType::Rectangle,
            Self::Fraction { .. } => PodType::Fraction,
        }
    }

    pub(crate) fn child_size(self) -> u32 {
        match self {
            Self::Bool(_) | Self::Int(_) | Self::Float(_) => 4,
            Self::Long(_) | Self::Double(_) | Self::Rectangle { .. } | Self::Fraction { .. } => 8,
        }
    }

    pub(crate) fn write(self, builder: &mut PodBuilder) {
        match self {
            Self::Bool(v) => builder.add_bool(v),
            Self::Int(v) => builder.add_int(v),
            Self::Long(v) => builder.add_long(v),
            Self::Float(v) => builder.add_float(v),
            Self::Double(v) => builder.add_double(v),
            Self::Rectangle { width, height } => builder.add_rectangle(width, height),
            Self::Fraction { num, denom } => builder.add_fraction(num, denom),
        };
    }

    /// Converts a decoded scalar [`PodValue`] back into a `PropertyValue`,
    /// failing for the compound variants properties never carry.
    pub fn from_pod(value: PodValue<'_>) -> Result<Self, PodError> {
        Ok(match value {
            PodValue::Bool(v) => Self::Bool(v),
            PodValue::Int(v) => Self::Int(v),
            PodValue::Long(v) => Self::Long(v),
            PodValue::Float(v) => Self::Float(v),
            PodValue::Double(v) => Self::Double(v),
            PodValue::Rectangle { width, height } => Self::Rectangle { width, height },
            PodValue::Fraction { num, denom } => Self::Fraction { num, denom },
            other => {
                return Err(PodError::TypeMismatch { expected: PodType::Int, found: other.type_tag() });
            }
        })
    }
}

/// One entry in a [`PropertyBag`]: a key, flags, a default value, and any
/// alternative values offered alongside it (empty for a plain property).
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: u32,
    pub flags: u32,
    pub value: PropertyValue,
    pub alternatives: Vec<PropertyValue>,
}

impl Property {
    pub fn new(key: u32, flags: u32, value: PropertyValue) -> Self {
        Self { key, flags, value, alternatives: Vec::new() }
    }

    pub fn with_alternatives(mut self, alternatives: Vec<PropertyValue>) -> Self {
        self.alternatives = alternatives;
        self
    }
}

/// An ordered set of properties, encoded as a struct of prop frames.
#[derive(Debug, Clone, Default)]
pub struct PropertyBag {
    properties: Vec<Property>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, property: Property) -> &mut Self {
        self.properties.push(property);
        self
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn build(&self) -> Bytes {
        let mut builder = PodBuilder::new();
        let s = builder.push_struct();
        for prop in &self.properties {
            let frame = builder.push_prop(prop.key, prop.flags, prop.value.pod_type(), prop.value.child_size());
            prop.value.write(&mut builder);
            for alt in &prop.alternatives {
                alt.write(&mut builder);
            }
            builder.pop(frame);
        }
        builder.pop(s);
        builder.finish()
    }

    /// Decodes a property bag previously produced by [`build`](Self::build).
    pub fn decode(data: &[u8]) -> Result<Vec<Property>, PodError> {
        let PodValue::Struct(s) = decode_pod(data)? else {
            return Err(PodError::TypeMismatch { expected: PodType::Struct, found: PodType::Invalid });
        };
        decode_struct_props(s)
    }
}

fn decode_struct_props(s: PodStruct<'_>) -> Result<Vec<Property>, PodError> {
    let mut out = Vec::new();
    for field in s.fields() {
        let PodValue::Prop(prop) = field? else {
            return Err(PodError::TypeMismatch { expected: PodType::Prop, found: PodType::Invalid });
        };
        let value = PropertyValue::from_pod(prop.default_value()?)?;
        let mut alternatives = Vec::new();
        for alt in prop.alternatives() {
            alternatives.push(PropertyValue::from_pod(alt?)?);
        }
        out.push(Property { key: prop.key, flags: prop.flags, value, alternatives });
    }
    Ok(out)
}
