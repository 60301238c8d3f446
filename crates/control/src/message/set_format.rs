use bytes::{Bytes, BytesMut};
use pod::format::FormatDescriptor;
use pod::props::PropertyValue;

use crate::error::ControlError;
use crate::message::port::Direction;
use crate::raw::{get_u32, put_u32, slice_from};

const SET_FORMAT_HEADER_LEN: usize = 12;

/// Sets (or, with `format: None`, clears) the negotiated format on a port.
///
/// Wire layout: `{port_id, direction, format_offset}`, with the serialized
/// format (if any) following the header and referenced by `format_offset`
/// (`0` means "clear the format").
#[derive(Debug, Clone, PartialEq)]
pub struct SetFormat {
    pub port_id: u32,
    pub direction: Direction,
    pub format: Option<FormatDescriptor>,
}

impl SetFormat {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(SET_FORMAT_HEADER_LEN);
        put_u32(&mut buf, self.port_id);
        put_u32(&mut buf, self.direction.as_u32());
        match &self.format {
            Some(format) => {
                put_u32(&mut buf, SET_FORMAT_HEADER_LEN as u32);
                buf.extend_from_slice(&format.build());
            }
            None => put_u32(&mut buf, 0),
        }
        buf.freeze()
    }

    pub fn decode(body: &[u8]) -> Result<Self, ControlError> {
        let port_id = get_u32(body, 0)?;
        let direction = Direction::from_u32(get_u32(body, 4)?)?;
        let format_offset = get_u32(body, 8)?;
        let format = if format_offset == 0 { None } else { Some(FormatDescriptor::decode(slice_from(body, format_offset)?)?) };
        Ok(Self { port_id, direction, format })
    }
}

/// A value tag identifying which [`PropertyValue`] variant a [`SetProperty`]
/// payload carries, matching the POD sub-codec's type tags.
const VALUE_BOOL: u32 = 0;
const VALUE_INT: u32 = 1;
const VALUE_LONG: u32 = 2;
const VALUE_FLOAT: u32 = 3;
const VALUE_DOUBLE: u32 = 4;
const VALUE_RECTANGLE: u32 = 5;
const VALUE_FRACTION: u32 = 6;

/// Sets a single property directly on a port, outside of a full
/// [`super::port::PortUpdate`]. Left unimplemented in the original control
/// channel; implemented fully here.
///
/// Fixed-size payload: `{port_id, key, value_tag, value}`, where `value` is
/// an 8-byte slot wide enough for any [`PropertyValue`] scalar, interpreted
/// according to `value_tag`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetProperty {
    pub port_id: u32,
    pub key: u32,
    pub value: PropertyValue,
}

const SET_PROPERTY_LEN: usize = 20;

impl SetProperty {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(SET_PROPERTY_LEN);
        put_u32(&mut buf, self.port_id);
        put_u32(&mut buf, self.key);
        let mut slot = [0u8; 8];
        let tag = match self.value {
            PropertyValue::Bool(v) => {
                slot[0..4].copy_from_slice(&(v as u32).to_ne_bytes());
                VALUE_BOOL
            }
            PropertyValue::Int(v) => {
                slot[0..4].copy_from_slice(&v.to_ne_bytes());
                VALUE_INT
            }
            PropertyValue::Long(v) => {
                slot.copy_from_slice(&v.to_ne_bytes());
                VALUE_LONG
            }
            PropertyValue::Float(v) => {
                slot[0..4].copy_from_slice(&v.to_ne_bytes());
                VALUE_FLOAT
            }
            PropertyValue::Double(v) => {
                slot.copy_from_slice(&v.to_ne_bytes());
                VALUE_DOUBLE
            }
            PropertyValue::Rectangle { width, height } => {
                slot[0..4].copy_from_slice(&width.to_ne_bytes());
                slot[4..8].copy_from_slice(&height.to_ne_bytes());
                VALUE_RECTANGLE
            }
            PropertyValue::Fraction { num, denom } => {
                slot[0..4].copy_from_slice(&num.to_ne_bytes());
                slot[4..8].copy_from_slice(&denom.to_ne_bytes());
                VALUE_FRACTION
            }
        };
        put_u32(&mut buf, tag);
        buf.extend_from_slice(&slot);
        buf.freeze()
    }

    pub fn decode(body: &[u8]) -> Result<Self, ControlError> {
        let port_id = get_u32(body, 0)?;
        let key = get_u32(body, 4)?;
        let tag = get_u32(body, 8)?;
        let slot = body.get(12..20).ok_or(ControlError::BodyTruncated { needed: 20, available: body.len() })?;
        let u32_at = |o: usize| u32::from_ne_bytes(slot[o..o + 4].try_into().expect("checked length"));
        let value = match tag {
            VALUE_BOOL => PropertyValue::Bool(u32_at(0) != 0),
            VALUE_INT => PropertyValue::Int(u32_at(0) as i32),
            VALUE_LONG => PropertyValue::Long(i64::from_ne_bytes(slot.try_into().expect("checked length"))),
            VALUE_FLOAT => PropertyValue::Float(f32::from_ne_bytes(slot[0..4].try_into().expect("checked length"))),
            VALUE_DOUBLE => PropertyValue::Double(f64::from_ne_bytes(slot.try_into().expect("checked length"))),
            VALUE_RECTANGLE => PropertyValue::Rectangle { width: u32_at(0), height: u32_at(4) },
            VALUE_FRACTION => PropertyValue::Fraction { num: u32_at(0), denom: u32_at(4) },
            other => return Err(ControlError::InvalidValueTag(other)),
        };
        Ok(Self { port_id, key, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod::props::Property;

    #[test]
    fn set_format_round_trips() {
        let mut format = FormatDescriptor::new(1, 2);
        format.push(Property::new(1, 0, PropertyValue::Rectangle { width: 640, height: 480 }));
        let msg = SetFormat { port_id: 1, direction: Direction::Input, format: Some(format) };
        let bytes = msg.encode();
        assert_eq!(get_u32(&bytes, 8).unwrap(), SET_FORMAT_HEADER_LEN as u32);
        let decoded = SetFormat::decode(&bytes).unwrap();
        assert_eq!(decoded.port_id, 1);
        assert_eq!(decoded.format.unwrap().properties.len(), 1);
    }

    #[test]
    fn set_format_with_none_clears_the_format() {
        let msg = SetFormat { port_id: 1, direction: Direction::Output, format: None };
        let bytes = msg.encode();
        assert_eq!(bytes.len(), SET_FORMAT_HEADER_LEN);
        assert_eq!(get_u32(&bytes, 8).unwrap(), 0);
        assert_eq!(SetFormat::decode(&bytes).unwrap().format, None);
    }

    #[test]
    fn set_property_round_trips_each_value_variant() {
        for value in [
            PropertyValue::Bool(true),
            PropertyValue::Int(-7),
            PropertyValue::Long(-123456789012),
            PropertyValue::Float(1.5),
            PropertyValue::Double(2.25),
            PropertyValue::Rectangle { width: 1920, height: 1080 },
            PropertyValue::Fraction { num: 30, denom: 1 },
        ] {
            let msg = SetProperty { port_id: 2, key: 5, value };
            let bytes = msg.encode();
            assert_eq!(bytes.len(), SET_PROPERTY_LEN);
            let decoded = SetProperty::decode(&bytes).unwrap();
            assert_eq!(decoded.port_id, 2);
            assert_eq!(decoded.key, 5);
            assert_eq!(decoded.value, value);
        }
    }
}
