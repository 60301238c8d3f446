use bytes::{Bytes, BytesMut};
use pod::format::FormatDescriptor;
use pod::props::{Property, PropertyBag};

use crate::error::ControlError;
use crate::raw::{get_u32, put_u32, slice_from};

/// Which direction of a node a port belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    pub(crate) fn as_u32(self) -> u32 {
        match self {
            Self::Input => 0,
            Self::Output => 1,
        }
    }

    pub(crate) fn from_u32(value: u32) -> Result<Self, ControlError> {
        match value {
            0 => Ok(Self::Input),
            1 => Ok(Self::Output),
            other => Err(ControlError::InvalidDirection(other)),
        }
    }
}

const UPDATE_HEADER_LEN: usize = 28;

/// Announces or updates a port's possible formats and properties.
///
/// Wire layout: a fixed header of offset/count fields, followed by (in
/// this order, each present only if its offset is non-zero) a packed
/// array of `n_possible_formats` offsets — one per serialized format — and
/// the serialized formats themselves, then the serialized property bag.
#[derive(Debug, Clone, PartialEq)]
pub struct PortUpdate {
    pub port_id: u32,
    pub direction: Direction,
    pub change_mask: u32,
    pub possible_formats: Vec<FormatDescriptor>,
    pub props: Vec<Property>,
}

impl PortUpdate {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(UPDATE_HEADER_LEN);
        put_u32(&mut buf, self.port_id);
        put_u32(&mut buf, self.direction.as_u32());
        put_u32(&mut buf, self.change_mask);
        put_u32(&mut buf, self.possible_formats.len() as u32);
        let possible_formats_offset_field = buf.len();
        put_u32(&mut buf, 0);
        let props_offset_field = buf.len();
        put_u32(&mut buf, 0);
        debug_assert_eq!(buf.len(), UPDATE_HEADER_LEN);

        if !self.possible_formats.is_empty() {
            let table_offset = buf.len() as u32;
            let table_start = buf.len();
            for _ in &self.possible_formats {
                put_u32(&mut buf, 0);
            }
            for (i, format) in self.possible_formats.iter().enumerate() {
                let format_offset = buf.len() as u32;
                buf.extend_from_slice(&format.build());
                let slot = table_start + i * 4;
                buf[slot..slot + 4].copy_from_slice(&format_offset.to_ne_bytes());
            }
            buf[possible_formats_offset_field..possible_formats_offset_field + 4].copy_from_slice(&table_offset.to_ne_bytes());
        }

        if !self.props.is_empty() {
            let props_offset = buf.len() as u32;
            let mut bag = PropertyBag::new();
            for prop in &self.props {
                bag.push(prop.clone());
            }
            buf.extend_from_slice(&bag.build());
            buf[props_offset_field..props_offset_field + 4].copy_from_slice(&props_offset.to_ne_bytes());
        }

        buf.freeze()
    }

    pub fn decode(body: &[u8]) -> Result<Self, ControlError> {
        let port_id = get_u32(body, 0)?;
        let direction = Direction::from_u32(get_u32(body, 4)?)?;
        let change_mask = get_u32(body, 8)?;
        let n_possible_formats = get_u32(body, 12)?;
        let possible_formats_offset = get_u32(body, 16)?;
        let props_offset = get_u32(body, 20)?;

        let mut possible_formats = Vec::with_capacity(n_possible_formats as usize);
        if n_possible_formats > 0 {
            let table = slice_from(body, possible_formats_offset)?;
            for i in 0..n_possible_formats as usize {
                let format_offset = get_u32(table, i * 4)?;
                possible_formats.push(FormatDescriptor::decode(slice_from(body, format_offset)?)?);
            }
        }

        let props = if props_offset == 0 { Vec::new() } else { PropertyBag::decode(slice_from(body, props_offset)?)? };

        Ok(Self { port_id, direction, change_mask, possible_formats, props })
    }
}

/// Reports that a port's out-of-band status changed (e.g. physically
/// connected/disconnected). This command was left unimplemented in the
/// original control channel; we give it a concrete, fixed-size payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortStatusChange {
    pub port_id: u32,
    pub status: u32,
}

impl PortStatusChange {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(8);
        put_u32(&mut buf, self.port_id);
        put_u32(&mut buf, self.status);
        buf.freeze()
    }

    pub fn decode(body: &[u8]) -> Result<Self, ControlError> {
        Ok(Self { port_id: get_u32(body, 0)?, status: get_u32(body, 4)? })
    }
}

/// Adds a port to a node. Fixed-size payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddPort {
    pub port_id: u32,
    pub direction: Direction,
}

impl AddPort {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(8);
        put_u32(&mut buf, self.port_id);
        put_u32(&mut buf, self.direction.as_u32());
        buf.freeze()
    }

    pub fn decode(body: &[u8]) -> Result<Self, ControlError> {
        Ok(Self { port_id: get_u32(body, 0)?, direction: Direction::from_u32(get_u32(body, 4)?)? })
    }
}

/// Removes a port from a node. Fixed-size payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovePort {
    pub port_id: u32,
}

impl RemovePort {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(4);
        put_u32(&mut buf, self.port_id);
        buf.freeze()
    }

    pub fn decode(body: &[u8]) -> Result<Self, ControlError> {
        Ok(Self { port_id: get_u32(body, 0)? })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_update_round_trips_with_formats_and_props() {
        let mut format = FormatDescriptor::new(1, 2);
        format.push(Property::new(1, 0, pod::props::PropertyValue::Rectangle { width: 1920, height: 1080 }));
        format.push(Property::new(2, 0, pod::props::PropertyValue::Fraction { num: 30, denom: 1 }));
        format.push(Property::new(3, 0, pod::props::PropertyValue::Int(2)));

        let update = PortUpdate {
            port_id: 4,
            direction: Direction::Output,
            change_mask: 1,
            possible_formats: vec![format],
            props: vec![Property::new(9, 0, pod::props::PropertyValue::Bool(true))],
        };
        let bytes = update.encode();
        let decoded = PortUpdate::decode(&bytes).unwrap();
        assert_eq!(decoded.port_id, 4);
        assert_eq!(decoded.direction, Direction::Output);
        assert_eq!(decoded.possible_formats.len(), 1);
        assert_eq!(decoded.possible_formats[0].properties.len(), 3);
        assert_eq!(decoded.props.len(), 1);
    }

    #[test]
    fn port_update_offsets_stay_within_the_payload() {
        let update = PortUpdate {
            port_id: 1,
            direction: Direction::Input,
            change_mask: 0,
            possible_formats: vec![FormatDescriptor::new(1, 1), FormatDescriptor::new(1, 2)],
            props: vec![Property::new(1, 0, pod::props::PropertyValue::Bool(false))],
        };
        let bytes = update.encode();
        let possible_formats_offset = get_u32(&bytes, 16).unwrap();
        let props_offset = get_u32(&bytes, 20).unwrap();
        assert!((possible_formats_offset as usize) < bytes.len());
        assert!((props_offset as usize) < bytes.len());
        assert_eq!(PortUpdate::decode(&bytes).unwrap().possible_formats.len(), 2);
    }

    #[test]
    fn port_update_with_no_formats_or_props_encodes_zero_offsets() {
        let update =
            PortUpdate { port_id: 1, direction: Direction::Input, change_mask: 0, possible_formats: Vec::new(), props: Vec::new() };
        let bytes = update.encode();
        assert_eq!(bytes.len(), UPDATE_HEADER_LEN);
        assert_eq!(get_u32(&bytes, 16).unwrap(), 0);
        assert_eq!(get_u32(&bytes, 20).unwrap(), 0);
    }

    #[test]
    fn port_status_change_round_trips_as_a_bare_payload() {
        let change = PortStatusChange { port_id: 2, status: 1 };
        let bytes = change.encode();
        assert_eq!(bytes.len(), 8);
        assert_eq!(PortStatusChange::decode(&bytes).unwrap(), change);
    }

    #[test]
    fn add_and_remove_port_round_trip() {
        let add = AddPort { port_id: 3, direction: Direction::Input };
        assert_eq!(AddPort::decode(&add.encode()).unwrap(), add);

        let remove = RemovePort { port_id: 3 };
        assert_eq!(RemovePort::decode(&remove.encode()).unwrap(), remove);
    }
}
