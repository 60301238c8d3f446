use bytes::{Bytes, BytesMut};
use pod::props::{Property, PropertyBag};

use crate::error::ControlError;
use crate::raw::{get_u32, put_u32, slice_at, slice_from};

const UPDATE_HEADER_LEN: usize = 16;
const EVENT_HEADER_LEN: usize = 4;
const INNER_HEADER_LEN: usize = 12;

/// Announces or updates a node's capabilities and properties.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeUpdate {
    pub change_mask: u32,
    pub max_input_ports: u32,
    pub max_output_ports: u32,
    pub props: Vec<Property>,
}

impl NodeUpdate {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(UPDATE_HEADER_LEN);
        put_u32(&mut buf, self.change_mask);
        put_u32(&mut buf, self.max_input_ports);
        put_u32(&mut buf, self.max_output_ports);
        if self.props.is_empty() {
            put_u32(&mut buf, 0);
        } else {
            put_u32(&mut buf, UPDATE_HEADER_LEN as u32);
            let mut bag = PropertyBag::new();
            for prop in &self.props {
                bag.push(prop.clone());
            }
            buf.extend_from_slice(&bag.build());
        }
        buf.freeze()
    }

    pub fn decode(body: &[u8]) -> Result<Self, ControlError> {
        let change_mask = get_u32(body, 0)?;
        let max_input_ports = get_u32(body, 4)?;
        let max_output_ports = get_u32(body, 8)?;
        let props_offset = get_u32(body, 12)?;
        let props = if props_offset == 0 { Vec::new() } else { PropertyBag::decode(slice_from(body, props_offset)?)? };
        Ok(Self { change_mask, max_input_ports, max_output_ports, props })
    }
}

/// Reports that a node's lifecycle state changed. Fixed-size payload: a
/// single `state` field, no sub-objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeStateChange {
    pub state: u32,
}

impl NodeStateChange {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(4);
        put_u32(&mut buf, self.state);
        buf.freeze()
    }

    pub fn decode(body: &[u8]) -> Result<Self, ControlError> {
        Ok(Self { state: get_u32(body, 0)? })
    }
}

/// An asynchronous event raised by a node (e.g. buffer underrun, format
/// change notification). `data` carries the event-specific opaque payload.
///
/// Wire layout: an outer header holding one offset field to an inner
/// `{event_id, data_offset, size}` header, whose `data_offset`/`size` in
/// turn locate the opaque byte tail. The indirection mirrors the source's
/// `SpaNodeEvent` header sitting between the command frame and its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeEvent {
    pub event_id: u32,
    pub data: Vec<u8>,
}

impl NodeEvent {
    pub fn encode(&self) -> Bytes {
        encode_inner_event(self.event_id, &self.data)
    }

    pub fn decode(body: &[u8]) -> Result<Self, ControlError> {
        let (event_id, data) = decode_inner_event(body)?;
        Ok(Self { event_id, data })
    }
}

/// A command sent to a node (e.g. start, pause, request a format
/// renegotiation). Same wire shape as [`NodeEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeCommand {
    pub command_id: u32,
    pub data: Vec<u8>,
}

impl NodeCommand {
    pub fn encode(&self) -> Bytes {
        encode_inner_event(self.command_id, &self.data)
    }

    pub fn decode(body: &[u8]) -> Result<Self, ControlError> {
        let (command_id, data) = decode_inner_event(body)?;
        Ok(Self { command_id, data })
    }
}

fn encode_inner_event(id: u32, data: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(EVENT_HEADER_LEN + INNER_HEADER_LEN + data.len());
    put_u32(&mut buf, EVENT_HEADER_LEN as u32);
    put_u32(&mut buf, id);
    if data.is_empty() {
        put_u32(&mut buf, 0);
    } else {
        put_u32(&mut buf, (EVENT_HEADER_LEN + INNER_HEADER_LEN) as u32);
    }
    put_u32(&mut buf, data.len() as u32);
    buf.extend_from_slice(data);
    buf.freeze()
}

fn decode_inner_event(body: &[u8]) -> Result<(u32, Vec<u8>), ControlError> {
    let inner_offset = get_u32(body, 0)? as usize;
    let id = get_u32(body, inner_offset)?;
    let data_offset = get_u32(body, inner_offset + 4)?;
    let size = get_u32(body, inner_offset + 8)?;
    let data = if data_offset == 0 { Vec::new() } else { slice_at(body, data_offset, size)?.to_vec() };
    Ok((id, data))
}
