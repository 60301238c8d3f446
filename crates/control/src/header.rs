use bytes::{Buf, BufMut, Bytes, BytesMut};
use wire::{decode_varint, encode_varint};

use crate::command::Command;
use crate::error::ControlError;

/// The fixed framing prefix of every control message on the wire: a single
/// command tag byte followed by a varint length of the body that follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedHeader {
    pub command: Command,
    pub body_len: u32,
}

impl FixedHeader {
    pub fn encode(self, dst: &mut BytesMut) {
        dst.put_u8(self.command.as_u8());
        encode_varint(self.body_len, dst);
    }

    pub fn decode(src: &mut Bytes) -> Result<Self, ControlError> {
        if !src.has_remaining() {
            return Err(ControlError::HeaderTruncated);
        }
        let tag = src.get_u8();
        let command = Command::from_u8(tag).ok_or(ControlError::UnknownCommand(tag))?;
        let body_len = decode_varint(src)?;
        Ok(Self { command, body_len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trips() {
        let header = FixedHeader { command: Command::NodeUpdate, body_len: 300 };
        let mut buf = BytesMut::new();
        header.encode(&mut buf);
        let mut bytes = buf.freeze();
        assert_eq!(FixedHeader::decode(&mut bytes).unwrap(), header);
    }

    #[test]
    fn decode_rejects_unknown_command() {
        let mut buf = BytesMut::new();
        buf.put_u8(200);
        encode_varint(0, &mut buf);
        let mut bytes = buf.freeze();
        assert!(matches!(FixedHeader::decode(&mut bytes), Err(ControlError::UnknownCommand(200))));
    }

    #[test]
    fn decode_rejects_empty_source() {
        let mut bytes = Bytes::new();
        assert!(matches!(FixedHeader::decode(&mut bytes), Err(ControlError::HeaderTruncated)));
    }
}
