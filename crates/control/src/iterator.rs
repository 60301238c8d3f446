use bytes::Bytes;

use crate::command::Command;
use crate::error::ControlError;
use crate::header::FixedHeader;
use crate::message::MessageBody;

/// Walks a byte stream produced by [`crate::builder::ControlBuilder`],
/// yielding one decoded message per frame.
///
/// Mirrors `spa_control_iter_next`: each step reads a fixed header, checks
/// enough bytes remain for the declared body length, and decodes the body
/// for that command. A malformed header or a body shorter than declared
/// ends iteration with an error rather than silently skipping bytes.
pub struct MessageIterator {
    remaining: Bytes,
}

impl MessageIterator {
    pub fn new(data: Bytes) -> Self {
        Self { remaining: data }
    }
}

impl Iterator for MessageIterator {
    type Item = Result<(Command, MessageBody), ControlError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }
        let header = match FixedHeader::decode(&mut self.remaining) {
            Ok(header) => header,
            Err(err) => {
                self.remaining = Bytes::new();
                return Some(Err(err));
            }
        };
        let body_len = header.body_len as usize;
        if self.remaining.len() < body_len {
            let available = self.remaining.len();
            self.remaining = Bytes::new();
            return Some(Err(ControlError::BodyTruncated { needed: body_len, available }));
        }
        let body_bytes = self.remaining.split_to(body_len);
        match MessageBody::decode(header.command, &body_bytes) {
            Ok(body) => Some(Ok((header.command, body))),
            Err(err) => Some(Err(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ControlBuilder;
    use crate::message::{NodeStateChange, RemovePort};

    #[test]
    fn iterator_stops_cleanly_at_end_of_stream() {
        let mut builder = ControlBuilder::new();
        builder.add_message(&MessageBody::RemovePort(RemovePort { port_id: 1 }));
        let (bytes, _) = builder.finish();
        let mut iter = MessageIterator::new(bytes);
        assert!(iter.next().unwrap().is_ok());
        assert!(iter.next().is_none());
    }

    #[test]
    fn iterator_reports_truncated_body() {
        let mut builder = ControlBuilder::new();
        builder.add_message(&MessageBody::NodeStateChange(NodeStateChange { state: 1 }));
        let (bytes, _) = builder.finish();
        let truncated = bytes.slice(0..bytes.len() - 1);
        let mut iter = MessageIterator::new(truncated);
        assert!(matches!(iter.next(), Some(Err(ControlError::BodyTruncated { .. }))));
    }
}
