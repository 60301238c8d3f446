//! Per-command payload types and the dispatch between a [`Command`] tag and
//! its POD-encoded body.

pub mod mem;
pub mod node;
pub mod port;
pub mod set_format;

use bytes::Bytes;

use crate::command::Command;
use crate::error::ControlError;
pub use mem::{AddMem, BufferSpec, ProcessBuffer, RemoveMem, UseBuffers};
pub use node::{NodeCommand, NodeEvent, NodeStateChange, NodeUpdate};
pub use port::{AddPort, Direction, PortStatusChange, PortUpdate, RemovePort};
pub use set_format::{SetFormat, SetProperty};

/// A decoded control message body, tagged by the [`Command`] it was read
/// for. Each variant's payload is the corresponding per-command type.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageBody {
    NodeUpdate(NodeUpdate),
    PortUpdate(PortUpdate),
    PortStatusChange(PortStatusChange),
    NodeStateChange(NodeStateChange),
    AddPort(AddPort),
    RemovePort(RemovePort),
    SetFormat(SetFormat),
    SetProperty(SetProperty),
    AddMem(AddMem),
    RemoveMem(RemoveMem),
    UseBuffers(UseBuffers),
    ProcessBuffer(ProcessBuffer),
    NodeEvent(NodeEvent),
    NodeCommand(NodeCommand),
}

impl MessageBody {
    /// The command tag this body serializes under.
    pub fn command(&self) -> Command {
        match self {
            Self::NodeUpdate(_) => Command::NodeUpdate,
            Self::PortUpdate(_) => Command::PortUpdate,
            Self::PortStatusChange(_) => Command::PortStatusChange,
            Self::NodeStateChange(_) => Command::NodeStateChange,
            Self::AddPort(_) => Command::AddPort,
            Self::RemovePort(_) => Command::RemovePort,
            Self::SetFormat(_) => Command::SetFormat,
            Self::SetProperty(_) => Command::SetProperty,
            Self::AddMem(_) => Command::AddMem,
            Self::RemoveMem(_) => Command::RemoveMem,
            Self::UseBuffers(_) => Command::UseBuffers,
            Self::ProcessBuffer(_) => Command::ProcessBuffer,
            Self::NodeEvent(_) => Command::NodeEvent,
            Self::NodeCommand(_) => Command::NodeCommand,
        }
    }

    pub fn encode(&self) -> Bytes {
        match self {
            Self::NodeUpdate(m) => m.encode(),
            Self::PortUpdate(m) => m.encode(),
            Self::PortStatusChange(m) => m.encode(),
            Self::NodeStateChange(m) => m.encode(),
            Self::AddPort(m) => m.encode(),
            Self::RemovePort(m) => m.encode(),
            Self::SetFormat(m) => m.encode(),
            Self::SetProperty(m) => m.encode(),
            Self::AddMem(m) => m.encode(),
            Self::RemoveMem(m) => m.encode(),
            Self::UseBuffers(m) => m.encode(),
            Self::ProcessBuffer(m) => m.encode(),
            Self::NodeEvent(m) => m.encode(),
            Self::NodeCommand(m) => m.encode(),
        }
    }

    pub fn decode(command: Command, body: &[u8]) -> Result<Self, ControlError> {
        Ok(match command {
            Command::Invalid => return Err(ControlError::UnknownCommand(0)),
            Command::NodeUpdate => Self::NodeUpdate(NodeUpdate::decode(body)?),
            Command::PortUpdate => Self::PortUpdate(PortUpdate::decode(body)?),
            Command::PortStatusChange => Self::PortStatusChange(PortStatusChange::decode(body)?),
            Command::NodeStateChange => Self::NodeStateChange(NodeStateChange::decode(body)?),
            Command::AddPort => Self::AddPort(AddPort::decode(body)?),
            Command::RemovePort => Self::RemovePort(RemovePort::decode(body)?),
            Command::SetFormat => Self::SetFormat(SetFormat::decode(body)?),
            Command::SetProperty => Self::SetProperty(SetProperty::decode(body)?),
            Command::AddMem => Self::AddMem(AddMem::decode(body)?),
            Command::RemoveMem => Self::RemoveMem(RemoveMem::decode(body)?),
            Command::UseBuffers => Self::UseBuffers(UseBuffers::decode(body)?),
            Command::ProcessBuffer => Self::ProcessBuffer(ProcessBuffer::decode(body)?),
            Command::NodeEvent => Self::NodeEvent(NodeEvent::decode(body)?),
            Command::NodeCommand => Self::NodeCommand(NodeCommand::decode(body)?),
        })
    }
}
