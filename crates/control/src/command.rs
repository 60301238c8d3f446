/// Tag byte identifying a control message's payload layout.
///
/// Mirrors the command set of the original control channel: node and port
/// lifecycle notifications, format negotiation, buffer memory setup, and the
/// buffer-processing/event/command pair used once a stream is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    Invalid = 0,
    NodeUpdate = 1,
    PortUpdate = 2,
    PortStatusChange = 3,
    NodeStateChange = 4,
    AddPort = 5,
    RemovePort = 6,
    SetFormat = 7,
    SetProperty = 8,
    AddMem = 9,
    RemoveMem = 10,
    UseBuffers = 11,
    ProcessBuffer = 12,
    NodeEvent = 13,
    NodeCommand = 14,
}

impl Command {
    pub fn from_u8(tag: u8) -> Option<Self> {
        Some(match tag {
            0 => Self::Invalid,
            1 => Self::NodeUpdate,
            2 => Self::PortUpdate,
            3 => Self::PortStatusChange,
            4 => Self::NodeStateChange,
            5 => Self::AddPort,
            6 => Self::RemovePort,
            7 => Self::SetFormat,
            8 => Self::SetProperty,
            9 => Self::AddMem,
            10 => Self::RemoveMem,
            11 => Self::UseBuffers,
            12 => Self::ProcessBuffer,
            13 => Self::NodeEvent,
            14 => Self::NodeCommand,
            _ => return None,
        })
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}
