//! Shared fixtures for integration tests: sample property bags, format
//! descriptors, and scratch Unix-socket paths.

use std::path::PathBuf;

use control::message::{Direction, NodeUpdate, PortUpdate};
use pod::format::FormatDescriptor;
use pod::props::{Property, PropertyValue};

/// A node update carrying a couple of representative properties, used
/// wherever a test needs "some" node update without caring about its exact
/// contents.
pub fn sample_node_update() -> NodeUpdate {
    NodeUpdate {
        change_mask: 0x7,
        max_input_ports: 1,
        max_output_ports: 1,
        props: vec![
            Property::new(1, 0, PropertyValue::Int(1)),
            Property::new(2, 0, PropertyValue::Bool(true)),
        ],
    }
}

/// A minimal raw video format: a resolution, a framerate, and a pixel
/// format id, matching the shape real format negotiation exchanges use.
pub fn sample_video_format() -> FormatDescriptor {
    let mut format = FormatDescriptor::new(1, 2);
    format.push(Property::new(1, 0, PropertyValue::Rectangle { width: 1920, height: 1080 }));
    format.push(Property::new(2, 0, PropertyValue::Fraction { num: 30, denom: 1 }));
    format.push(Property::new(3, 0, PropertyValue::Int(2)));
    format
}

/// A port update offering the sample video format as its sole possible
/// format.
pub fn sample_port_update(port_id: u32, direction: Direction) -> PortUpdate {
    PortUpdate {
        port_id,
        direction,
        change_mask: 0x1,
        possible_formats: vec![sample_video_format()],
        props: vec![Property::new(1, 0, PropertyValue::Bool(false))],
    }
}

/// A scratch path for a Unix-domain socket unique to the calling test
/// process, inside a freshly created temp directory that is removed when
/// the returned guard is dropped.
pub fn scratch_socket_path() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create scratch temp dir");
    let path = dir.path().join("control.sock");
    (dir, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_fixtures_build_without_panicking() {
        let _ = sample_node_update();
        let _ = sample_video_format();
        let _ = sample_port_update(1, Direction::Input);
        let (_dir, path) = scratch_socket_path();
        assert!(path.to_string_lossy().ends_with("control.sock"));
    }
}
