//! End-to-end exercises of the control codec over a real Unix-domain
//! socket: a batch is assembled client-side with [`ControlBuilder`],
//! written with [`transport::write_message`], read back server-side, and
//! walked with [`MessageIterator`].

use std::os::fd::AsFd;

use control::{Command, ControlBuilder, MessageBody, MessageIterator};
use test_util::{sample_node_update, sample_port_update, scratch_socket_path};

#[test]
fn a_batch_of_messages_round_trips_over_a_real_socket() {
    let (_dir, path) = scratch_socket_path();
    let listener = transport::listen_seqpacket(&path).unwrap();
    let client = transport::connect_seqpacket(&path).unwrap();
    let server = transport::accept_client(&listener).unwrap();

    let mut builder = ControlBuilder::new();
    builder.add_message(&MessageBody::NodeUpdate(sample_node_update()));
    builder.add_message(&MessageBody::PortUpdate(sample_port_update(0, control::message::Direction::Output)));
    let (bytes, fds) = builder.finish();
    assert!(fds.is_empty());

    transport::write_message(client.as_fd(), &bytes, &[]).unwrap();

    let mut buf = vec![0u8; 64 * 1024];
    let (n, received_fds) = transport::read_message(server.as_fd(), &mut buf).unwrap();
    assert!(received_fds.is_empty());

    let batch = bytes::Bytes::copy_from_slice(&buf[..n]);
    let decoded: Vec<_> = MessageIterator::new(batch).collect::<Result<_, _>>().unwrap();
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded[0].0, Command::NodeUpdate);
    assert_eq!(decoded[1].0, Command::PortUpdate);
    assert!(matches!(decoded[0].1, MessageBody::NodeUpdate(_)));
    assert!(matches!(&decoded[1].1, MessageBody::PortUpdate(update) if update.possible_formats.len() == 1));
}

#[test]
fn a_memory_fd_passed_alongside_add_mem_arrives_intact() {
    let (_dir, path) = scratch_socket_path();
    let listener = transport::listen_seqpacket(&path).unwrap();
    let client = transport::connect_seqpacket(&path).unwrap();
    let server = transport::accept_client(&listener).unwrap();

    let shm = tempfile::tempfile().unwrap();
    let shm_fd = std::os::fd::AsRawFd::as_raw_fd(&shm);

    let mut builder = ControlBuilder::new();
    let fd_index = builder.add_fd(shm_fd, false);
    builder.add_message(&MessageBody::AddMem(control::message::AddMem {
        port_id: 0,
        mem_id: 1,
        fd_index,
        flags: 0,
        offset: 0,
        size: 4096,
    }));
    let (bytes, fds) = builder.finish();

    transport::write_message(client.as_fd(), &bytes, &fds.raw_fds()).unwrap();

    let mut buf = vec![0u8; 4096];
    let (n, received_fds) = transport::read_message(server.as_fd(), &mut buf).unwrap();
    assert_eq!(received_fds.len(), 1);

    let batch = bytes::Bytes::copy_from_slice(&buf[..n]);
    let (command, body) = MessageIterator::new(batch).next().unwrap().unwrap();
    assert_eq!(command, Command::AddMem);
    let MessageBody::AddMem(add_mem) = body else { panic!("expected AddMem") };
    assert_eq!(add_mem.fd_index, 0);

    let mut server_table = control::FdTable::new();
    server_table.extend_received(received_fds);
    // Steal the fd: the table's own close-on-clear flag is cleared, so
    // `clear()` below must not close it.
    let recovered = server_table.get_fd(add_mem.fd_index, true).unwrap();
    assert!(recovered >= 0);
    server_table.clear();
    nix::unistd::close(recovered).expect("fd must still be open after being stolen from the table");
}

#[test]
fn client_disconnect_reads_back_as_a_clean_end_of_stream() {
    let (_dir, path) = scratch_socket_path();
    let listener = transport::listen_seqpacket(&path).unwrap();
    let client = transport::connect_seqpacket(&path).unwrap();
    let server = transport::accept_client(&listener).unwrap();

    drop(client);

    let mut buf = [0u8; 64];
    let (n, fds) = transport::read_message(server.as_fd(), &mut buf).unwrap();
    assert_eq!(n, 0);
    assert!(fds.is_empty());
}
