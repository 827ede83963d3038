//! Socket accounting and candidate fallback.
//!
//! # Design
//! These tests count the process's open file descriptors, so they live in
//! their own test binary and take `SERIAL` to keep each other's sockets out
//! of the count.

use std::net::TcpListener;
use std::sync::Mutex;

use minihttp_core::{ClientError, ConnectOptions, Network};

static SERIAL: Mutex<()> = Mutex::new(());

#[cfg(target_os = "linux")]
fn refused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[cfg(target_os = "linux")]
fn open_fds() -> usize {
    std::fs::read_dir("/proc/self/fd").unwrap().count()
}

#[cfg(target_os = "linux")]
#[test]
fn failed_connect_leaves_no_descriptor_behind() {
    let _serial = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let options = ConnectOptions {
        port: refused_port(),
        ..ConnectOptions::default()
    };
    let network = Network::init();

    let before = open_fds();
    for _ in 0..8 {
        let err = network.connect_with("127.0.0.1", &options).unwrap_err();
        assert!(matches!(err, ClientError::Connect { .. }));
    }
    assert_eq!(open_fds(), before);
    assert_eq!(network.open_connections(), 0);
}

#[cfg(target_os = "linux")]
#[test]
fn dropped_client_closes_its_socket() {
    let _serial = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let options = ConnectOptions {
        port: listener.local_addr().unwrap().port(),
        ..ConnectOptions::default()
    };
    let network = Network::init();

    let before = open_fds();
    let client = network.connect_with("127.0.0.1", &options).unwrap();
    let (accepted, _) = listener.accept().unwrap();
    assert_eq!(open_fds(), before + 2);

    drop(client);
    drop(accepted);
    assert_eq!(open_fds(), before);
}

#[test]
fn localhost_falls_back_to_the_listening_family() {
    let _serial = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    // Only IPv4 listens; an IPv6 `localhost` candidate is refused first
    // wherever the resolver lists it.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let options = ConnectOptions {
        port: listener.local_addr().unwrap().port(),
        ..ConnectOptions::default()
    };
    let network = Network::init();

    let client = network.connect_with("localhost", &options).unwrap();
    assert_eq!(client.host(), "localhost");
    assert_eq!(network.open_connections(), 1);
}
