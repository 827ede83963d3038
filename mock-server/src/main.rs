//! Standalone mock server for trying the `minihttp` binary by hand.
//!
//! Binds `127.0.0.1:$PORT` (3000 when unset). Pair it with
//! `MINIHTTP_PORT` on the client side.

use std::io;
use std::net::Ipv4Addr;

use log::info;
use tokio::net::TcpListener;

const DEFAULT_PORT: u16 = 3000;

fn port(value: Option<String>) -> io::Result<u16> {
    match value {
        None => Ok(DEFAULT_PORT),
        Some(v) => v.trim().parse().map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("invalid PORT: {v}"))
        }),
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, port(std::env::var("PORT").ok())?)).await?;
    info!(
        "serving /status, /echo and /docs on http://{}",
        listener.local_addr()?
    );
    mock_server::run(listener).await
}
