//! `minihttp <server> <request> <param1> [param2] [param3]`
//!
//! Sends one request to `<server>` on port 80 (or `MINIHTTP_PORT`) and
//! prints the status code and body to stderr.

mod args;

use std::process::ExitCode;

use log::debug;
use minihttp_core::{ClientError, ConnectOptions, Network};

use crate::args::Command;

/// Exit status for any failure after the arguments were accepted.
const CLIENT_FAILURE: u8 = 3;

fn main() -> ExitCode {
    env_logger::init();

    let parsed = args::parse(std::env::args().skip(1))
        .and_then(|cmd| Ok((cmd, args::port(std::env::var("MINIHTTP_PORT").ok())?)));
    let (command, port) = match parsed {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(e.exit_code());
        }
    };

    let network = Network::init();
    match run(&network, command, port) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(CLIENT_FAILURE)
        }
    }
}

fn run(network: &Network, command: Command, port: u16) -> Result<(), ClientError> {
    let options = ConnectOptions {
        port,
        ..ConnectOptions::default()
    };
    debug!("{:?} against {}:{port}", command.request, command.server);

    let client = network.connect_with(&command.server, &options)?;
    let resp = command.request.send(client)?;

    let status = resp.status()?;
    let body = resp.body()?;
    eprint!(
        "response-code: {status}\r\nresponse-contents: {}\r\n",
        String::from_utf8_lossy(body)
    );
    Ok(())
}
