//! Command-line parsing for `minihttp`.
//!
//! All arguments are checked here, before any network activity, so a usage
//! mistake never opens a connection.

use std::fmt;

use minihttp_core::connection::DEFAULT_PORT;
use minihttp_core::{ClientError, HttpClient, HttpMethod, RawResponse};

pub const USAGE: &str = "usage: <SERVER> <REQUEST> <Param1> [Param2] ... [ParamN]";

/// One request with the parameters its method needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestArgs {
    Head { resource: String },
    Get { resource: String },
    Post { resource: String, content_type: String, content: String },
    Put { resource: String, content_type: String, content: String },
    Delete { resource: String },
    Options { resource: String },
}

impl RequestArgs {
    /// Issue the request on `client`, consuming it.
    pub fn send(self, client: HttpClient) -> Result<RawResponse, ClientError> {
        match self {
            RequestArgs::Head { resource } => client.head(&resource),
            RequestArgs::Get { resource } => client.get(&resource),
            RequestArgs::Post { resource, content_type, content } => {
                client.post(&resource, &content_type, content.as_bytes())
            }
            RequestArgs::Put { resource, content_type, content } => {
                client.put(&resource, &content_type, content.as_bytes())
            }
            RequestArgs::Delete { resource } => client.delete(&resource),
            RequestArgs::Options { resource } => client.options(&resource),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub server: String,
    pub request: RequestArgs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgsError {
    /// Too few arguments for the requested method.
    Usage,
    UnknownMethod(String),
    InvalidPort(String),
}

impl ArgsError {
    pub fn exit_code(&self) -> u8 {
        match self {
            ArgsError::Usage | ArgsError::InvalidPort(_) => 1,
            ArgsError::UnknownMethod(_) => 2,
        }
    }
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::Usage => f.write_str(USAGE),
            ArgsError::UnknownMethod(name) => write!(f, "unrecognized http operation: {name}"),
            ArgsError::InvalidPort(value) => write!(f, "invalid MINIHTTP_PORT: {value}"),
        }
    }
}

impl std::error::Error for ArgsError {}

/// Parse the arguments that follow the program name.
pub fn parse<I>(args: I) -> Result<Command, ArgsError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let (Some(server), Some(request)) = (args.next(), args.next()) else {
        return Err(ArgsError::Usage);
    };

    let method = request.parse::<HttpMethod>().map_err(|e| match e {
        ClientError::UnknownMethod(name) => ArgsError::UnknownMethod(name),
        _ => ArgsError::UnknownMethod(request.clone()),
    })?;

    let resource = args.next().ok_or(ArgsError::Usage)?;
    let request = if method.carries_body() {
        let (Some(content_type), Some(content)) = (args.next(), args.next()) else {
            return Err(ArgsError::Usage);
        };
        match method {
            HttpMethod::Post => RequestArgs::Post { resource, content_type, content },
            _ => RequestArgs::Put { resource, content_type, content },
        }
    } else {
        match method {
            HttpMethod::Head => RequestArgs::Head { resource },
            HttpMethod::Get => RequestArgs::Get { resource },
            HttpMethod::Delete => RequestArgs::Delete { resource },
            _ => RequestArgs::Options { resource },
        }
    };

    Ok(Command { server, request })
}

/// Port from the `MINIHTTP_PORT` value, if set.
pub fn port(value: Option<String>) -> Result<u16, ArgsError> {
    match value {
        None => Ok(DEFAULT_PORT),
        Some(v) => v.trim().parse().map_err(|_| ArgsError::InvalidPort(v)),
    }
}
