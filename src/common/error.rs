use std::path::PathBuf;

use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Invalid config, {message} ({prefix})"))]
    ConfigError { message: String, prefix: String },
    #[snafu(display("Failed to load config from {}: {source}", path.display()))]
    LoadError {
        path: PathBuf,
        source: Box<dyn std::error::Error>,
    },
    #[snafu(display("Invalid email addresses in {field}: {value:?}: {source}"))]
    AddressError {
        field: String,
        value: String,
        source: lettre::address::AddressError,
    },
    #[snafu(display("Invalid email addresses in {field}: no address"))]
    NoAddressError { field: String },
    #[snafu(display("{message}: {source}"))]
    InputError {
        message: String,
        source: std::io::Error,
    },
    #[snafu(display("{message}"))]
    SenderError { message: String },
    #[snafu(display("{message}: {source}"))]
    MessageError {
        message: String,
        source: Box<dyn std::error::Error>,
    },
    #[snafu(display("Failed to send via {server}:{port}: {source}"))]
    SendError {
        server: String,
        port: u16,
        source: lettre::transport::smtp::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
