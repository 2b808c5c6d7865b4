pub mod common;
pub mod config;
pub mod message;
pub mod service;
pub mod smtp;

pub use self::config::*;
