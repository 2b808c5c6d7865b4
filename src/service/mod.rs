mod config;
mod prompt;
mod sender;
mod service;

pub use self::config::Options;
pub use prompt::*;
pub use sender::*;
pub use service::*;
