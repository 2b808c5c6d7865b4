use crate::message::Message;
use crate::Config;

/// Opens a connection to the configured server and transmits a message.
pub trait Dialer {
    fn dial_and_send(&self, message: &Message, config: &Config) -> super::Result<()>;
}
