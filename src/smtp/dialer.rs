use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{SmtpTransport, Transport};
use snafu::ResultExt;

use crate::common::{Dialer, Result, SendSnafu};
use crate::message::Message;
use crate::Config;

/// Port on which the server expects TLS from the first byte.
pub const IMPLICIT_TLS_PORT: u16 = 465;

const DIALER_NAME: &str = "SMTP";

/// Delivers messages with lettre's blocking SMTP transport.
#[derive(Debug, Default, Clone, Copy)]
pub struct SmtpDialer;

impl SmtpDialer {
    fn transport(&self, config: &Config) -> Result<SmtpTransport> {
        let tls = TlsParameters::new(config.server.clone()).context(SendSnafu {
            server: config.server.as_str(),
            port: config.port,
        })?;

        let tls = match config.port {
            IMPLICIT_TLS_PORT => Tls::Wrapper(tls),
            _ => Tls::Opportunistic(tls),
        };

        let mut builder = SmtpTransport::builder_dangerous(config.server.as_str())
            .port(config.port)
            .tls(tls);

        if config.has_credentials() {
            builder = builder.credentials(Credentials::new(
                config.user.clone(),
                config.password.clone(),
            ));
        }

        Ok(builder.build())
    }
}

impl Dialer for SmtpDialer {
    fn dial_and_send(&self, message: &Message, config: &Config) -> Result<()> {
        let email = message.to_email()?;

        tracing::debug!(
            dialer = DIALER_NAME,
            server = %config.server,
            port = config.port,
            auth = config.has_credentials(),
            "Dialing"
        );

        let response = self
            .transport(config)?
            .send(&email)
            .context(SendSnafu {
                server: config.server.as_str(),
                port: config.port,
            })?;

        tracing::debug!(
            dialer = DIALER_NAME,
            code = %response.code(),
            recipients = message.recipients(),
            "Message accepted",
        );
        Ok(())
    }
}
