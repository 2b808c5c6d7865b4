use std::io::{BufRead, Write};

use lettre::message::Mailboxes;

use crate::common::{parse_address, parse_address_list, Dialer, Result};
use crate::message::Message;
use crate::Config;

use super::config::supplied;
use super::{local_sender, Options, Prompt};

pub struct Sendmail {
    config: Config,
    dialer: Box<dyn Dialer>,
}

impl Sendmail {
    pub fn new(config: Config, dialer: Box<dyn Dialer>) -> Self {
        Self { config, dialer }
    }

    /// Compose a message from options, prompting for what is missing, and
    /// send it unless this is a dry run.
    pub fn run<R: BufRead, W: Write>(
        &self,
        options: Options,
        prompt: &mut Prompt<R, W>,
    ) -> Result<Message> {
        let message = self.compose(&options, prompt)?;
        self.deliver(&message, options.dry_run)?;
        Ok(message)
    }

    pub fn compose<R: BufRead, W: Write>(
        &self,
        options: &Options,
        prompt: &mut Prompt<R, W>,
    ) -> Result<Message> {
        let from = match supplied(&options.from) {
            Some(from) => parse_address(from, "from")?,
            None => local_sender()?,
        };

        // Prompted and flag values go through the same parser.
        let to = match supplied(&options.to) {
            Some(to) => to.to_string(),
            None => prompt.read_line("To: ")?,
        };
        let to = parse_address_list(&to, "to")?;

        let cc = match supplied(&options.cc) {
            Some(cc) => parse_address_list(cc, "cc")?,
            None => Mailboxes::new(),
        };

        let subject = match supplied(&options.subject) {
            Some(subject) => subject.to_string(),
            None => prompt.read_line("Subject: ")?,
        };

        let body = match supplied(&options.body) {
            Some(body) => body.to_string(),
            None => {
                tracing::info!("Email body (ctrl-d to send):");
                prompt.read_to_end()?
            }
        };

        let message = Message::new(
            from,
            to,
            cc,
            subject,
            body,
            options.html,
            options.attachment.clone(),
        )?;

        tracing::debug!(
            from = %message.from(),
            to = %message.to(),
            recipients = message.recipients(),
            content_type = ?message.content_type(),
            "Message composed"
        );
        Ok(message)
    }

    pub fn deliver(&self, message: &Message, dry_run: bool) -> Result<()> {
        tracing::info!(
            server = %self.config.server,
            recipients = message.recipients(),
            dry_run,
            "Sending..."
        );

        if dry_run {
            // Build the MIME message anyway so encoding problems surface.
            let email = match message.attachment().filter(|p| !p.is_file()) {
                Some(path) => {
                    tracing::warn!(
                        path = %path.display(),
                        "Attachment is not a readable file, sending would fail"
                    );
                    message.to_email_without_attachment()?
                }
                None => message.to_email()?,
            };
            tracing::debug!(size = email.formatted().len(), "Dry run, message not sent");
        } else {
            self.dialer.dial_and_send(message, &self.config)?;
        }

        tracing::info!("Done.");
        Ok(())
    }
}
