use std::path::Path;

use lettre::message::{header, Attachment, MultiPart, SinglePart};
use snafu::ResultExt;

use crate::common::{MessageSnafu, Result};

use super::Message;

const ATTACHMENT_CONTENT_TYPE: &str = "application/octet-stream";

fn read_attachment(path: &Path) -> Result<SinglePart> {
    let content = std::fs::read(path).boxed_local().context(MessageSnafu {
        message: format!("Failed to read attachment {}", path.display()),
    })?;

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());

    let content_type = header::ContentType::parse(ATTACHMENT_CONTENT_TYPE)
        .boxed_local()
        .context(MessageSnafu {
            message: "Invalid attachment content type",
        })?;

    Ok(Attachment::new(filename).body(content, content_type))
}

impl Message {
    /// Encode as a MIME message. Reads the attachment from disk, if any.
    pub fn to_email(&self) -> Result<lettre::Message> {
        let attachment = self.attachment().map(read_attachment).transpose()?;
        self.encode(attachment)
    }

    /// Encode as a MIME message, leaving out the attachment.
    pub fn to_email_without_attachment(&self) -> Result<lettre::Message> {
        self.encode(None)
    }

    fn encode(&self, attachment: Option<SinglePart>) -> Result<lettre::Message> {
        let mut builder = lettre::Message::builder()
            .from(self.from().clone())
            .subject(self.subject());
        for mailbox in self.to().iter() {
            builder = builder.to(mailbox.clone());
        }
        for mailbox in self.cc().iter() {
            builder = builder.cc(mailbox.clone());
        }

        let content_type = self.content_type().header();
        let email = match attachment {
            Some(attachment) => builder.multipart(
                MultiPart::mixed()
                    .singlepart(
                        SinglePart::builder()
                            .header(content_type)
                            .body(self.body().to_string()),
                    )
                    .singlepart(attachment),
            ),
            None => builder.header(content_type).body(self.body().to_string()),
        };

        email.boxed_local().context(MessageSnafu {
            message: "Failed to build message",
        })
    }
}
