use std::path::{Path, PathBuf};

use lettre::message::{header, Mailbox, Mailboxes};
use snafu::prelude::*;

use crate::common::{is_empty, NoAddressSnafu, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentType {
    #[default]
    Plain,
    Html,
}

impl ContentType {
    pub(super) fn header(self) -> header::ContentType {
        match self {
            ContentType::Plain => header::ContentType::TEXT_PLAIN,
            ContentType::Html => header::ContentType::TEXT_HTML,
        }
    }
}

/// A composed email, ready to hand to a [`crate::common::Dialer`].
#[derive(Debug, Clone)]
pub struct Message {
    from: Mailbox,
    to: Mailboxes,
    cc: Mailboxes,
    subject: String,
    body: String,
    content_type: ContentType,
    attachment: Option<PathBuf>,
}

impl Message {
    /// Fails when to holds no address. The attachment is only read once the
    /// message is encoded for sending.
    pub fn new(
        from: Mailbox,
        to: Mailboxes,
        cc: Mailboxes,
        subject: impl Into<String>,
        body: impl Into<String>,
        html: bool,
        attachment: Option<PathBuf>,
    ) -> Result<Self> {
        ensure!(!is_empty(&to), NoAddressSnafu { field: "to" });

        Ok(Self {
            from,
            to,
            cc,
            subject: subject.into(),
            body: body.into(),
            content_type: match html {
                true => ContentType::Html,
                false => ContentType::Plain,
            },
            attachment,
        })
    }

    pub fn from(&self) -> &Mailbox {
        &self.from
    }

    pub fn to(&self) -> &Mailboxes {
        &self.to
    }

    pub fn cc(&self) -> &Mailboxes {
        &self.cc
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn attachment(&self) -> Option<&Path> {
        self.attachment.as_deref()
    }

    pub fn recipients(&self) -> usize {
        self.to.iter().count() + self.cc.iter().count()
    }
}
