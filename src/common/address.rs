use lettre::message::{Mailbox, Mailboxes};
use snafu::ResultExt;

use super::{AddressSnafu, Result};

/// Parse a comma separated list of addresses, as accepted by the `-to` and
/// `-cc` flags. Display names (`Name <user@host>`) are allowed.
///
/// field is used to provide context in case of an error.
pub fn parse_address_list(value: &str, field: &str) -> Result<Mailboxes> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(Mailboxes::new());
    }

    trimmed
        .parse::<Mailboxes>()
        .context(AddressSnafu { field, value })
}

/// Parse a single address, such as the sender.
pub fn parse_address(value: &str, field: &str) -> Result<Mailbox> {
    value
        .trim()
        .parse::<Mailbox>()
        .context(AddressSnafu { field, value })
}

pub fn is_empty(mailboxes: &Mailboxes) -> bool {
    mailboxes.iter().next().is_none()
}
