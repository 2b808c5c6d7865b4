use lettre::message::Mailbox;

use crate::common::{parse_address, Result, SenderSnafu};

const USER_VARS: [&str; 3] = ["USER", "LOGNAME", "USERNAME"];

/// `<user>@<hostname>` for the account running the process.
pub fn local_sender() -> Result<Mailbox> {
    let user = USER_VARS
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
        .ok_or_else(|| {
            SenderSnafu {
                message: format!(
                    "Unable to determine the local user from {}, pass -from",
                    USER_VARS.join("/")
                ),
            }
            .build()
        })?;

    let host = hostname::get().map_err(|err| {
        SenderSnafu {
            message: format!("Unable to determine the hostname: {err}"),
        }
        .build()
    })?;

    sender_from_parts(&user, &host.to_string_lossy())
}

pub(super) fn sender_from_parts(user: &str, host: &str) -> Result<Mailbox> {
    parse_address(&format!("{user}@{host}"), "from")
}
