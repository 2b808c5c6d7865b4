use super::{ConfigSnafu, Result};

/// If the value begins with an '@', read the secret from the file path that
/// follows, otherwise returns the value.
///
/// prefix is used to provide context in case of an error.
pub(crate) fn secret_file_or_string(value: String, prefix: &str) -> Result<String> {
    Ok(match value.strip_prefix('@') {
        Some(secret_file) => std::fs::read_to_string(secret_file)
            .map_err(|err| {
                ConfigSnafu {
                    message: format!("failed to read secret from {secret_file}: {err}"),
                    prefix,
                }
                .build()
            })?
            .trim()
            .into(),
        None => value,
    })
}
