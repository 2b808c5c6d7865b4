use std::path::PathBuf;

/// Per invocation inputs. Anything left as `None` is derived or prompted for.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub from: Option<String>,
    pub to: Option<String>,
    pub cc: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub attachment: Option<PathBuf>,
    pub html: bool,
    pub dry_run: bool,
}

/// Treat an empty flag value the same as a missing one.
pub(super) fn supplied(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
