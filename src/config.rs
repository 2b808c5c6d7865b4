use std::ffi::OsString;
use std::path::{Path, PathBuf};

use snafu::prelude::*;

use crate::common::{secret_file_or_string, ConfigSnafu, Result};

pub const DEFAULT_PORT: u16 = 465;

const DEFAULT_CONFIG: &str = "sendmail/config.json";

#[cfg(feature = "cli")]
const ENV_PREFIX: &str = "SENDMAIL";

/// SMTP server settings.
///
/// Built from defaults and the config file, overlaid once with command line
/// values, then only read.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
    pub server: String,
    pub port: u16,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: String::new(),
            port: DEFAULT_PORT,
            user: String::new(),
            password: String::new(),
        }
    }
}

/// Values supplied on the command line. Empty strings and a zero port are
/// treated as not supplied.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub server: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl Config {
    /// Read the JSON config file at path, then any `SENDMAIL_*` environment
    /// variables on top of it.
    ///
    /// A missing file is only an error when required is set. Malformed JSON
    /// is always an error.
    ///
    /// Environment values are kept as strings, so `SENDMAIL_PASSWORD=007`
    /// stays `007`. Only `port` is parsed as a number.
    #[cfg(feature = "cli")]
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        Self::load_with_env(path, required, None)
    }

    /// Like `load`, reading `SENDMAIL_*` values from env instead of the
    /// process environment when it is given.
    #[cfg(feature = "cli")]
    fn load_with_env(
        path: &Path,
        required: bool,
        env: Option<::config::Map<String, String>>,
    ) -> Result<Self> {
        let config: Self = ::config::Config::builder()
            .add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Json)
                    .required(required),
            )
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).source(env))
            .build()
            .and_then(|c| c.try_deserialize::<Self>())
            .boxed_local()
            .context(crate::common::LoadSnafu { path })?;

        tracing::debug!(
            path = %path.display(),
            server = %config.server,
            port = config.port,
            "Config loaded"
        );
        Ok(config)
    }

    pub fn update(&mut self, overrides: Overrides) {
        if let Some(server) = overrides.server.filter(|v| !v.is_empty()) {
            self.server = server;
        }
        if let Some(port) = overrides.port.filter(|v| *v != 0) {
            self.port = port;
        }
        if let Some(user) = overrides.user.filter(|v| !v.is_empty()) {
            self.user = user;
        }
        if let Some(password) = overrides.password.filter(|v| !v.is_empty()) {
            self.password = password;
        }
    }

    /// Check the merged config is usable and expand a `@file` password.
    pub fn resolve(mut self) -> Result<Self> {
        ensure!(
            !self.server.trim().is_empty(),
            ConfigSnafu {
                message: "missing server value",
                prefix: "server",
            }
        );
        self.password = secret_file_or_string(self.password, "password")?;
        Ok(self)
    }

    pub fn has_credentials(&self) -> bool {
        !self.user.is_empty()
    }
}

/// `$XDG_CONFIG_HOME/sendmail/config.json`, falling back to
/// `$HOME/.config/sendmail/config.json`.
pub fn default_path() -> PathBuf {
    config_path_in(std::env::var_os("XDG_CONFIG_HOME"), dirs::home_dir())
}

fn config_path_in(xdg_config_home: Option<OsString>, home: Option<PathBuf>) -> PathBuf {
    match xdg_config_home.filter(|v| !v.is_empty()) {
        Some(dir) => Path::new(&dir).join(DEFAULT_CONFIG),
        None => home
            .unwrap_or_default()
            .join(".config")
            .join(DEFAULT_CONFIG),
    }
}
