use clap::builder::BoolishValueParser;
use clap::{
    crate_authors, crate_description, crate_version, value_parser, Arg, ArgAction, ArgMatches,
    Command,
};
use std::env;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::exit;

use sendmail_rs::common::{ConfigSnafu, Result};
use sendmail_rs::service::{Options, Prompt, Sendmail};
use sendmail_rs::smtp::SmtpDialer;
use sendmail_rs::{default_path, Config, Overrides};

/// Long flags taking a value. Like the switches below they may also be
/// written with a single dash, e.g. `-to`.
const VALUE_FLAGS: [&str; 11] = [
    "from", "subject", "to", "cc", "body", "conf", "attach", "server", "port", "user",
    "password",
];

/// Boolean flags, accepting an optional `=true`/`=false`.
const SWITCH_FLAGS: [&str; 4] = ["dryrun", "dry-run", "html", "check"];

const DEFAULT_LOG_FILTER: &str = "info";

/// `RUST_LOG` when set, otherwise info for everything.
fn log_filters(rust_log: Option<String>) -> String {
    rust_log
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

fn setup_logger() {
    let filters = log_filters(env::var("RUST_LOG").ok());
    // Adapted from env_logger examples. <3 Systemd support
    match env::var("RUST_LOG_STYLE") {
        Ok(s) if s == "SYSTEMD" => {
            let mut builder = env_logger::builder();
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "<{}>{}: {}",
                    match record.level() {
                        log::Level::Error => 3,
                        log::Level::Warn => 4,
                        log::Level::Info => 6,
                        log::Level::Debug => 7,
                        log::Level::Trace => 7,
                    },
                    record.target(),
                    record.args()
                )
            });
            builder.parse_filters(&filters).init();
        }
        _ => {
            pretty_env_logger::formatted_builder()
                .parse_filters(&filters)
                .init();
        }
    };
}

/// Name of a known long flag written as `-name`, `--name` or either form
/// with `=value`, and whether it was written with a single dash.
fn long_flag(arg: &str) -> Option<(&str, bool)> {
    let (rest, single_dash) = match arg.strip_prefix("--") {
        Some(rest) => (rest, false),
        None => (arg.strip_prefix('-')?, true),
    };
    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    (VALUE_FLAGS.contains(&name) || SWITCH_FLAGS.contains(&name)).then_some((name, single_dash))
}

/// Rewrite `-to x` and `-to=x` into `--to x` so both spellings work.
/// The argument following a value flag is its value and is never rewritten.
/// Anything after a bare `--` is left alone.
fn normalize_args<I: IntoIterator<Item = OsString>>(args: I) -> Vec<OsString> {
    let mut passthrough = false;
    let mut value_next = false;
    args.into_iter()
        .enumerate()
        .map(|(i, arg)| {
            if i == 0 || passthrough {
                return arg;
            }
            if value_next {
                value_next = false;
                return arg;
            }
            let Some(s) = arg.to_str() else {
                return arg;
            };
            if s == "--" {
                passthrough = true;
                return arg;
            }
            match long_flag(s) {
                Some((name, single_dash)) => {
                    value_next = VALUE_FLAGS.contains(&name) && !s.contains('=');
                    match single_dash {
                        true => OsString::from(format!("-{s}")),
                        false => arg,
                    }
                }
                None => arg,
            }
        })
        .collect()
}

fn text_arg(name: &'static str, value_name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name(value_name)
        .allow_hyphen_values(true)
        .help(help)
}

fn path_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name("PATH")
        .value_parser(value_parser!(PathBuf))
        .allow_hyphen_values(true)
        .help(help)
}

/// A switch that also takes `=true`, `=false` and the other boolish spellings.
fn switch_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .action(ArgAction::Set)
        .num_args(0..=1)
        .require_equals(true)
        .value_parser(BoolishValueParser::new())
        .default_value("false")
        .default_missing_value("true")
        .help(help)
}

fn command() -> Command {
    Command::new("sendmail")
        .about(format!(
            "{}\n{} {}",
            crate_description!(),
            "Server settings are read from $XDG_CONFIG_HOME/sendmail/config.json,",
            "SENDMAIL_* environment variables and the flags below.",
        ))
        .arg(text_arg("from", "ADDRESS", "From address"))
        .arg(text_arg("to", "ADDRESSES", "To address(es), comma separated"))
        .arg(text_arg("cc", "ADDRESSES", "CC address(es), comma separated"))
        .arg(text_arg("subject", "TEXT", "Email subject"))
        .arg(text_arg(
            "body",
            "TEXT",
            "Email body, read from standard input when omitted",
        ))
        .arg(path_arg("attach", "Attachment path"))
        .arg(switch_arg("html", "Send as html"))
        .arg(
            switch_arg(
                "dryrun",
                "Testing mode, compose the message without sending it",
            )
            .alias("dry-run"),
        )
        .arg(path_arg("conf", "Config file path"))
        .arg(text_arg("server", "HOST", "SMTP server host"))
        .arg(
            Arg::new("port")
                .long("port")
                .value_name("PORT")
                .value_parser(value_parser!(u16))
                .help("SMTP server port"),
        )
        .arg(text_arg("user", "NAME", "SMTP server username"))
        .arg(text_arg(
            "password",
            "SECRET",
            "SMTP server password, or @path to read it from a file",
        ))
        .arg(switch_arg(
            "check",
            "Print the effective configuration and exit",
        ))
        .version(crate_version!())
        .author(crate_authors!("\n"))
}

fn load_config(args: &ArgMatches) -> Result<Config> {
    let (path, required) = match args.get_one::<PathBuf>("conf") {
        Some(path) => (path.clone(), true),
        None => (default_path(), false),
    };

    let mut config = Config::load(&path, required)?;
    config.update(Overrides {
        server: args.get_one::<String>("server").cloned(),
        port: args.get_one::<u16>("port").copied(),
        user: args.get_one::<String>("user").cloned(),
        password: args.get_one::<String>("password").cloned(),
    });
    config.resolve()
}

fn options(args: &ArgMatches) -> Options {
    let text = |name: &str| args.get_one::<String>(name).cloned();
    Options {
        from: text("from"),
        to: text("to"),
        cc: text("cc"),
        subject: text("subject"),
        body: text("body"),
        attachment: args.get_one::<PathBuf>("attach").cloned(),
        html: args.get_flag("html"),
        dry_run: args.get_flag("dryrun"),
    }
}

fn run(args: &ArgMatches) -> Result<()> {
    let config = load_config(args)?;

    if args.get_flag("check") {
        let json = serde_json::to_string_pretty(&config).map_err(|err| {
            ConfigSnafu {
                message: err.to_string(),
                prefix: "check",
            }
            .build()
        })?;
        println!("{json}");
        tracing::info!(server = %config.server, port = config.port, "Configuration is valid.");
        return Ok(());
    }

    let service = Sendmail::new(config, Box::new(SmtpDialer));
    let stdin = io::stdin();
    let mut prompt = Prompt::new(stdin.lock(), io::stdout());
    service.run(options(args), &mut prompt)?;
    Ok(())
}

pub(crate) fn main() {
    let args = command().get_matches_from(normalize_args(env::args_os()));

    setup_logger();

    if let Err(err) = run(&args) {
        eprintln!("ERROR: {err}");
        exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn parse(args: &[&str]) -> ArgMatches {
        let args = std::iter::once("sendmail")
            .chain(args.iter().copied())
            .map(OsString::from);
        command().try_get_matches_from(normalize_args(args)).unwrap()
    }

    #[test]
    fn command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn single_dash_flags_are_rewritten() {
        let args: Vec<OsString> = ["sendmail", "-to", "a@b.com", "-port=25", "-h", "--", "-cc"]
            .into_iter()
            .map(OsString::from)
            .collect();
        let normalized = normalize_args(args);
        assert_eq!(
            normalized,
            ["sendmail", "--to", "a@b.com", "--port=25", "-h", "--", "-cc"]
                .into_iter()
                .map(OsString::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn unknown_single_dash_flags_are_kept() {
        assert_eq!(long_flag("-x"), None);
        assert_eq!(long_flag("hello@test.com"), None);
        assert_eq!(long_flag("--to"), Some(("to", false)));
        assert_eq!(long_flag("-dryrun"), Some(("dryrun", true)));
        assert_eq!(long_flag("-subject=hi"), Some(("subject", true)));
    }

    #[test]
    fn flag_values_are_never_rewritten() {
        let args = ["sendmail", "-subject", "-to", "-to", "a@b.com", "-html"]
            .into_iter()
            .map(OsString::from);
        assert_eq!(
            normalize_args(args),
            ["sendmail", "--subject", "-to", "--to", "a@b.com", "--html"]
                .into_iter()
                .map(OsString::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn hyphen_values_are_accepted() {
        let opts = options(&parse(&["-subject", "-x-", "-to", "a@b.com", "-body", "-"]));
        assert_eq!(opts.subject.as_deref(), Some("-x-"));
        assert_eq!(opts.to.as_deref(), Some("a@b.com"));
        assert_eq!(opts.body.as_deref(), Some("-"));

        let opts = options(&parse(&["-subject", "-to", "-to", "a@b.com"]));
        assert_eq!(opts.subject.as_deref(), Some("-to"));
        assert_eq!(opts.to.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn switches_take_explicit_values() {
        let opts = options(&parse(&["-dryrun=true", "-html=false"]));
        assert!(opts.dry_run);
        assert!(!opts.html);

        let opts = options(&parse(&["--dry-run=false", "--html=true"]));
        assert!(!opts.dry_run);
        assert!(opts.html);

        let opts = options(&parse(&["-to", "a@b.com"]));
        assert!(!opts.dry_run);
        assert!(!opts.html);

        let args = ["sendmail", "-dryrun=maybe"].into_iter().map(OsString::from);
        assert!(command().try_get_matches_from(normalize_args(args)).is_err());
    }

    #[test]
    fn switches_do_not_swallow_the_next_argument() {
        let args = ["sendmail", "-dryrun", "stray"].into_iter().map(OsString::from);
        assert!(command().try_get_matches_from(normalize_args(args)).is_err());
    }

    #[test]
    fn rust_log_overrides_default_filter() {
        assert_eq!(log_filters(None), "info");
        assert_eq!(log_filters(Some(String::new())), "info");
        assert_eq!(log_filters(Some("debug".to_string())), "debug");
        assert_eq!(
            log_filters(Some("sendmail_rs=trace,warn".to_string())),
            "sendmail_rs=trace,warn"
        );
    }

    #[test]
    fn go_style_invocation() {
        let args = parse(&["-to", "hello@test.com", "-subject", "test", "-dryrun", "-html"]);
        let opts = options(&args);

        assert_eq!(opts.to.as_deref(), Some("hello@test.com"));
        assert_eq!(opts.subject.as_deref(), Some("test"));
        assert!(opts.dry_run);
        assert!(opts.html);
        assert!(opts.from.is_none());
        assert!(opts.body.is_none());
    }

    #[test]
    fn dry_run_alias() {
        assert!(options(&parse(&["--dry-run"])).dry_run);
    }

    #[test]
    fn invalid_port_is_a_usage_error() {
        let args = ["sendmail", "-port", "smtp"].into_iter().map(OsString::from);
        assert!(command().try_get_matches_from(normalize_args(args)).is_err());
    }

    #[test]
    fn flags_overlay_config_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"server": "smtp.example.com", "user": "file-user"}}"#).unwrap();
        let conf = file.path().to_str().unwrap();

        let args = parse(&["-conf", conf, "-port", "587", "-user", ""]);
        let config = load_config(&args).unwrap();

        assert_eq!(config.server, "smtp.example.com");
        assert_eq!(config.port, 587);
        assert_eq!(config.user, "file-user");
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let conf = dir.path().join("missing.json");
        let args = parse(&["-conf", conf.to_str().unwrap(), "-server", "smtp.example.com"]);
        assert!(load_config(&args).is_err());
    }
}
