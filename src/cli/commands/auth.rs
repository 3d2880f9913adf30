use clap::{Arg, ArgAction, ArgMatches, Command};
use secrecy::SecretString;
use std::path::PathBuf;

pub const ARG_COOKIE_SECRET: &str = "cookie-secret";
pub const ARG_USERS_FILE: &str = "users-file";
pub const ARG_PAGES_DIR: &str = "pages-dir";
pub const ARG_SESSION_TTL: &str = "session-ttl";
pub const ARG_SECURE_COOKIES: &str = "secure-cookies";

const DEFAULT_SESSION_TTL_SECONDS: u64 = 12 * 60 * 60;

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_COOKIE_SECRET)
                .long(ARG_COOKIE_SECRET)
                .help("Secret used to sign session cookies (at least 32 bytes)")
                .env("COOKIE_JAR_COOKIE_SECRET")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_USERS_FILE)
                .long(ARG_USERS_FILE)
                .help("File with one `username:<argon2 hash>` entry per line")
                .env("COOKIE_JAR_USERS_FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(ARG_PAGES_DIR)
                .long(ARG_PAGES_DIR)
                .help("Directory with login.html and profile.html (default: built-in pages)")
                .env("COOKIE_JAR_PAGES_DIR")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(ARG_SESSION_TTL)
                .long(ARG_SESSION_TTL)
                .help("Session lifetime in seconds, 0 disables expiry")
                .default_value("43200")
                .env("COOKIE_JAR_SESSION_TTL")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_SECURE_COOKIES)
                .long(ARG_SECURE_COOKIES)
                .help("Mark the session cookie Secure (HTTPS only)")
                .env("COOKIE_JAR_SECURE_COOKIES")
                .action(ArgAction::SetTrue),
        )
}

#[derive(Debug)]
pub struct Options {
    pub cookie_secret: Option<SecretString>,
    pub users_file: Option<PathBuf>,
    pub pages_dir: Option<PathBuf>,
    pub session_ttl_seconds: u64,
    pub secure_cookies: bool,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        Self {
            cookie_secret: matches
                .get_one::<String>(ARG_COOKIE_SECRET)
                .filter(|secret| !secret.is_empty())
                .map(|secret| SecretString::from(secret.clone())),
            users_file: matches.get_one::<PathBuf>(ARG_USERS_FILE).cloned(),
            pages_dir: matches.get_one::<PathBuf>(ARG_PAGES_DIR).cloned(),
            session_ttl_seconds: matches
                .get_one::<u64>(ARG_SESSION_TTL)
                .copied()
                .unwrap_or(DEFAULT_SESSION_TTL_SECONDS),
            secure_cookies: matches.get_flag(ARG_SECURE_COOKIES),
        }
    }
}
