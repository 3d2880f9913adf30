pub mod auth;
pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const CMD_HASH_PASSWORD: &str = "hash-password";
pub const ARG_PASSWORD: &str = "password";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let command = Command::new("cookie-jar")
        .about("Cookie session authentication")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("COOKIE_JAR_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .subcommand(
            Command::new(CMD_HASH_PASSWORD)
                .about("Print an Argon2 hash suitable for the users file")
                .arg(
                    Arg::new(ARG_PASSWORD)
                        .help("Password to hash, read from stdin when omitted"),
                ),
        );

    let command = auth::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::path::PathBuf;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "cookie-jar");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Cookie session authentication".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_check_args() {
        temp_env::with_vars(
            [
                ("COOKIE_JAR_COOKIE_SECRET", None::<&str>),
                ("COOKIE_JAR_USERS_FILE", None),
                ("COOKIE_JAR_PAGES_DIR", None),
                ("COOKIE_JAR_SESSION_TTL", None),
                ("COOKIE_JAR_SECURE_COOKIES", None),
            ],
            || {
                let matches = new().get_matches_from(vec![
                    "cookie-jar",
                    "--port",
                    "9090",
                    "--cookie-secret",
                    "0123456789abcdef0123456789abcdef",
                    "--users-file",
                    "/etc/cookie-jar/users",
                    "--session-ttl",
                    "60",
                    "--secure-cookies",
                ]);

                assert_eq!(matches.get_one::<u16>("port").copied(), Some(9090));
                let options = auth::Options::parse(&matches);
                assert_eq!(
                    options
                        .cookie_secret
                        .as_ref()
                        .map(|secret| secret.expose_secret().to_string()),
                    Some("0123456789abcdef0123456789abcdef".to_string())
                );
                assert_eq!(
                    options.users_file,
                    Some(PathBuf::from("/etc/cookie-jar/users"))
                );
                assert_eq!(options.session_ttl_seconds, 60);
                assert!(options.secure_cookies);
                assert!(options.pages_dir.is_none());
            },
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("COOKIE_JAR_PORT", Some("443")),
                (
                    "COOKIE_JAR_COOKIE_SECRET",
                    Some("fedcba9876543210fedcba9876543210"),
                ),
                ("COOKIE_JAR_USERS_FILE", Some("/srv/users")),
                ("COOKIE_JAR_PAGES_DIR", Some("/srv/pages")),
                ("COOKIE_JAR_SESSION_TTL", None),
                ("COOKIE_JAR_SECURE_COOKIES", None),
                ("COOKIE_JAR_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["cookie-jar"]);
                assert_eq!(matches.get_one::<u16>("port").copied(), Some(443));
                assert_eq!(matches.get_one::<u8>("verbosity").copied(), Some(2));

                let options = auth::Options::parse(&matches);
                assert!(options.cookie_secret.is_some());
                assert_eq!(options.users_file, Some(PathBuf::from("/srv/users")));
                assert_eq!(options.pages_dir, Some(PathBuf::from("/srv/pages")));
                assert_eq!(options.session_ttl_seconds, 43200);
                assert!(!options.secure_cookies);
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("COOKIE_JAR_LOG_LEVEL", Some(level))], || {
                let matches = new().get_matches_from(vec!["cookie-jar"]);
                assert_eq!(
                    matches.get_one::<u8>("verbosity").copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5usize {
            temp_env::with_vars([("COOKIE_JAR_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["cookie-jar".to_string()];
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>("verbosity").copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_hash_password_subcommand() {
        let matches = new().get_matches_from(vec!["cookie-jar", "hash-password", "hunter2"]);
        let sub = matches.subcommand_matches(CMD_HASH_PASSWORD);
        assert_eq!(
            sub.and_then(|m| m.get_one::<String>(ARG_PASSWORD)).cloned(),
            Some("hunter2".to_string())
        );
    }
}
