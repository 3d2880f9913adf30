//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to the action the binary executes: the HTTP
//! server by default, or one of the helper subcommands.

use crate::cli::actions::{hash_password, server, Action};
use crate::cli::commands::{auth, ARG_PASSWORD, CMD_HASH_PASSWORD};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    if let Some(sub_m) = matches.subcommand_matches(CMD_HASH_PASSWORD) {
        return Ok(Action::HashPassword(hash_password::Args {
            password: sub_m
                .get_one::<String>(ARG_PASSWORD)
                .map(|password| SecretString::from(password.clone())),
        }));
    }

    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let auth_opts = auth::Options::parse(matches);

    // The signing secret has no default value.
    let cookie_secret = auth_opts
        .cookie_secret
        .context("missing required argument: --cookie-secret")?;
    let users_file = auth_opts
        .users_file
        .context("missing required argument: --users-file")?;

    Ok(Action::Server(server::Args {
        port,
        cookie_secret,
        users_file,
        pages_dir: auth_opts.pages_dir,
        session_ttl_seconds: auth_opts.session_ttl_seconds,
        secure_cookies: auth_opts.secure_cookies,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAN_ENV: [(&str, Option<&str>); 4] = [
        ("COOKIE_JAR_COOKIE_SECRET", None),
        ("COOKIE_JAR_USERS_FILE", None),
        ("COOKIE_JAR_PAGES_DIR", None),
        ("COOKIE_JAR_SESSION_TTL", None),
    ];

    fn dispatch(args: &[&str]) -> Result<Action> {
        let command = crate::cli::commands::new();
        let matches = command.get_matches_from(args);
        handler(&matches)
    }

    #[test]
    fn cookie_secret_required() {
        temp_env::with_vars(CLEAN_ENV, || {
            let result = dispatch(&["cookie-jar", "--users-file", "/srv/users"]);
            assert!(result.is_err());
            if let Err(err) = result {
                assert!(err
                    .to_string()
                    .contains("missing required argument: --cookie-secret"));
            }
        });
    }

    #[test]
    fn users_file_required() {
        temp_env::with_vars(CLEAN_ENV, || {
            let result = dispatch(&[
                "cookie-jar",
                "--cookie-secret",
                "0123456789abcdef0123456789abcdef",
            ]);
            assert!(result.is_err());
            if let Err(err) = result {
                assert!(err
                    .to_string()
                    .contains("missing required argument: --users-file"));
            }
        });
    }

    #[test]
    fn server_action() {
        temp_env::with_vars(CLEAN_ENV, || {
            let result = dispatch(&[
                "cookie-jar",
                "-p",
                "3000",
                "--cookie-secret",
                "0123456789abcdef0123456789abcdef",
                "--users-file",
                "/srv/users",
            ]);
            match result {
                Ok(Action::Server(args)) => {
                    assert_eq!(args.port, 3000);
                    assert_eq!(args.users_file.to_str(), Some("/srv/users"));
                    assert_eq!(args.session_ttl_seconds, 43200);
                }
                other => panic!("expected server action, got {other:?}"),
            }
        });
    }

    #[test]
    fn hash_password_does_not_need_server_args() {
        temp_env::with_vars(CLEAN_ENV, || {
            let result = dispatch(&["cookie-jar", "hash-password"]);
            assert!(matches!(
                result,
                Ok(Action::HashPassword(hash_password::Args { password: None }))
            ));
        });
    }
}
