use crate::auth::hash_password;
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::io::{self, BufRead};

#[derive(Debug)]
pub struct Args {
    pub password: Option<SecretString>,
}

/// Print an Argon2id PHC string for the given password.
/// # Errors
/// Returns an error if the password cannot be read or hashed.
pub async fn execute(args: Args) -> Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => read_password(io::stdin().lock())?,
    };

    let phc = tokio::task::spawn_blocking(move || hash_password(password.expose_secret()))
        .await
        .context("Password hashing task failed")??;

    println!("{phc}");

    Ok(())
}

fn read_password(mut reader: impl BufRead) -> Result<SecretString> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']);
    anyhow::ensure!(!password.is_empty(), "Password must not be empty");
    Ok(SecretString::from(password.to_string()))
}
