//! Page templates with `{{placeholder}}` substitution.
//!
//! Substituted values are HTML-escaped; templates themselves are trusted.

use anyhow::{Context, Result};
use std::{fs, path::Path};

const LOGIN_TEMPLATE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/pages/login.html"));
const PROFILE_TEMPLATE: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/pages/profile.html"));

#[derive(Clone, Debug)]
pub struct Pages {
    login: String,
    profile: String,
}

impl Default for Pages {
    fn default() -> Self {
        Self::embedded()
    }
}

impl Pages {
    /// Templates compiled into the binary.
    #[must_use]
    pub fn embedded() -> Self {
        Self {
            login: LOGIN_TEMPLATE.to_string(),
            profile: PROFILE_TEMPLATE.to_string(),
        }
    }

    /// Load `login.html` and `profile.html` from `dir`.
    ///
    /// # Errors
    /// Returns an error if either template cannot be read.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let read = |name: &str| {
            let path = dir.join(name);
            fs::read_to_string(&path)
                .with_context(|| format!("Failed to read page template: {}", path.display()))
        };
        Ok(Self {
            login: read("login.html")?,
            profile: read("profile.html")?,
        })
    }

    #[must_use]
    pub fn login(&self, error: Option<&str>) -> String {
        render(&self.login, "error", error.unwrap_or_default())
    }

    #[must_use]
    pub fn profile(&self, username: &str) -> String {
        render(&self.profile, "username", username)
    }
}

fn render(template: &str, key: &str, value: &str) -> String {
    template.replace(&format!("{{{{{key}}}}}"), &escape_html(value))
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
