//! Environment variable expansion for configuration files.
//!
//! Supports `${VAR}` (the variable must be set) and `${VAR:-default}` (the
//! default is used when the variable is unset or empty). A `$` not followed by
//! `{` is left alone.

use std::borrow::Cow;
use std::sync::OnceLock;

use anyhow::{Result, bail};
use regex::Regex;
use tracing::debug;

fn var_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(:-([^}]*))?\}")
            .expect("env var regex should compile")
    })
}

/// Expands references using the process environment.
pub fn expand_env_vars(text: &str) -> Result<Cow<'_, str>> {
    expand_with(text, |name| std::env::var(name).ok())
}

/// Expands references using `lookup` to read variables.
pub fn expand_with<F>(text: &str, lookup: F) -> Result<Cow<'_, str>>
where
    F: Fn(&str) -> Option<String>,
{
    if !text.contains("${") {
        return Ok(Cow::Borrowed(text));
    }

    let mut out = String::with_capacity(text.len());
    let mut last_end = 0;
    for cap in var_pattern().captures_iter(text) {
        let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        out.push_str(&text[last_end..whole.start()]);

        let value = lookup(name.as_str()).filter(|v| !v.is_empty() || cap.get(2).is_none());
        match (value, cap.get(3)) {
            (Some(v), _) => out.push_str(&v),
            (None, Some(default)) => {
                debug!(var = name.as_str(), "env var unset; using default");
                out.push_str(default.as_str());
            }
            (None, None) => bail!(
                "Environment variable '{}' is not set and no default provided",
                name.as_str()
            ),
        }
        last_end = whole.end();
    }
    out.push_str(&text[last_end..]);

    if let Some(pos) = out.find("${") {
        let rest: String = out[pos..].chars().take(24).collect();
        bail!("Invalid environment reference near '{rest}'");
    }
    Ok(Cow::Owned(out))
}
