//! Connection string handling.
//!
//! Application configs often carry a driver marker in the scheme
//! (`postgresql+asyncpg://`, `sqlite+aiosqlite://`). The probe and the
//! migrator talk to the database through sqlx, which only understands the
//! plain scheme, so the marker is stripped on parse.

use crate::error::{GateError, Result};
use std::fmt;
use url::Url;

const REDACTED: &str = "***";

#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseUrl {
    raw: String,
    normalized: Url,
}

impl DatabaseUrl {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(GateError::InvalidDatabaseUrl("empty connection string".to_string()));
        }

        let mut normalized =
            Url::parse(raw).map_err(|e| GateError::InvalidDatabaseUrl(e.to_string()))?;

        if let Some((base, driver)) = normalized.scheme().split_once('+') {
            let (base, driver) = (base.to_string(), driver.to_string());
            normalized.set_scheme(&base).map_err(|_| {
                GateError::InvalidDatabaseUrl(format!("cannot strip driver marker `+{driver}`"))
            })?;
            tracing::debug!(
                scheme = %base,
                driver = %driver,
                "Stripped driver marker from database URL"
            );
        }

        Ok(Self {
            raw: raw.to_string(),
            normalized,
        })
    }

    /// Normalized form, suitable for sqlx/sea-orm.
    pub fn as_str(&self) -> &str {
        self.normalized.as_str()
    }

    /// The string exactly as configured.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn scheme(&self) -> &str {
        self.normalized.scheme()
    }

    /// Normalized form with the password masked, for logs and error output.
    pub fn redacted(&self) -> String {
        let mut url = self.normalized.clone();
        if url.password().is_some() {
            // Only fails for URLs without a host, which carry no password anyway
            let _ = url.set_password(Some(REDACTED));
        }
        url.into()
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

impl fmt::Debug for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DatabaseUrl").field(&self.redacted()).finish()
    }
}
