use std::env;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::order::Pagination;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Runtime settings, read once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub paging: PageLimits,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: Pagination::DEFAULT_LIMIT,
            max_limit: 100,
        }
    }
}

impl PageLimits {
    /// Fill in defaults and clamp raw query values into a usable window.
    ///
    /// `page` is capped so that `page * limit` always fits in an `i64`.
    pub fn resolve(&self, page: Option<i64>, limit: Option<i64>) -> Pagination {
        let limit = limit
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit);
        Pagination {
            page: page.unwrap_or(0).clamp(0, i64::MAX / limit),
            limit,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 8080)?;
        let defaults = PageLimits::default();
        let max_limit = parse_or(&lookup, "MAX_PAGE_LIMIT", defaults.max_limit)?;
        let default_limit = parse_or(&lookup, "DEFAULT_PAGE_LIMIT", defaults.default_limit)?;

        if max_limit < 1 {
            return Err(ConfigError::Invalid {
                key: "MAX_PAGE_LIMIT",
                value: max_limit.to_string(),
            });
        }
        if !(1..=max_limit).contains(&default_limit) {
            return Err(ConfigError::Invalid {
                key: "DEFAULT_PAGE_LIMIT",
                value: default_limit.to_string(),
            });
        }

        Ok(Self {
            database_url,
            host,
            port,
            paging: PageLimits {
                default_limit,
                max_limit,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
