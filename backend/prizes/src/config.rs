//! Application configuration loaded from environment variables.

use crate::errors::{AppError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database URL (e.g. `sqlite:./prizes.db`)
    pub database_url: String,
    /// Port for the REST API server
    pub api_port: u16,
    /// Shared secret used to sign and verify bearer tokens
    pub auth_secret: String,
    /// Users allowed to approve proposals. Empty means any authenticated caller.
    pub admin_user_ids: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            database_url: env_var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./prizes.db".to_string()),
            api_port: env_var("API_PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .map_err(|_| AppError::Config("Invalid API_PORT".to_string()))?,
            auth_secret: env_var("AUTH_SECRET")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .ok_or_else(|| {
                    AppError::Config("AUTH_SECRET environment variable is required".to_string())
                })?,
            admin_user_ids: env_var("ADMIN_USER_IDS")
                .map(|raw| parse_id_list(&raw))
                .unwrap_or_default(),
        })
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| AppError::Config(format!("Missing env var: {key}")))
}

/// Split a comma separated list, dropping blanks.
fn parse_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_list_ignores_blanks_and_whitespace() {
        assert_eq!(
            parse_id_list(" alice, bob ,,carol ,"),
            vec!["alice", "bob", "carol"]
        );
        assert!(parse_id_list("").is_empty());
        assert!(parse_id_list(" , ").is_empty());
    }
}
