use std::net::SocketAddr;

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub auto_migrate: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => mysql_url(
                &std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
                &std::env::var("DB_USER").unwrap_or_else(|_| "root".to_string()),
                &std::env::var("DB_PASSWORD").unwrap_or_default(),
                &std::env::var("DB_NAME").unwrap_or_else(|_| "cinebase".to_string()),
            ),
        };

        let auto_migrate = match std::env::var("AUTO_MIGRATE") {
            Ok(v) => parse_flag(&v).context("AUTO_MIGRATE")?,
            Err(_) => true,
        };

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            auto_migrate,
        })
    }
}

/// Builds a MySQL connection URL from the individual `DB_*` settings.
pub fn mysql_url(host: &str, user: &str, password: &str, database: &str) -> String {
    let user = urlencoding::encode(user);
    if password.is_empty() {
        format!("mysql://{user}@{host}/{database}")
    } else {
        let password = urlencoding::encode(password);
        format!("mysql://{user}:{password}@{host}/{database}")
    }
}

fn parse_flag(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got {other:?}"),
    }
}
