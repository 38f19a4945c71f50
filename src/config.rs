use anyhow::{Context, Result, bail};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub db_pool_size: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| "training.db".to_string());
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:5000".to_string());

        let db_pool_size = match lookup("DB_POOL_SIZE") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("DB_POOL_SIZE must be a positive integer, got {raw:?}"))?,
            None => 8,
        };

        if database_url.trim().is_empty() {
            bail!("DATABASE_URL must not be empty");
        }
        if db_pool_size == 0 {
            bail!("DB_POOL_SIZE must be at least 1");
        }

        Ok(Self {
            database_url,
            bind_addr,
            db_pool_size,
        })
    }
}
