use std::{env, str::FromStr};

/// Where catalog and coupon reads are served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Memory,
    Database,
}

impl FromStr for CatalogSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(CatalogSource::Memory),
            "database" | "db" => Ok(CatalogSource::Database),
            other => Err(anyhow::anyhow!("unknown CATALOG_SOURCE `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub catalog_source: CatalogSource,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let catalog_source = match env::var("CATALOG_SOURCE") {
            Ok(value) => value.parse()?,
            Err(_) => CatalogSource::Database,
        };
        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            catalog_source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_source_parses() {
        assert_eq!("memory".parse::<CatalogSource>().ok(), Some(CatalogSource::Memory));
        assert_eq!(" Database ".parse::<CatalogSource>().ok(), Some(CatalogSource::Database));
        assert!("redis".parse::<CatalogSource>().is_err());
    }
}
