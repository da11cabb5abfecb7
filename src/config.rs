use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub ttl_days: i64,
    pub sweep_period_seconds: u64,
}

impl SessionConfig {
    pub fn ttl(&self) -> time::Duration {
        time::Duration::days(self.ttl_days)
    }

    pub fn sweep_period(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_period_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub session: SessionConfig,
    pub exchange: ExchangeConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(3001);
        let cors_origins = std::env::var("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        let session = SessionConfig {
            ttl_days: std::env::var("SESSION_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(7),
            sweep_period_seconds: std::env::var("SESSION_SWEEP_SECONDS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(120),
        };
        let exchange = ExchangeConfig {
            base_url: std::env::var("EXCHANGE_API_URL")
                .unwrap_or_else(|_| "https://v6.exchangerate-api.com/v6".into()),
            api_key: std::env::var("EXCHANGE_API_KEY")?,
        };
        Ok(Self {
            database_url,
            host,
            port,
            cors_origins,
            session,
            exchange,
        })
    }
}
