use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub eventstore_url: String,
    pub eventstore_database: String,
    pub eventstore_user: String,
    pub eventstore_password: String,
    pub query_timeout_ms: u64,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            port: std::env::var("CASALYTICS_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|e| format!("invalid port: {e}"))?,
            eventstore_url: std::env::var("CASALYTICS_EVENTSTORE_URL")
                .unwrap_or_else(|_| "http://localhost:8123".to_string()),
            eventstore_database: std::env::var("CASALYTICS_EVENTSTORE_DATABASE")
                .unwrap_or_else(|_| "casalytics".to_string()),
            eventstore_user: std::env::var("CASALYTICS_EVENTSTORE_USER")
                .unwrap_or_else(|_| "default".to_string()),
            eventstore_password: std::env::var("CASALYTICS_EVENTSTORE_PASSWORD")
                .unwrap_or_default(),
            query_timeout_ms: std::env::var("CASALYTICS_QUERY_TIMEOUT_MS")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()
                .map_err(|e| format!("invalid query timeout: {e}"))?,
            cors_origins: std::env::var("CASALYTICS_CORS_ORIGINS")
                .map(|v| v.split(',').map(str::to_string).collect())
                .unwrap_or_default(),
        })
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}
