use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayPalConfig {
    pub client_id: String,
    pub secret: String,
    pub api_base: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub paypal: PayPalConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "learnhub".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "learnhub-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24),
        };
        let paypal = PayPalConfig {
            client_id: std::env::var("PAYPAL_CLIENT_ID")?,
            secret: std::env::var("PAYPAL_SECRET")?,
            api_base: std::env::var("PAYPAL_API_BASE")
                .unwrap_or_else(|_| "https://api-m.sandbox.paypal.com".into()),
            timeout_secs: std::env::var("PAYPAL_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(15),
        };
        Ok(Self {
            database_url,
            jwt,
            paypal,
        })
    }
}
