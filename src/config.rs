use std::time::Duration;

/// Upper bound for any cache or warm-up duration (one year).
pub const MAX_DURATION_SECS: u64 = 365 * 24 * 60 * 60;

/// Runtime configuration, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    pub session_key: Option<String>,
    pub admin_password: Option<String>,
    pub dashboard: DashboardConfig,
}

/// Cache lifetimes for the dashboard summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardConfig {
    pub summary_ttl: Duration,
    pub guest_ttl: Duration,
    pub warmup_interval: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            summary_ttl: Duration::from_secs(300),
            guest_ttl: Duration::from_secs(120),
            warmup_interval: Duration::from_secs(3600),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let database_url = get("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| "DATABASE_URL must be set".to_string())?;

        let secs = |key: &str, default: Duration| -> Result<Duration, String> {
            match get(key) {
                Some(raw) => {
                    let n = raw
                        .trim()
                        .parse::<u64>()
                        .map_err(|e| format!("{key}={raw:?}: {e}"))?;
                    if n > MAX_DURATION_SECS {
                        return Err(format!("{key}={n} exceeds {MAX_DURATION_SECS} seconds"));
                    }
                    Ok(Duration::from_secs(n))
                }
                None => Ok(default),
            }
        };

        let defaults = DashboardConfig::default();
        let dashboard = DashboardConfig {
            summary_ttl: secs("DASHBOARD_CACHE_TTL_SECS", defaults.summary_ttl)?,
            guest_ttl: secs("GUEST_CACHE_TTL_SECS", defaults.guest_ttl)?,
            warmup_interval: secs("DASHBOARD_WARMUP_SECS", defaults.warmup_interval)?,
        };

        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|e| format!("DB_MAX_CONNECTIONS={raw:?}: {e}"))?,
            None => 8,
        };

        Ok(Self {
            database_url,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            max_connections,
            session_key: get("SESSION_KEY"),
            admin_password: get("ADMIN_PASSWORD").filter(|p| !p.is_empty()),
            dashboard,
        })
    }
}
