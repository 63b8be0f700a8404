use crate::errors::{AppError, AppResult};
use crate::state::Variant;
use std::path::PathBuf;

pub const DEFAULT_CHART_OUTPUT: &str = "covered_call_profit.html";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub variant: Variant,
    pub server_host: String,
    pub server_port: u16,
    pub chart_output: PathBuf,
    pub chart_font: String,
    pub open_browser: bool,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. `from_env` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let variant = var_or("COVERCALL_MODE", "interactive")
            .parse::<Variant>()
            .map_err(|e| AppError::Config(format!("COVERCALL_MODE: {e}")))?;

        let server_port = var_or("SERVER_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| AppError::Config(format!("SERVER_PORT: {e}")))?;

        let open_browser = parse_flag(&var_or("OPEN_BROWSER", "true"))
            .ok_or_else(|| AppError::Config("OPEN_BROWSER: expected true/false".into()))?;

        Ok(Self {
            variant,
            server_host: var_or("SERVER_HOST", "127.0.0.1"),
            server_port,
            chart_output: PathBuf::from(var_or("CHART_OUTPUT", DEFAULT_CHART_OUTPUT)),
            chart_font: var_or("CHART_FONT", "Arial"),
            open_browser,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
