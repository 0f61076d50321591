use anyhow::Context;
use std::time::Duration;

/// User-Agent sent on outbound stream requests that do not carry one.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";

/// Runtime configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origin: String,
    /// Sources loaded at startup, in order.
    pub playlists: Vec<String>,
    /// Load the built-in sources when nothing else is loaded.
    pub load_defaults: bool,
    pub fetch_timeout: Duration,
    pub user_agent: String,
    /// Accept local file paths in `POST /playlists`. Startup sources may
    /// always be files.
    pub allow_file_sources: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_allowed_origin: "*".to_string(),
            playlists: Vec::new(),
            load_defaults: true,
            fetch_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            allow_file_sources: false,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Unset or blank variables
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();

        if let Some(host) = get("HOST") {
            config.host = host;
        }
        if let Some(port) = get("PORT") {
            config.port = port
                .parse()
                .with_context(|| format!("invalid PORT: {}", port))?;
        }
        if let Some(origin) = get("CORS_ALLOWED_ORIGIN") {
            config.cors_allowed_origin = origin;
        }
        if let Some(list) = get("ZAPPER_PLAYLISTS") {
            config.playlists = split_sources(&list);
        }
        if let Some(flag) = get("ZAPPER_LOAD_DEFAULTS") {
            config.load_defaults = parse_bool(&flag)
                .with_context(|| format!("invalid ZAPPER_LOAD_DEFAULTS: {}", flag))?;
        }
        if let Some(secs) = get("ZAPPER_FETCH_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("invalid ZAPPER_FETCH_TIMEOUT_SECS: {}", secs))?;
            config.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(agent) = get("ZAPPER_USER_AGENT") {
            config.user_agent = agent;
        }
        if let Some(flag) = get("ZAPPER_ALLOW_FILE_SOURCES") {
            config.allow_file_sources = parse_bool(&flag)
                .with_context(|| format!("invalid ZAPPER_ALLOW_FILE_SOURCES: {}", flag))?;
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn split_sources(list: &str) -> Vec<String> {
    list.split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(value: &str) -> anyhow::Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("expected a boolean"),
    }
}
