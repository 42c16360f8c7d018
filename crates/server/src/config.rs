//! Server configuration from environment variables.

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8765;
pub const DEFAULT_MAX_SESSIONS: usize = 64;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Frame length of each session loop.
    pub tick_ms: u64,
    /// Connections beyond this count are closed right after the handshake.
    pub max_sessions: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            tick_ms: crate::types::TICK_MS as u64,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    ///
    /// `ZEN_TETRIS_HOST`, `ZEN_TETRIS_PORT`, `ZEN_TETRIS_TICK_MS` and
    /// `ZEN_TETRIS_MAX_SESSIONS`. Missing or unparsable values fall back to
    /// the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let host = lookup("ZEN_TETRIS_HOST")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = lookup("ZEN_TETRIS_PORT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);
        let tick_ms = lookup("ZEN_TETRIS_TICK_MS")
            .and_then(|s| s.trim().parse().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(defaults.tick_ms);
        let max_sessions = lookup("ZEN_TETRIS_MAX_SESSIONS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.max_sessions);

        Self {
            host,
            port,
            tick_ms,
            max_sessions,
        }
    }

    /// `host:port` for `TcpListener::bind`, which also resolves host names.
    ///
    /// Bare IPv6 literals are bracketed.
    pub fn bind_addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg, ServerConfig::default());
        assert_eq!(cfg.port, 8765);
        assert_eq!(cfg.tick_ms, 16);
    }

    #[test]
    fn reads_overrides() {
        let cfg = ServerConfig::from_lookup(lookup(&[
            ("ZEN_TETRIS_HOST", "0.0.0.0"),
            ("ZEN_TETRIS_PORT", "9000"),
            ("ZEN_TETRIS_TICK_MS", "33"),
            ("ZEN_TETRIS_MAX_SESSIONS", "2"),
        ]));
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.tick_ms, 33);
        assert_eq!(cfg.max_sessions, 2);
    }

    #[test]
    fn bad_values_fall_back() {
        let cfg = ServerConfig::from_lookup(lookup(&[
            ("ZEN_TETRIS_PORT", "not-a-port"),
            ("ZEN_TETRIS_TICK_MS", "0"),
        ]));
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.tick_ms, 16);
    }

    #[test]
    fn bind_addr_keeps_host_names() {
        let with_host = |host: &str| ServerConfig {
            host: host.into(),
            ..ServerConfig::default()
        };
        assert_eq!(ServerConfig::default().bind_addr(), "127.0.0.1:8765");
        assert_eq!(with_host("localhost").bind_addr(), "localhost:8765");
        assert_eq!(with_host("::1").bind_addr(), "[::1]:8765");
        assert_eq!(with_host("[::1]").bind_addr(), "[::1]:8765");
    }
}
