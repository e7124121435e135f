//! HTTP server configuration loaded from environment variables.

use anyhow::Context;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_WORKERS: usize = 2;

/// Settings for `ip6-what serve`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Server bind address (e.g., "127.0.0.1:8080").
    pub bind_addr: String,

    /// Number of actix worker threads.
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            workers: DEFAULT_WORKERS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `IP6_WHAT_BIND_ADDR`: Server bind address (default: "127.0.0.1:8080")
    /// - `IP6_WHAT_WORKERS`: Worker thread count, at least 1 (default: 2)
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = std::env::var("IP6_WHAT_BIND_ADDR")
            .map(|s| s.trim().to_string())
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let workers = match std::env::var("IP6_WHAT_WORKERS") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("IP6_WHAT_WORKERS is not a number: {raw:?}"))?
                .max(1),
            Err(_) => DEFAULT_WORKERS,
        };

        tracing::info!(
            bind_addr = %bind_addr,
            workers,
            "server configuration loaded"
        );

        Ok(Self { bind_addr, workers })
    }

    /// Replace the bind address when one was given on the command line.
    pub fn with_bind_addr(mut self, bind_addr: Option<String>) -> Self {
        if let Some(bind_addr) = bind_addr {
            self.bind_addr = bind_addr;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Run `f` with only `vars` set among the two server variables, then put
    /// the previous values back.
    fn scoped_env(vars: &[(&str, &str)], f: impl FnOnce()) {
        let _lock = ENV_LOCK.lock().unwrap();
        let keys = ["IP6_WHAT_BIND_ADDR", "IP6_WHAT_WORKERS"];
        let previous = keys.map(|k| std::env::var(k).ok());

        let apply = |values: [Option<&str>; 2]| {
            for (key, value) in keys.iter().zip(values) {
                // Env mutation is confined to tests holding ENV_LOCK.
                unsafe {
                    match value {
                        Some(v) => std::env::set_var(key, v),
                        None => std::env::remove_var(key),
                    }
                }
            }
        };

        apply(keys.map(|k| vars.iter().find(|(name, _)| *name == k).map(|(_, v)| *v)));
        f();
        apply([previous[0].as_deref(), previous[1].as_deref()]);
    }

    #[test]
    fn test_config_defaults() {
        scoped_env(&[], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config, Config::default());
            assert_eq!(config.bind_addr, "127.0.0.1:8080");
            assert_eq!(config.workers, 2);
        });
    }

    #[test]
    fn test_config_custom_values() {
        scoped_env(
            &[
                ("IP6_WHAT_BIND_ADDR", "[::1]:9090"),
                ("IP6_WHAT_WORKERS", "8"),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.bind_addr, "[::1]:9090");
                assert_eq!(config.workers, 8);
            },
        );
    }

    #[test]
    fn test_config_workers_floor_and_errors() {
        scoped_env(&[("IP6_WHAT_WORKERS", "0")], || {
            assert_eq!(Config::from_env().unwrap().workers, 1);
        });
        scoped_env(&[("IP6_WHAT_WORKERS", "many")], || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn test_cli_override() {
        let config = Config::default().with_bind_addr(Some("0.0.0.0:80".into()));
        assert_eq!(config.bind_addr, "0.0.0.0:80");
        assert_eq!(config.with_bind_addr(None).bind_addr, "0.0.0.0:80");
    }
}
