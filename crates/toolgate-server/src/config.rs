use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};

use toolgate_core::{Error, ModelTimeouts};

use crate::auth::ApiKeys;

/// Server settings, read from flags or the environment (a `.env` file is
/// loaded first when present).
#[derive(Clone, Parser)]
#[command(name = "toolgate", about = "JSON-RPC tool server gated by API keys", version)]
pub struct Settings {
    /// Address to bind
    #[arg(long, env = "TOOLGATE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind
    #[arg(long, env = "TOOLGATE_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Client keys accepted in `X-API-Key`: comma-separated or a JSON list
    #[arg(long, env = "ALLOWED_CLIENT_KEYS", default_value = "")]
    pub allowed_client_keys: String,

    /// Key for the external generation model
    #[arg(long, env = "GEMINI_API_KEY")]
    pub gemini_api_key: Option<String>,

    /// Log at debug level unless `RUST_LOG` says otherwise
    #[arg(
        long,
        env = "DEBUG",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub debug: bool,

    #[arg(long, env = "PRO_TIMEOUT", default_value_t = 60)]
    pub pro_timeout: u64,

    #[arg(long, env = "FLASH_TIMEOUT", default_value_t = 20)]
    pub flash_timeout: u64,

    #[arg(long, env = "FLASH_LITE_TIMEOUT", default_value_t = 10)]
    pub flash_lite_timeout: u64,

    #[arg(long, env = "LEGACY_FLASH_TIMEOUT", default_value_t = 15)]
    pub legacy_flash_timeout: u64,
}

impl Settings {
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn default_log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }

    #[must_use]
    pub fn timeouts(&self) -> ModelTimeouts {
        ModelTimeouts {
            pro_secs: self.pro_timeout,
            flash_secs: self.flash_timeout,
            flash_lite_secs: self.flash_lite_timeout,
            legacy_flash_secs: self.legacy_flash_timeout,
        }
    }

    /// Parse the configured client keys.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the value looks like a JSON list but
    /// does not parse as one.
    pub fn allowed_keys(&self) -> Result<ApiKeys, Error> {
        parse_keys(&self.allowed_client_keys)
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("allowed_client_keys", &"[REDACTED]")
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("debug", &self.debug)
            .field("timeouts", &self.timeouts())
            .finish()
    }
}

fn parse_keys(raw: &str) -> Result<ApiKeys, Error> {
    let raw = raw.trim();
    if raw.starts_with('[') {
        let values: Vec<serde_json::Value> = serde_json::from_str(raw)
            .map_err(|e| Error::Config(format!("ALLOWED_CLIENT_KEYS is not a valid JSON list: {e}")))?;
        Ok(values
            .into_iter()
            .map(|v| match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect())
    } else {
        Ok(raw.split(',').map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(args: &[&str]) -> Settings {
        let mut argv = vec!["toolgate"];
        argv.extend_from_slice(args);
        Settings::try_parse_from(argv).unwrap()
    }

    #[test]
    fn comma_separated_keys() {
        let keys = parse_keys(" dev-key-1, dev-key-2 ,,").unwrap();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains("dev-key-1"));
        assert!(keys.contains("dev-key-2"));
    }

    #[test]
    fn json_list_keys() {
        let keys = parse_keys(r#"["a", " b ", "", 7]"#).unwrap();
        assert_eq!(keys.len(), 3);
        assert!(keys.contains("b"));
        assert!(keys.contains("7"));
    }

    #[test]
    fn bad_json_list() {
        assert!(matches!(parse_keys("[\"a\""), Err(Error::Config(_))));
    }

    #[test]
    fn empty_keys() {
        assert!(parse_keys("").unwrap().is_empty());
    }

    #[test]
    fn flags_override_defaults() {
        let s = settings(&[
            "--port",
            "9000",
            "--allowed-client-keys",
            "k1,k2",
            "--pro-timeout",
            "5",
        ]);
        assert_eq!(s.addr(), "0.0.0.0:9000");
        assert_eq!(s.allowed_keys().unwrap().len(), 2);
        assert_eq!(s.timeouts().pro_secs, 5);
        assert_eq!(s.timeouts().flash_secs, 20);
    }

    #[test]
    fn debug_redacts_secrets() {
        let s = settings(&["--allowed-client-keys", "secret-key", "--gemini-api-key", "g-secret"]);
        let rendered = format!("{s:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(!rendered.contains("g-secret"));
    }

    #[test]
    fn debug_env_accepts_boolish_values() {
        // Only this test touches DEBUG; restore whatever was set before.
        let previous = std::env::var("DEBUG").ok();
        for (raw, expected) in [
            ("1", true),
            ("yes", true),
            ("on", true),
            ("true", true),
            ("0", false),
            ("no", false),
            ("off", false),
            ("false", false),
        ] {
            std::env::set_var("DEBUG", raw);
            let parsed = Settings::try_parse_from(["toolgate"]).unwrap();
            assert_eq!(parsed.debug, expected, "DEBUG={raw}");
        }
        match previous {
            Some(v) => std::env::set_var("DEBUG", v),
            None => std::env::remove_var("DEBUG"),
        }
    }

    #[test]
    fn debug_flag_without_value() {
        assert!(settings(&["--debug"]).debug);
    }
}
