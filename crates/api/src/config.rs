use std::time::Duration;

use identikit_core::generation::{DEFAULT_MODEL, DEFAULT_VARIATION_COUNT};
use identikit_imagegen::orchestrator::BatchSettings;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`). Raised at runtime when
    /// a batch could take longer; see [`ServerConfig::request_timeout`].
    pub request_timeout_secs: u64,
    /// JWT validation settings.
    pub jwt: JwtConfig,
    /// Image-generation remote settings.
    pub image: ImageGenConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `120`                      |
    ///
    /// See [`JwtConfig::from_env`] and [`ImageGenConfig::from_env`] for the rest.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            image: ImageGenConfig::from_env(),
        }
    }
}

impl ServerConfig {
    /// Whole-request timeout applied by the router.
    ///
    /// At least the worst-case batch time plus [`BATCH_HEADROOM_SECS`], so a
    /// batch whose calls all succeed slowly still gets its response.
    pub fn request_timeout(&self) -> Duration {
        let batch = self.image.worst_case_batch_secs() + BATCH_HEADROOM_SECS;
        Duration::from_secs(self.request_timeout_secs.max(batch))
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Image generation
// ---------------------------------------------------------------------------

pub const DEFAULT_IMAGE_API_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
const DEFAULT_CALL_TIMEOUT_SECS: u64 = 60;
const DEFAULT_CONCURRENCY: usize = 1;
/// Slack on top of the remote calls for auth, snapshot and persistence queries.
pub const BATCH_HEADROOM_SECS: u64 = 15;

/// Settings for the image-generation remote.
#[derive(Debug, Clone)]
pub struct ImageGenConfig {
    /// Full completions endpoint URL.
    pub api_url: String,
    /// Bearer credential. `None` leaves generation unconfigured; the generate
    /// endpoint then fails with a configuration error instead of calling out.
    pub api_key: Option<String>,
    pub model: String,
    pub variation_count: usize,
    pub call_timeout_secs: u64,
    /// Calls in flight at once. `1` issues variations sequentially.
    pub concurrency: usize,
}

impl Default for ImageGenConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_IMAGE_API_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            variation_count: DEFAULT_VARIATION_COUNT,
            call_timeout_secs: DEFAULT_CALL_TIMEOUT_SECS,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl ImageGenConfig {
    /// Load image-generation settings from the environment.
    ///
    /// | Env Var                   | Default                          |
    /// |---------------------------|----------------------------------|
    /// | `IMAGE_API_URL`           | [`DEFAULT_IMAGE_API_URL`]        |
    /// | `IMAGE_API_KEY`           | unset (generation unconfigured)  |
    /// | `IMAGE_MODEL`             | `google/gemini-2.5-flash-image`  |
    /// | `IMAGE_VARIATION_COUNT`   | `4`                              |
    /// | `IMAGE_CALL_TIMEOUT_SECS` | `60`                             |
    /// | `IMAGE_CONCURRENCY`       | `1`                              |
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    ///
    /// # Panics
    ///
    /// Panics if a numeric variable does not parse or is zero, or if
    /// `IMAGE_VARIATION_COUNT` exceeds [`DEFAULT_VARIATION_COUNT`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let positive = |name: &str, default: u64| -> u64 {
            let value = non_empty(name)
                .map(|v| {
                    v.trim()
                        .parse::<u64>()
                        .unwrap_or_else(|e| panic!("{name} must be a valid integer: {e}"))
                })
                .unwrap_or(default);
            assert!(value > 0, "{name} must be greater than zero");
            value
        };

        Self {
            api_url: non_empty("IMAGE_API_URL").unwrap_or(defaults.api_url),
            api_key: non_empty("IMAGE_API_KEY"),
            model: non_empty("IMAGE_MODEL").unwrap_or(defaults.model),
            variation_count: variation_count(positive(
                "IMAGE_VARIATION_COUNT",
                defaults.variation_count as u64,
            )),
            call_timeout_secs: positive("IMAGE_CALL_TIMEOUT_SECS", defaults.call_timeout_secs),
            concurrency: positive("IMAGE_CONCURRENCY", defaults.concurrency as u64) as usize,
        }
    }

    /// Longest a batch can run when every call hits its timeout.
    pub fn worst_case_batch_secs(&self) -> u64 {
        let rounds = self.variation_count.div_ceil(self.concurrency.max(1));
        rounds as u64 * self.call_timeout_secs
    }

    pub fn batch_settings(&self) -> BatchSettings {
        BatchSettings {
            variation_count: self.variation_count,
            concurrency: self.concurrency,
            call_timeout: Duration::from_secs(self.call_timeout_secs),
        }
    }
}

fn variation_count(value: u64) -> usize {
    assert!(
        value <= DEFAULT_VARIATION_COUNT as u64,
        "IMAGE_VARIATION_COUNT must be at most {DEFAULT_VARIATION_COUNT}"
    );
    value as usize
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn image_defaults_when_unset() {
        let config = ImageGenConfig::from_lookup(lookup(&[]));
        assert_eq!(config.api_url, DEFAULT_IMAGE_API_URL);
        assert_eq!(config.api_key, None);
        assert_eq!(config.model, "google/gemini-2.5-flash-image");
        assert_eq!(config.variation_count, 4);
        assert_eq!(config.batch_settings().concurrency, 1);
        assert_eq!(config.batch_settings().call_timeout, Duration::from_secs(60));
    }

    #[test]
    fn image_overrides_are_applied() {
        let config = ImageGenConfig::from_lookup(lookup(&[
            ("IMAGE_API_KEY", "sk-test"),
            ("IMAGE_MODEL", "other/model"),
            ("IMAGE_VARIATION_COUNT", "2"),
            ("IMAGE_CONCURRENCY", "4"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.model, "other/model");
        assert_eq!(config.variation_count, 2);
        assert_eq!(config.concurrency, 4);
    }

    #[test]
    fn blank_api_key_counts_as_unset() {
        let config = ImageGenConfig::from_lookup(lookup(&[("IMAGE_API_KEY", "  ")]));
        assert_eq!(config.api_key, None);
    }

    #[test]
    #[should_panic(expected = "IMAGE_VARIATION_COUNT must be greater than zero")]
    fn zero_variation_count_is_rejected() {
        ImageGenConfig::from_lookup(lookup(&[("IMAGE_VARIATION_COUNT", "0")]));
    }

    #[test]
    #[should_panic(expected = "IMAGE_VARIATION_COUNT must be at most 4")]
    fn variation_count_above_four_is_rejected() {
        ImageGenConfig::from_lookup(lookup(&[("IMAGE_VARIATION_COUNT", "5")]));
    }

    #[test]
    fn worst_case_batch_accounts_for_concurrency() {
        let sequential = ImageGenConfig::default();
        assert_eq!(sequential.worst_case_batch_secs(), 240);

        let paired = ImageGenConfig {
            concurrency: 2,
            ..ImageGenConfig::default()
        };
        assert_eq!(paired.worst_case_batch_secs(), 120);

        let odd = ImageGenConfig {
            variation_count: 3,
            concurrency: 2,
            call_timeout_secs: 10,
            ..ImageGenConfig::default()
        };
        assert_eq!(odd.worst_case_batch_secs(), 20);
    }

    #[test]
    fn request_timeout_covers_a_full_batch() {
        let mut config = server_config(ImageGenConfig::default());
        config.request_timeout_secs = 120;
        assert_eq!(config.request_timeout(), Duration::from_secs(240 + BATCH_HEADROOM_SECS));

        config.request_timeout_secs = 600;
        assert_eq!(config.request_timeout(), Duration::from_secs(600));
    }

    fn server_config(image: ImageGenConfig) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            cors_origins: vec![],
            request_timeout_secs: 120,
            jwt: JwtConfig {
                secret: "secret".into(),
                audience: "authenticated".into(),
                access_token_expiry_mins: 5,
            },
            image,
        }
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        assert_eq!(
            parse_origins("http://a.test, http://b.test,,"),
            vec!["http://a.test", "http://b.test"]
        );
    }
}
