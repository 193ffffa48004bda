use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub auth: AuthConfig,
    pub server: ServerConfig,
    pub tokens: TokenConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    /// Single browser origin allowed by CORS
    pub cors_allowed_origin: String,
    pub data_dir: String,
}

#[derive(Clone)]
pub struct TokenConfig {
    /// HMAC secret used to sign and verify bearer tokens
    pub secret: String,
    pub ttl_seconds: u64,
}

// Keeps the secret out of logs.
impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Path prefixes that skip bearer-token resolution entirely
    pub exempt_prefixes: Vec<String>,
    pub hash_iterations: u32,
    pub hash_memory_kib: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            cors_allowed_origin: "http://localhost:3000".to_string(),
            data_dir: "./data".to_string(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            exempt_prefixes: vec!["/api/auth/".to_string()],
            hash_iterations: argon2::Params::DEFAULT_T_COST,
            hash_memory_kib: argon2::Params::DEFAULT_M_COST,
        }
    }
}

/// Minimum secret length (in bytes) before a warning is logged
const RECOMMENDED_SECRET_LEN: usize = 32;

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = ServerConfig::default();

        let bind_address = std::env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address);
        let data_dir = std::env::var("DATA_DIR").unwrap_or(defaults.data_dir);
        let cors_allowed_origin =
            std::env::var("CORS_ALLOWED_ORIGIN").unwrap_or(defaults.cors_allowed_origin);

        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        let ttl_seconds = parse_var("JWT_EXPIRATION_SECONDS")?.unwrap_or(86400);

        let auth_defaults = AuthConfig::default();
        let exempt_prefixes = std::env::var("AUTH_EXEMPT_PREFIXES")
            .map(|p| {
                p.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(auth_defaults.exempt_prefixes);
        let hash_memory_kib =
            parse_var("PASSWORD_HASH_MEMORY_KIB")?.unwrap_or(auth_defaults.hash_memory_kib);
        let hash_iterations =
            parse_var("PASSWORD_HASH_ITERATIONS")?.unwrap_or(auth_defaults.hash_iterations);

        let config = Config {
            auth: AuthConfig {
                exempt_prefixes,
                hash_iterations,
                hash_memory_kib,
            },
            server: ServerConfig {
                bind_address,
                cors_allowed_origin,
                data_dir,
            },
            tokens: TokenConfig {
                secret,
                ttl_seconds,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.tokens.secret.is_empty() {
            return Err(ConfigError::ValidationError(
                "JWT_SECRET must be set".to_string(),
            ));
        }
        if self.tokens.secret.len() < RECOMMENDED_SECRET_LEN {
            tracing::warn!(
                length = self.tokens.secret.len(),
                "JWT_SECRET is shorter than {} bytes. Use a longer random value in production.",
                RECOMMENDED_SECRET_LEN
            );
        }

        if self.tokens.ttl_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "JWT_EXPIRATION_SECONDS must be greater than 0".to_string(),
            ));
        }

        if self.auth.hash_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "PASSWORD_HASH_ITERATIONS must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether a request path bypasses identity resolution.
    pub fn is_exempt_path(&self, path: &str) -> bool {
        self.auth
            .exempt_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}

/// Read an optional numeric environment variable, rejecting unparsable values.
fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|_| {
            ConfigError::ValidationError(format!("{name} must be a valid number, got '{raw}'"))
        }),
        Err(_) => Ok(None),
    }
}
