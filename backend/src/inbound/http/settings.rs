//! Application settings parsing and validation.
//!
//! This module centralises the environment-driven start-up settings so they
//! are validated consistently and can be tested in isolation.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use mockable::Env;
use tracing::warn;

use crate::domain::{DeploymentMode, UnknownDeploymentMode};

/// Variable naming the deployment mode.
pub const APP_ENV: &str = "APP_ENV";
/// Variable naming the listen address.
pub const APP_HOST: &str = "APP_HOST";
/// Variable naming the listen port.
pub const APP_PORT: &str = "APP_PORT";

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 3000;
const HOST_EXPECTED: &str = "an IPv4 or IPv6 address";
const PORT_EXPECTED: &str = "a port number between 0 and 65535";

/// Build mode for settings validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing values.
    Debug,
    /// Release builds require an explicit deployment mode and valid values.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tour_backend::inbound::http::settings::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Settings resolved at start-up.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AppSettings {
    /// How much failure detail clients may see.
    pub mode: DeploymentMode,
    /// Socket address the server binds to.
    pub bind_addr: SocketAddr,
}

/// Errors raised while validating settings.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv {
        /// Variable name.
        name: &'static str,
    },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Value as supplied.
        value: String,
        /// Description of accepted values.
        expected: &'static str,
    },
    /// `APP_ENV` names no known deployment mode.
    #[error("invalid APP_ENV: {0}")]
    UnknownMode(#[from] UnknownDeploymentMode),
}

/// Build settings from environment variables and build mode.
///
/// # Errors
/// Returns [`SettingsError`] when `APP_ENV` is unknown, or when a value is
/// missing or malformed in a release build.
///
/// # Examples
///
/// ```rust
/// use mockable::MockEnv;
/// use tour_backend::domain::DeploymentMode;
/// use tour_backend::inbound::http::settings::{BuildMode, settings_from_env};
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "APP_ENV" => Some("production".to_owned()),
///     "APP_PORT" => Some("8080".to_owned()),
///     _ => None,
/// });
///
/// let settings = settings_from_env(&env, BuildMode::Release).expect("valid settings");
/// assert_eq!(settings.mode, DeploymentMode::Production);
/// assert_eq!(settings.bind_addr.port(), 8080);
/// ```
pub fn settings_from_env<E: Env>(env: &E, build: BuildMode) -> Result<AppSettings, SettingsError> {
    let mode = mode_from_env(env, build)?;
    let host = host_from_env(env, build)?;
    let port = port_from_env(env, build)?;
    Ok(AppSettings {
        mode,
        bind_addr: SocketAddr::new(host, port),
    })
}

fn mode_from_env<E: Env>(env: &E, build: BuildMode) -> Result<DeploymentMode, SettingsError> {
    match env.string(APP_ENV) {
        Some(value) => Ok(value.parse()?),
        None if build.is_debug() => {
            warn!("APP_ENV not set; defaulting to development");
            Ok(DeploymentMode::Development)
        }
        None => Err(SettingsError::MissingEnv { name: APP_ENV }),
    }
}

fn host_from_env<E: Env>(env: &E, build: BuildMode) -> Result<IpAddr, SettingsError> {
    let Some(value) = env.string(APP_HOST) else {
        return Ok(DEFAULT_HOST);
    };
    if let Ok(host) = value.trim().parse() {
        return Ok(host);
    }
    tolerate_in_debug(build, DEFAULT_HOST, APP_HOST, value, HOST_EXPECTED)
}

fn port_from_env<E: Env>(env: &E, build: BuildMode) -> Result<u16, SettingsError> {
    let Some(value) = env.string(APP_PORT) else {
        return Ok(DEFAULT_PORT);
    };
    if let Ok(port) = value.trim().parse() {
        return Ok(port);
    }
    tolerate_in_debug(build, DEFAULT_PORT, APP_PORT, value, PORT_EXPECTED)
}

fn tolerate_in_debug<T: std::fmt::Display>(
    build: BuildMode,
    fallback: T,
    name: &'static str,
    value: String,
    expected: &'static str,
) -> Result<T, SettingsError> {
    if build.is_debug() {
        warn!(value = %value, default = %fallback, "invalid {name}; using default");
        Ok(fallback)
    } else {
        Err(SettingsError::InvalidEnv {
            name,
            value,
            expected,
        })
    }
}
