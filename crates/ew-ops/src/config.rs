use ew_tensor::{BackendVersion, DType};

use crate::error::{DispatchError, Result};

/// Environment key for the default float dtype.
pub const DEFAULT_FLOAT_KEY: &str = "EW_DEFAULT_FLOAT";
/// Environment key for the default integer dtype.
pub const DEFAULT_INT_KEY: &str = "EW_DEFAULT_INT";
/// Environment key overriding the version dtype restrictions are looked up for.
pub const BACKEND_VERSION_KEY: &str = "EW_BACKEND_VERSION";

/// Dispatcher configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Dtype of float literals, and of integer division results.
    pub default_float: DType,
    /// Dtype of integer literals.
    pub default_int: DType,
    /// Version used for dtype restrictions. When unset the backend's own
    /// version applies.
    pub backend_version: Option<BackendVersion>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            default_float: DType::F32,
            default_int: DType::I64,
            backend_version: None,
        }
    }
}

impl DispatchConfig {
    /// Builds a configuration from a key lookup, falling back to the
    /// defaults for missing keys.
    ///
    /// Reads the following keys:
    /// - `EW_DEFAULT_FLOAT` -> default_float (must be a float dtype)
    /// - `EW_DEFAULT_INT` -> default_int (must be a signed integer dtype)
    /// - `EW_BACKEND_VERSION` -> backend_version, e.g. `"2.0.1"`
    pub fn from_lookup<F>(lookup: F) -> Result<DispatchConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = DispatchConfig::default();

        if let Some(value) = lookup(DEFAULT_FLOAT_KEY) {
            let dtype = parse_dtype(DEFAULT_FLOAT_KEY, &value)?;
            if !dtype.is_float() {
                return Err(DispatchError::InvalidOption(format!(
                    "{} must be a float dtype, got {}",
                    DEFAULT_FLOAT_KEY, dtype
                )));
            }
            config.default_float = dtype;
        }

        if let Some(value) = lookup(DEFAULT_INT_KEY) {
            let dtype = parse_dtype(DEFAULT_INT_KEY, &value)?;
            if !dtype.is_signed_integer() {
                return Err(DispatchError::InvalidOption(format!(
                    "{} must be a signed integer dtype, got {}",
                    DEFAULT_INT_KEY, dtype
                )));
            }
            config.default_int = dtype;
        }

        if let Some(value) = lookup(BACKEND_VERSION_KEY) {
            let version = value.parse::<BackendVersion>().map_err(|_| {
                DispatchError::InvalidOption(format!(
                    "{} is not a version: '{}'",
                    BACKEND_VERSION_KEY, value
                ))
            })?;
            config.backend_version = Some(version);
        }

        Ok(config)
    }

    /// Reads the configuration from process environment variables.
    pub fn from_env() -> Result<DispatchConfig> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

fn parse_dtype(key: &str, value: &str) -> Result<DType> {
    value
        .parse::<DType>()
        .map_err(|_| DispatchError::InvalidOption(format!("{} is not a dtype: '{}'", key, value)))
}
