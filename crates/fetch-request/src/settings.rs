//! Loading client defaults from configuration
//!
//! Sources are layered: built-in defaults, then a TOML file, then
//! environment variables prefixed with `FETCH_REQUEST_` (for example
//! `FETCH_REQUEST_BASE_URL`, `FETCH_REQUEST_WITH_TIMESTAMP=false`).

use std::path::Path;

use config::{Config, Environment, File, FileFormat};

use crate::options::RequestConfig;
use crate::response::Response;

/// Prefix of environment variables read by [`load`]
pub const ENV_PREFIX: &str = "FETCH_REQUEST";

/// Load defaults from an optional TOML file and the environment
pub fn load<P>(config_file: Option<P>) -> Response<RequestConfig>
where
    P: AsRef<Path>,
{
    let mut builder = Config::builder().add_source(Config::try_from(&RequestConfig::default())?);

    if let Some(path) = config_file {
        let path = path.as_ref().to_string_lossy().to_string();
        tracing::debug!("Reading request defaults from {}", path);
        builder = builder.add_source(File::new(&path, FileFormat::Toml));
    }

    let config = builder
        .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()?;

    Ok(config.try_deserialize()?)
}

/// Load defaults from a TOML document, ignoring the environment
pub fn from_toml_str(toml: &str) -> Response<RequestConfig> {
    let config = Config::builder()
        .add_source(Config::try_from(&RequestConfig::default())?)
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()?;

    Ok(config.try_deserialize()?)
}
