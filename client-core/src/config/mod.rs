use crate::error::CoreError;
use config::{Config as Cfg, Environment, File};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Prefix shared by every environment override, e.g. `APP_BACKEND__BASE_URL`.
pub const ENV_PREFIX: &str = "APP";

/// Load layered settings: an optional file followed by `APP_`-prefixed
/// environment variables, where `__` separates nested keys.
pub fn load<T: DeserializeOwned>(file: &Path) -> Result<T, CoreError> {
    dotenvy::dotenv().ok();

    let settings = Cfg::builder()
        .add_source(File::from(file).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
