use serde::Deserialize;
use std::env;

/// Environment variable read by [`RouterOptions::from_env`]
pub const PREFIX_ENV: &str = "ROUTE_MAPPING_PREFIX";

/// Options for [`init_router`](crate::router::init_router)
///
/// Deserializable so it can live inside an application's own config file:
///
/// ```
/// use route_mapping::RouterOptions;
///
/// #[derive(serde::Deserialize)]
/// struct AppConfig {
///     #[serde(default)]
///     routes: RouterOptions,
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouterOptions {
    /// Prepended verbatim to every registered path
    pub prefix: String,
}

impl RouterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Options with the prefix taken from `ROUTE_MAPPING_PREFIX`, empty if unset
    pub fn from_env() -> Self {
        let prefix = env::var(PREFIX_ENV).unwrap_or_default();
        Self { prefix }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefix_is_empty() {
        assert_eq!(RouterOptions::default().prefix, "");
        assert_eq!(RouterOptions::new().with_prefix("/api").prefix, "/api");
    }

    // The only test touching ROUTE_MAPPING_PREFIX
    #[test]
    fn test_from_env_reads_prefix() {
        unsafe { env::set_var(PREFIX_ENV, "/v2") };
        assert_eq!(RouterOptions::from_env().prefix, "/v2");

        unsafe { env::remove_var(PREFIX_ENV) };
        assert_eq!(RouterOptions::from_env(), RouterOptions::default());
    }

    #[test]
    fn test_deserialize() {
        let options: RouterOptions = serde_json::from_str(r#"{"prefix": "/v1"}"#).unwrap();
        assert_eq!(options.prefix, "/v1");

        let options: RouterOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, RouterOptions::default());
    }
}
