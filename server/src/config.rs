use once_cell::sync::Lazy;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://firms.modaps.eosdis.nasa.gov/api/area/csv";
pub const DEFAULT_SOURCE: &str = "VIIRS_SNPP_NRT";

#[derive(Clone, Debug, Deserialize)]
pub struct FirmsConfig {
    /// FIRMS MAP_KEY. Rate limited upstream, never logged.
    pub map_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_source")]
    pub default_source: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub firms: FirmsConfig,
}

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    envy::prefixed("FIREFEED_")
        .from_env::<FirmsConfig>()
        .map(|firms| Config { firms })
        .expect("Missing FIRMS config. Required env vars: FIREFEED_MAP_KEY (optional: FIREFEED_BASE_URL, FIREFEED_DEFAULT_SOURCE, FIREFEED_TIMEOUT_SECS)")
});

pub fn config() -> &'static Config {
    &CONFIG
}
