use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use karo_core::supabase::SupabaseConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "karo.toml";

#[derive(Deserialize, Debug)]
pub struct Config {
    /// Project URL, e.g. `https://abcd.supabase.co`
    pub supabase_url: String,
    /// Public anon key of the project
    pub supabase_anon_key: String,
    /// Where the signed-in session is kept between runs
    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_session_file() -> PathBuf {
    PathBuf::from(".karo-session.json")
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Reads `karo.toml` (or `path`), overridden by `KARO_*` variables.
    pub fn new(path: Option<&Path>) -> Result<Self, figment::Error> {
        let file = path.unwrap_or(Path::new(CONFIG_FILE));
        Self::from_figment(
            Figment::new()
                .merge(Toml::file(file))
                .merge(Env::prefixed("KARO_")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        figment.extract()
    }

    pub fn supabase(&self) -> SupabaseConfig {
        SupabaseConfig::new(&self.supabase_url, &self.supabase_anon_key)
            .with_session_file(&self.session_file)
            .with_timeout(Duration::from_secs(self.request_timeout_secs))
    }
}
