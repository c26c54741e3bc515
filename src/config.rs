use envconfig::Envconfig;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Envconfig, Clone)]
pub struct Config {
    /// Server bind address
    #[envconfig(from = "BIND_ADDR", default = "127.0.0.1:3000")]
    pub bind_addr: SocketAddr,

    /// Word list for the primary language ("en")
    #[envconfig(
        from = "WORDS_PRIMARY_URL",
        default = "https://raw.githubusercontent.com/RazorSh4rk/random-word-api/master/words.json"
    )]
    pub primary_url: String,

    /// Per-language word list URL, `{lang}` is replaced with the language code
    #[envconfig(
        from = "WORDS_LANGUAGE_URL",
        default = "https://raw.githubusercontent.com/RazorSh4rk/random-word-api/master/languages/{lang}.json"
    )]
    pub language_url: String,

    /// Minimum delay between two admitted requests from one client
    #[envconfig(from = "RATE_LIMIT_WINDOW_MS", default = "5000")]
    pub rate_limit_window_ms: u64,

    /// Default level for the crate's own log target
    #[envconfig(from = "LOG_LEVEL", default = "info")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, envconfig::Error> {
        Config::init_from_env()
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_millis(self.rate_limit_window_ms)
    }
}
