use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Gemini credential. `None` means every completion call fails and the
    /// summary falls back to the fixed placeholder text.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub completion_timeout_secs: u64,
    pub navigation_timeout_secs: u64,
    /// Upper bound on review pages visited in one run.
    pub max_review_pages: usize,
    pub headless: bool,
    pub chrome_executable: Option<PathBuf>,
    /// Where review analyses are written when no output is given.
    pub output_path: PathBuf,
    /// Where product records are written when no output is given.
    pub product_output_path: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("completion_timeout_secs", &self.completion_timeout_secs)
            .field("navigation_timeout_secs", &self.navigation_timeout_secs)
            .field("max_review_pages", &self.max_review_pages)
            .field("headless", &self.headless)
            .field("chrome_executable", &self.chrome_executable)
            .field("output_path", &self.output_path)
            .field("product_output_path", &self.product_output_path)
            .finish()
    }
}
