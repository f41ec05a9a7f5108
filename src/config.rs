use crate::error::{AppError, AppResult};

pub const DEFAULT_CHAT_URL: &str = "https://ark.cn-beijing.volces.com/api/v3/chat/completions";

/// Provider credentials and endpoints, read from the environment once at
/// startup. Missing values are tolerated here and reported per request so
/// the server still boots (and serves the page) unconfigured.
#[derive(Debug, Clone)]
pub struct Settings {
    pub chat_api_key: Option<String>,
    pub chat_url: String,
    pub web_api_key: Option<String>,
    pub web_host: Option<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        let chat_api_key = std::env::var("ARK_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let chat_url = std::env::var("TRANSLAY_CHAT_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CHAT_URL.to_string());
        let web_api_key = std::env::var("WEB_TRANSLATE_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let web_host = std::env::var("WEB_TRANSLATE_HOST")
            .ok()
            .filter(|v| !v.trim().is_empty());
        Self {
            chat_api_key,
            chat_url,
            web_api_key,
            web_host,
        }
    }

    pub fn chat_key(&self) -> AppResult<&str> {
        self.chat_api_key
            .as_deref()
            .ok_or_else(|| AppError::config_missing("ARK_API_KEY is not set"))
    }

    pub fn web_key(&self) -> AppResult<&str> {
        self.web_api_key
            .as_deref()
            .ok_or_else(|| AppError::config_missing("WEB_TRANSLATE_API_KEY is not set"))
    }

    // Accepts a bare host or a full base URL; bare hosts get https.
    pub fn web_url(&self) -> AppResult<String> {
        let host = self
            .web_host
            .as_deref()
            .ok_or_else(|| AppError::config_missing("WEB_TRANSLATE_HOST is not set"))?;
        let base = if host.starts_with("http://") || host.starts_with("https://") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("https://{host}")
        };
        Ok(format!("{base}/v1/translateHtml"))
    }
}
