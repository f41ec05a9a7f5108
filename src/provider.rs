use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{AppError, AppResult};
use crate::language;

/// Reserved model id that routes to the web translation provider. Every
/// other model id goes to the chat-completions endpoint as-is.
pub const WEB_TRANSLATE_MODEL: &str = "web-translate";
pub const DEFAULT_CHAT_MODEL: &str = "doubao-lite-32k-240828";

fn default_temperature() -> f64 {
    0.6
}

fn default_model() -> String {
    DEFAULT_CHAT_MODEL.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub system_prompt: Option<String>,
    pub user_prompt: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub target_language: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Chat,
    Web,
}

impl Provider {
    pub fn for_model(model: &str) -> Self {
        if model == WEB_TRANSLATE_MODEL {
            Provider::Web
        } else {
            Provider::Chat
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Chat => "chat",
            Provider::Web => "web",
        }
    }
}

/// A validated, provider-ready call. Planning performs all request
/// validation up front; nothing here touches the network.
#[derive(Debug, Clone)]
pub enum ProviderCall {
    Chat { body: Value },
    Web { body: String, target: &'static str },
}

impl ProviderCall {
    pub fn plan(req: &TranslateRequest) -> AppResult<Self> {
        if req.user_prompt.trim().is_empty() {
            return Err(AppError::invalid_request("user_prompt must not be empty"));
        }
        match Provider::for_model(&req.model) {
            Provider::Chat => Ok(ProviderCall::Chat {
                body: chat_body(req),
            }),
            Provider::Web => {
                let label = req.target_language.as_deref().ok_or_else(|| {
                    AppError::invalid_request(format!(
                        "target_language is required for model {WEB_TRANSLATE_MODEL:?}"
                    ))
                })?;
                let code = language::code_for(label).ok_or_else(|| {
                    AppError::invalid_request(format!(
                        "unknown target_language {label:?}; expected one of: {}",
                        language::labels().collect::<Vec<_>>().join(", ")
                    ))
                })?;
                Ok(ProviderCall::Web {
                    body: web_body(&req.user_prompt, code),
                    target: code,
                })
            }
        }
    }

    pub fn provider(&self) -> Provider {
        match self {
            ProviderCall::Chat { .. } => Provider::Chat,
            ProviderCall::Web { .. } => Provider::Web,
        }
    }
}

fn chat_body(req: &TranslateRequest) -> Value {
    json!({
        "model": req.model,
        "messages": [
            {"role": "system", "content": req.system_prompt.as_deref().unwrap_or_default()},
            {"role": "user", "content": req.user_prompt},
        ],
        "temperature": req.temperature,
        "stream": true,
    })
}

// `[[[text], "auto", code], "te_lib"]`. The provider rejects standard JSON
// bodies, so this is serialized here and sent as a raw string.
fn web_body(text: &str, target: &'static str) -> String {
    json!([[[text], "auto", target], "te_lib"]).to_string()
}

/// Extraction rule for the web provider's response: an array whose first
/// element is a non-empty array whose first element is the translated
/// string. Anything else is a decode failure handled by the caller.
pub fn extract_web_result(value: &Value) -> Option<&str> {
    value.get(0)?.get(0)?.as_str()
}
