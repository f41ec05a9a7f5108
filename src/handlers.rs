use crate::app::AppState;
use crate::error::{AppError, AppResult};
use crate::provider::{self, ProviderCall, TranslateRequest};
use crate::relay;
use crate::upstream::{self, UpstreamErrorKind};
use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response, Sse};
use serde_json::{Value, json};

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics.render()
}

pub async fn translate(
    State(state): State<AppState>,
    Json(req): Json<TranslateRequest>,
) -> AppResult<Response> {
    let call = ProviderCall::plan(&req)?;
    let provider = call.provider();
    metrics::counter!("translay_requests_total", "provider" => provider.as_str()).increment(1);
    tracing::info!(
        provider = provider.as_str(),
        model = %req.model,
        temperature = req.temperature,
        prompt_chars = req.user_prompt.chars().count(),
        "translate request"
    );

    match call {
        ProviderCall::Chat { body } => {
            let api_key = state.settings.chat_key()?;
            match upstream::call_chat_stream(&state.http, &state.settings.chat_url, api_key, &body)
                .await
            {
                Ok(resp) => Ok(Sse::new(relay::relay_stream(resp)).into_response()),
                Err(err) => {
                    metrics::counter!("translay_upstream_errors_total", "kind" => err.kind.as_str())
                        .increment(1);
                    if err.kind == UpstreamErrorKind::Http {
                        // Non-success statuses answer in-band as the stream's
                        // only event; transport failures answer as plain JSON.
                        tracing::warn!("chat upstream failed: {}", err.message);
                        Ok(Sse::new(relay::error_stream(&err)).into_response())
                    } else {
                        Err(err.into())
                    }
                }
            }
        }
        ProviderCall::Web { body, target } => {
            let api_key = state.settings.web_key()?;
            let url = state.settings.web_url()?;
            let text = match upstream::call_web_translate(&state.http, &url, api_key, body).await {
                Ok(text) => text,
                Err(err) => {
                    metrics::counter!("translay_upstream_errors_total", "kind" => err.kind.as_str())
                        .increment(1);
                    return Err(err.into());
                }
            };
            let value = serde_json::from_str::<Value>(&text).unwrap_or(Value::Null);
            let result = provider::extract_web_result(&value).ok_or_else(|| {
                AppError::upstream_decode(format!("unexpected web translate response: {text}"))
            })?;
            tracing::debug!(lang = target, chars = result.chars().count(), "web translate done");
            Ok(Json(json!({ "result": result })).into_response())
        }
    }
}
