use crate::utils::error::ProviderError;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// 送出請求並將回應解析為 `T`；非 2xx 與格式不符都視為來源失敗
pub async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    url: &str,
    timeout: Duration,
) -> Result<T, ProviderError> {
    tracing::debug!("Making API request to: {}", url);

    let response = request.timeout(timeout).send().await.map_err(|source| {
        if source.is_timeout() {
            ProviderError::Timeout {
                provider: url.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }
        } else {
            ProviderError::RequestError {
                url: url.to_string(),
                source,
            }
        }
    })?;

    let status = response.status();
    tracing::debug!("API response status: {}", status);
    if !status.is_success() {
        return Err(ProviderError::StatusError {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|source| ProviderError::RequestError {
            url: url.to_string(),
            source,
        })?;

    serde_json::from_str(&body).map_err(|e| ProviderError::malformed(url, e.to_string()))
}

/// 上游給的圖片網址必須是絕對的 http(s) URL；不檢查是否可連線
pub fn ensure_absolute_url(url: &str, raw: &str) -> Result<String, ProviderError> {
    match url::Url::parse(raw) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(raw.to_string()),
        Ok(parsed) => Err(ProviderError::malformed(
            url,
            format!("unsupported image URL scheme '{}'", parsed.scheme()),
        )),
        Err(e) => Err(ProviderError::malformed(
            url,
            format!("invalid image URL '{}': {}", raw, e),
        )),
    }
}

pub fn trim_base(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
