use anyhow::{Result, anyhow};
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Thin PostgREST client. Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            anon_key: config.supabase_anon_key.clone(),
        }
    }

    fn get_headers(&self, auth_token: Option<&str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.anon_key)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        // Public reads go out with the anon key as bearer, the way PostgREST expects.
        let bearer = auth_token.unwrap_or(&self.anon_key);
        if !bearer.is_empty() {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", bearer))?,
            );
        }

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str,
                            auth_token: Option<&str>, body: Option<Value>)
                            -> Result<T>
    where T: DeserializeOwned {
        self.request_with_headers(method, path, auth_token, body, None).await
    }

    pub async fn request_with_headers<T>(&self, method: Method, path: &str,
                                         auth_token: Option<&str>, body: Option<Value>,
                                         extra_headers: Option<HeaderMap>)
                                         -> Result<T>
    where T: DeserializeOwned {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut headers = self.get_headers(auth_token)?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url)
            .headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                _ => anyhow!("API error ({}): {}", status, error_text),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// `GET /rest/v1/{table}?select=...&col=eq.value...`
    pub async fn select_eq<T>(&self, table: &str, columns: &str,
                              filters: &[(&str, &str)], auth_token: Option<&str>)
                              -> Result<Vec<T>>
    where T: DeserializeOwned {
        let path = build_select_path(table, columns, filters);
        self.request(Method::GET, &path, auth_token, None).await
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

pub fn build_select_path(table: &str, columns: &str, filters: &[(&str, &str)]) -> String {
    let mut path = format!("/rest/v1/{}?select={}", table, columns);
    for (column, value) in filters {
        path.push_str(&format!("&{}=eq.{}", column, urlencoding::encode(value)));
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_path_includes_every_filter() {
        let path = build_select_path(
            "caregivers",
            "*",
            &[("is_active", "true"), ("is_verified", "true")],
        );
        assert_eq!(
            path,
            "/rest/v1/caregivers?select=*&is_active=eq.true&is_verified=eq.true"
        );
    }

    #[test]
    fn filter_values_are_percent_encoded() {
        let path = build_select_path("patients", "*", &[("user_id", "a&role=eq.admin b")]);
        assert_eq!(
            path,
            "/rest/v1/patients?select=*&user_id=eq.a%26role%3Deq.admin%20b"
        );
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = AppConfig {
            supabase_url: "http://localhost:54321/".to_string(),
            ..AppConfig::default()
        };
        let client = SupabaseClient::new(&config);
        assert_eq!(client.get_base_url(), "http://localhost:54321");
    }
}
