//! HTTP client with forum API authentication and error surfacing.

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use log::debug;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::error::HttpError;

/// HTTP client for the forum REST API.
///
/// Holds the API credential and sends it as an `Authorization` header on
/// every request: HTTP Basic with the key as the username and an empty
/// password. Responses are decoded as JSON; non-success statuses surface
/// as [`HttpError`]. No retries happen at this layer.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    auth_header: String,
}

impl HttpClient {
    /// Creates a client authenticating with the given API key.
    pub fn new(client: Client, api_key: &str) -> Self {
        let credentials = URL_SAFE_NO_PAD.encode(format!("{}:", api_key));
        Self {
            client,
            auth_header: format!("Basic {}", credentials),
        }
    }

    /// Performs a GET request and deserializes the JSON response.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET JSON from {}...", url);

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, &self.auth_header)
            .send()
            .await
            .context("Failed to send request")?;

        let response = Self::error_for_status("GET", response).await?;

        response
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }

    /// Performs a GET request with query parameters and deserializes the
    /// JSON response.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        debug!("GET JSON from {} with query {:?}...", url, query);

        let response = self
            .client
            .get(url)
            .query(query)
            .header(AUTHORIZATION, &self.auth_header)
            .send()
            .await
            .context("Failed to send request")?;

        let response = Self::error_for_status("GET", response).await?;

        response
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }

    /// Performs a form-encoded POST request and deserializes the JSON
    /// response.
    #[tracing::instrument(skip(self, form))]
    pub async fn post_form_json<T: DeserializeOwned>(
        &self,
        url: &str,
        form: &[(&str, String)],
    ) -> Result<T> {
        debug!("POST form to {}...", url);

        let response = self
            .client
            .post(url)
            .form(form)
            .header(AUTHORIZATION, &self.auth_header)
            .send()
            .await
            .context("Failed to send request")?;

        let response = Self::error_for_status("POST", response).await?;

        response
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }

    /// Turns a non-success response into an [`HttpError`], reading the
    /// body only when the response announced a nonzero content-length.
    async fn error_for_status(method: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = match response.content_length() {
            Some(length) if length > 0 => response.text().await.ok(),
            _ => None,
        };

        Err(HttpError {
            method: method.to_string(),
            url,
            status,
            body,
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // base64url of "testkey:".
    const TEST_AUTH_HEADER: &str = "Basic dGVzdGtleTo";

    #[tokio::test]
    async fn test_get_json_sends_basic_auth_header() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/test")
            .match_header("authorization", TEST_AUTH_HEADER)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "test", "value": 42}"#)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new(), "testkey");

        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct TestResponse {
            name: String,
            value: i32,
        }

        let result: TestResponse = client.get_json(&format!("{}/test", url)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.name, "test");
        assert_eq!(result.value, 42);
    }

    #[tokio::test]
    async fn test_get_json_with_query_sends_parameters() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/test?page=1&perPage=10")
            .match_header("authorization", TEST_AUTH_HEADER)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"["item1", "item2"]"#)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new(), "testkey");
        let result: Vec<String> = client
            .get_json_with_query(&format!("{}/test", url), &[("page", "1"), ("perPage", "10")])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result, vec!["item1", "item2"]);
    }

    #[tokio::test]
    async fn test_post_form_json_sends_form_body() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("POST", "/test")
            .match_header("authorization", TEST_AUTH_HEADER)
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body("topic=55&post=hello")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 1}"#)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new(), "testkey");
        let result: serde_json::Value = client
            .post_form_json(
                &format!("{}/test", url),
                &[("topic", "55".to_string()), ("post", "hello".to_string())],
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result["id"], 1);
    }

    #[tokio::test]
    async fn test_error_carries_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/test")
            .with_status(400)
            .with_body(r#"{"errorCode":"1T306/1"}"#)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new(), "testkey");
        let result: Result<serde_json::Value> = client.get_json(&format!("{}/test", url)).await;

        mock.assert_async().await;
        let error = result.unwrap_err();
        let http_error = error.downcast_ref::<HttpError>().expect("HttpError expected");
        assert_eq!(http_error.method, "GET");
        assert_eq!(http_error.status.as_u16(), 400);
        assert_eq!(http_error.body.as_deref(), Some(r#"{"errorCode":"1T306/1"}"#));
        assert!(http_error.url.ends_with("/test"));
    }

    #[tokio::test]
    async fn test_error_omits_empty_body() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/test")
            .with_status(500)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new(), "testkey");
        let result: Result<serde_json::Value> = client.get_json(&format!("{}/test", url)).await;

        mock.assert_async().await;
        let error = result.unwrap_err();
        let http_error = error.downcast_ref::<HttpError>().expect("HttpError expected");
        assert_eq!(http_error.status.as_u16(), 500);
        assert_eq!(http_error.body, None);
    }

    #[test]
    fn test_auth_header_is_base64url_of_key_and_colon() {
        let client = HttpClient::new(Client::new(), "testkey");
        assert_eq!(client.auth_header, TEST_AUTH_HEADER);

        // Keys whose encoding differs between the standard and URL-safe
        // alphabets must use the URL-safe one.
        let client = HttpClient::new(Client::new(), "k~~~ey");
        assert_eq!(
            client.auth_header,
            format!("Basic {}", URL_SAFE_NO_PAD.encode("k~~~ey:"))
        );
        assert!(!client.auth_header.contains('+'));
        assert!(!client.auth_header.contains('/'));
        assert!(!client.auth_header.contains('='));
    }
}
