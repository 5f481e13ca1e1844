//! Quote-of-the-day fallback body.
//!
//! Messages sent without `--message` get a random quote as their body.

use serde::Deserialize;

use crate::error::Result;

/// Base URL of the quote service.
pub const QUOTE_BASE_URL: &str = "https://api.quotable.io";

#[derive(Debug, Deserialize)]
struct Quote {
    content: String,
    author: String,
}

/// Fetches a random quote, rendered as `content - author`.
pub async fn fetch_quote(client: &reqwest::Client, base_url: &str) -> Result<String> {
    let quote: Quote = client
        .get(format!("{base_url}/random"))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(format!("{} - {}", quote.content, quote.author))
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn test_fetch_quote_formats_content_and_author() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/random"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": "Stay hungry, stay foolish.",
                "author": "Stewart Brand"
            })))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let quote = fetch_quote(&client, &server.uri()).await.unwrap();
        assert_eq!(quote, "Stay hungry, stay foolish. - Stewart Brand");
    }

    #[tokio::test]
    async fn test_fetch_quote_surfaces_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/random"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let err = fetch_quote(&client, &server.uri()).await.unwrap_err();
        assert!(matches!(err, crate::error::StoreError::QuoteFetch(_)));
    }
}
