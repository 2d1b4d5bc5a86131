//! AWS Secrets Manager integration.

use aws_sdk_secretsmanager::Client as SecretsClient;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;
use tokio::sync::RwLock;

use crate::{Config, Error, Result};

/// Cached secrets with lazy initialization.
static SECRETS_CACHE: OnceLock<RwLock<HashMap<String, String>>> = OnceLock::new();

fn get_cache() -> &'static RwLock<HashMap<String, String>> {
    SECRETS_CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Notion credentials stored as JSON in Secrets Manager.
#[derive(Debug, Deserialize)]
pub struct NotionCredentials {
    #[serde(alias = "notion_token", alias = "NOTION_TOKEN")]
    pub token: String,
}

/// Get a secret value from Secrets Manager with caching.
pub async fn get_secret(client: &SecretsClient, secret_arn: &str) -> Result<String> {
    // Check cache first
    {
        let cache = get_cache().read().await;
        if let Some(value) = cache.get(secret_arn) {
            return Ok(value.clone());
        }
    }

    let response = client
        .get_secret_value()
        .secret_id(secret_arn)
        .send()
        .await
        .map_err(|e| Error::Aws(format!("Failed to get secret: {}", e)))?;

    let secret_string = response
        .secret_string()
        .ok_or_else(|| Error::Aws("Secret has no string value".to_string()))?
        .to_string();

    {
        let mut cache = get_cache().write().await;
        cache.insert(secret_arn.to_string(), secret_string.clone());
    }

    Ok(secret_string)
}

/// Extract the Notion token from a secret that is either plain text or JSON.
pub fn parse_notion_token(secret: &str) -> Result<String> {
    let trimmed = secret.trim();
    if trimmed.starts_with('{') {
        let creds: NotionCredentials = serde_json::from_str(trimmed)?;
        return Ok(creds.token);
    }
    if trimmed.is_empty() {
        return Err(Error::Aws("Notion token secret is empty".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Resolve the Notion token, preferring the value given in configuration.
pub async fn resolve_notion_token(config: &Config, client: Option<&SecretsClient>) -> Result<String> {
    if let Some(token) = &config.notion_token {
        return Ok(token.clone());
    }

    let arn = config
        .notion_token_secret_arn
        .as_deref()
        .ok_or_else(|| Error::Config("no Notion token configured".to_string()))?;
    let client = client
        .ok_or_else(|| Error::Config("Secrets Manager client required for NOTION_TOKEN_SECRET_ARN".to_string()))?;

    parse_notion_token(&get_secret(client, arn).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_token() {
        assert_eq!(parse_notion_token("  secret_abc\n").unwrap(), "secret_abc");
    }

    #[test]
    fn test_parse_json_token() {
        let json = r#"{"token":"secret_abc"}"#;
        assert_eq!(parse_notion_token(json).unwrap(), "secret_abc");

        let json = r#"{"NOTION_TOKEN":"secret_xyz","note":"rotated"}"#;
        assert_eq!(parse_notion_token(json).unwrap(), "secret_xyz");
    }

    #[test]
    fn test_parse_bad_secret() {
        assert!(matches!(parse_notion_token("  "), Err(Error::Aws(_))));
        assert!(matches!(
            parse_notion_token(r#"{"password":"x"}"#),
            Err(Error::Serialization(_))
        ));
        assert!(matches!(
            parse_notion_token(r#"{"token":"#),
            Err(Error::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_configured_token_skips_secrets_manager() {
        let config = Config::from_vars(|key| match key {
            "NOTION_TOKEN" => Some("secret_direct".to_string()),
            "DATABASE_ID" => Some("db".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(resolve_notion_token(&config, None).await.unwrap(), "secret_direct");
    }
}
