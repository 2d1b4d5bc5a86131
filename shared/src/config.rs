//! Configuration management for the heatmap Lambda.

use chrono::FixedOffset;
use std::env;
use std::str::FromStr;

use crate::render::{ColorBand, Decorations, Layout};
use crate::{Error, Result};

/// Which days a default request covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeMode {
    /// January 1st through today
    #[default]
    YearToDate,
    /// The whole current year
    FullYear,
}

impl FromStr for RangeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ytd" | "year-to-date" => Ok(RangeMode::YearToDate),
            "year" | "full-year" => Ok(RangeMode::FullYear),
            other => Err(Error::Config(format!("unknown range mode '{}'", other))),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Notion integration token, if given directly
    pub notion_token: Option<String>,
    /// ARN of the secret holding the Notion token
    pub notion_token_secret_arn: Option<String>,
    /// Notion database to query
    pub database_id: String,
    /// Name of the date property to count
    pub date_property: String,
    /// Notion-Version header value
    pub notion_version: String,
    /// Notion API base URL
    pub notion_api_url: String,
    /// Records requested per page (max 100)
    pub page_size: u32,
    /// Upper bound on pages fetched per request
    pub max_pages: u32,
    /// Push the date window into the Notion filter
    pub server_side_filter: bool,
    pub layout: Layout,
    pub range_mode: RangeMode,
    pub palette: ColorBand,
    pub decorations: Decorations,
    /// Offset used to decide what "today" is
    pub utc_offset: FixedOffset,
    /// AWS region
    pub aws_region: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let notion_token = non_empty("NOTION_TOKEN");
        let notion_token_secret_arn = non_empty("NOTION_TOKEN_SECRET_ARN");
        if notion_token.is_none() && notion_token_secret_arn.is_none() {
            return Err(Error::Config(
                "NOTION_TOKEN or NOTION_TOKEN_SECRET_ARN must be set".to_string(),
            ));
        }

        let database_id = non_empty("DATABASE_ID")
            .ok_or_else(|| Error::Config("DATABASE_ID not set".to_string()))?;

        let page_size = parse_or(non_empty("NOTION_PAGE_SIZE"), "NOTION_PAGE_SIZE", 100u32)?;
        if !(1..=100).contains(&page_size) {
            return Err(Error::Config(format!(
                "NOTION_PAGE_SIZE must be between 1 and 100, got {}",
                page_size
            )));
        }

        let max_pages = parse_or(non_empty("NOTION_MAX_PAGES"), "NOTION_MAX_PAGES", 50u32)?;
        if max_pages == 0 {
            return Err(Error::Config("NOTION_MAX_PAGES must be positive".to_string()));
        }

        let utc_offset = match non_empty("HEATMAP_UTC_OFFSET") {
            Some(raw) => raw
                .parse::<FixedOffset>()
                .map_err(|e| Error::Config(format!("HEATMAP_UTC_OFFSET '{}': {}", raw, e)))?,
            None => FixedOffset::east_opt(0).ok_or_else(|| Error::Internal("UTC offset".into()))?,
        };

        let layout = match non_empty("HEATMAP_LAYOUT") {
            Some(raw) => raw
                .parse::<Layout>()
                .map_err(|e| Error::Config(format!("HEATMAP_LAYOUT: {}", e)))?,
            None => Layout::default(),
        };

        Ok(Self {
            notion_token,
            notion_token_secret_arn,
            database_id,
            date_property: non_empty("DATE_PROPERTY_NAME").unwrap_or_else(|| "Date".to_string()),
            notion_version: non_empty("NOTION_VERSION").unwrap_or_else(|| "2022-06-28".to_string()),
            notion_api_url: non_empty("NOTION_API_URL")
                .unwrap_or_else(|| "https://api.notion.com".to_string()),
            page_size,
            max_pages,
            server_side_filter: parse_flag(non_empty("NOTION_SERVER_FILTER"), "NOTION_SERVER_FILTER")?,
            layout,
            range_mode: parse_or(non_empty("HEATMAP_RANGE"), "HEATMAP_RANGE", RangeMode::default())?,
            palette: parse_or(non_empty("HEATMAP_PALETTE"), "HEATMAP_PALETTE", ColorBand::default())?,
            decorations: Decorations {
                weekday_labels: parse_flag(non_empty("HEATMAP_WEEKDAY_LABELS"), "HEATMAP_WEEKDAY_LABELS")?,
                month_labels: parse_flag(non_empty("HEATMAP_MONTH_LABELS"), "HEATMAP_MONTH_LABELS")?,
                summary: parse_flag(non_empty("HEATMAP_SUMMARY"), "HEATMAP_SUMMARY")?,
            },
            utc_offset,
            aws_region: non_empty("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
        })
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("{} '{}': {}", key, value, e))),
        None => Ok(default),
    }
}

/// Boolean flags default to on.
fn parse_flag(raw: Option<String>, key: &str) -> Result<bool> {
    match raw.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(true),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(v) => Err(Error::Config(format!("{} must be a boolean, got '{}'", key, v))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("NOTION_TOKEN", "secret_abc"), ("DATABASE_ID", "db-1")]).unwrap();

        assert_eq!(config.date_property, "Date");
        assert_eq!(config.page_size, 100);
        assert_eq!(config.max_pages, 50);
        assert!(config.server_side_filter);
        assert_eq!(config.layout, Layout::WeekColumn);
        assert_eq!(config.range_mode, RangeMode::YearToDate);
        assert_eq!(config.palette, ColorBand::github());
        assert_eq!(config.decorations, Decorations::default());
        assert_eq!(config.utc_offset.local_minus_utc(), 0);
        assert_eq!(config.notion_api_url, "https://api.notion.com");
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("NOTION_TOKEN_SECRET_ARN", "arn:aws:secretsmanager:us-east-1:1:secret:notion"),
            ("DATABASE_ID", "db-1"),
            ("DATE_PROPERTY_NAME", "新闻日期"),
            ("HEATMAP_LAYOUT", "month"),
            ("HEATMAP_RANGE", "year"),
            ("HEATMAP_PALETTE", "classic"),
            ("HEATMAP_SUMMARY", "false"),
            ("HEATMAP_UTC_OFFSET", "+08:00"),
            ("NOTION_SERVER_FILTER", "off"),
        ])
        .unwrap();

        assert!(config.notion_token.is_none());
        assert_eq!(config.date_property, "新闻日期");
        assert_eq!(config.layout, Layout::MonthBlock);
        assert_eq!(config.range_mode, RangeMode::FullYear);
        assert_eq!(config.palette, ColorBand::classic());
        assert!(!config.decorations.summary);
        assert!(config.decorations.month_labels);
        assert_eq!(config.utc_offset.local_minus_utc(), 8 * 3600);
        assert!(!config.server_side_filter);
    }

    #[test]
    fn test_missing_credentials() {
        let err = load(&[("DATABASE_ID", "db-1")]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = load(&[("NOTION_TOKEN", "t")]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_ID"));
    }

    #[test]
    fn test_invalid_values() {
        let base = [("NOTION_TOKEN", "t"), ("DATABASE_ID", "db")];
        let with = |extra: (&'static str, &'static str)| {
            let mut pairs = base.to_vec();
            pairs.push(extra);
            load(&pairs)
        };

        assert!(with(("NOTION_PAGE_SIZE", "500")).is_err());
        assert!(with(("NOTION_MAX_PAGES", "0")).is_err());
        assert!(with(("HEATMAP_LAYOUT", "spiral")).is_err());
        assert!(with(("HEATMAP_MONTH_LABELS", "maybe")).is_err());
        assert!(with(("HEATMAP_UTC_OFFSET", "Asia/Shanghai")).is_err());
    }
}
