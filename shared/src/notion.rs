//! Notion database query client.
//!
//! Pages are reduced to [`Record`]s here; nothing downstream looks at Notion
//! property shapes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::calendar::{day_key, CalendarRange};
use crate::models::{Record, RecordPage};
use crate::source::RecordSource;
use crate::{Config, Error, Result};

/// Database query request body.
#[derive(Debug, Serialize)]
struct QueryBody<'a> {
    filter: Filter<'a>,
    sorts: [Sort<'a>; 1],
    page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_cursor: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Filter<'a> {
    Property(PropertyFilter<'a>),
    And { and: Vec<PropertyFilter<'a>> },
}

#[derive(Debug, Serialize)]
struct PropertyFilter<'a> {
    property: &'a str,
    date: DateCondition,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum DateCondition {
    IsNotEmpty(bool),
    OnOrAfter(String),
    OnOrBefore(String),
}

#[derive(Debug, Serialize)]
struct Sort<'a> {
    property: &'a str,
    direction: &'static str,
}

/// Database query response
#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Vec<NotionPage>,
    #[serde(default)]
    has_more: bool,
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NotionPage {
    id: String,
    #[serde(default)]
    properties: HashMap<String, PropertyValue>,
}

/// A database property; only `date` properties carry a record's day.
#[derive(Debug, Deserialize)]
struct PropertyValue {
    #[serde(default)]
    date: Option<DateValue>,
}

#[derive(Debug, Deserialize)]
struct DateValue {
    start: Option<String>,
}

/// Error body returned by the Notion API
#[derive(Debug, Deserialize)]
struct NotionError {
    code: String,
    message: String,
}

impl NotionPage {
    fn into_record(mut self, date_property: &str) -> Record {
        let date = self
            .properties
            .remove(date_property)
            .and_then(|property| property.date)
            .and_then(|date| date.start);
        Record { id: self.id, date }
    }
}

/// Queries one Notion database for pages carrying a date property.
pub struct NotionClient {
    http: reqwest::Client,
    token: String,
    database_id: String,
    date_property: String,
    notion_version: String,
    base_url: String,
    page_size: u32,
    server_side_filter: bool,
}

impl NotionClient {
    pub fn new(http: reqwest::Client, config: &Config, token: String) -> Self {
        Self {
            http,
            token,
            database_id: config.database_id.clone(),
            date_property: config.date_property.clone(),
            notion_version: config.notion_version.clone(),
            base_url: config.notion_api_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
            server_side_filter: config.server_side_filter,
        }
    }

    fn query_url(&self) -> String {
        format!("{}/v1/databases/{}/query", self.base_url, self.database_id)
    }

    fn query_body<'a>(
        &'a self,
        window: Option<&CalendarRange>,
        cursor: Option<&'a str>,
    ) -> QueryBody<'a> {
        let not_empty = PropertyFilter {
            property: &self.date_property,
            date: DateCondition::IsNotEmpty(true),
        };

        let filter = match window.filter(|_| self.server_side_filter) {
            Some(range) => Filter::And {
                and: vec![
                    not_empty,
                    PropertyFilter {
                        property: &self.date_property,
                        date: DateCondition::OnOrAfter(day_key(range.start())),
                    },
                    PropertyFilter {
                        property: &self.date_property,
                        date: DateCondition::OnOrBefore(day_key(range.end())),
                    },
                ],
            },
            None => Filter::Property(not_empty),
        };

        QueryBody {
            filter,
            sorts: [Sort {
                property: &self.date_property,
                direction: "ascending",
            }],
            page_size: self.page_size,
            start_cursor: cursor,
        }
    }

    fn parse_page(&self, response: QueryResponse) -> RecordPage {
        RecordPage {
            records: response
                .results
                .into_iter()
                .map(|page| page.into_record(&self.date_property))
                .collect(),
            has_more: response.has_more,
            next_cursor: response.next_cursor,
        }
    }
}

#[async_trait]
impl RecordSource for NotionClient {
    async fn query_page(
        &self,
        window: Option<&CalendarRange>,
        cursor: Option<&str>,
    ) -> Result<RecordPage> {
        debug!("Querying Notion database {} (cursor: {:?})", self.database_id, cursor);

        let response = self
            .http
            .post(self.query_url())
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.notion_version)
            .json(&self.query_body(window, cursor))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<NotionError>(&body) {
                Ok(err) => format!("{} ({}): {}", status, err.code, err.message),
                Err(_) => format!("{}: {}", status, body),
            };
            return Err(Error::Source(format!("Notion query failed: {}", message)));
        }

        let page: QueryResponse = response.json().await?;
        Ok(self.parse_page(page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn client(server_side_filter: bool) -> NotionClient {
        let mut config = Config::from_vars(|key| match key {
            "NOTION_TOKEN" => Some("secret_test".to_string()),
            "DATABASE_ID" => Some("0f3c9a".to_string()),
            "DATE_PROPERTY_NAME" => Some("Published".to_string()),
            "NOTION_API_URL" => Some("https://notion.test/".to_string()),
            _ => None,
        })
        .unwrap();
        config.server_side_filter = server_side_filter;
        NotionClient::new(reqwest::Client::new(), &config, "secret_test".to_string())
    }

    #[test]
    fn test_query_url() {
        assert_eq!(
            client(true).query_url(),
            "https://notion.test/v1/databases/0f3c9a/query"
        );
    }

    #[test]
    fn test_first_page_body() {
        let client = client(true);
        let body = serde_json::to_value(client.query_body(None, None)).unwrap();

        assert_eq!(
            body,
            json!({
                "filter": {"property": "Published", "date": {"is_not_empty": true}},
                "sorts": [{"property": "Published", "direction": "ascending"}],
                "page_size": 100
            })
        );
    }

    #[test]
    fn test_windowed_body_with_cursor() {
        let client = client(true);
        let range = CalendarRange::year_to_date(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
        let body = serde_json::to_value(client.query_body(Some(&range), Some("abc"))).unwrap();

        assert_eq!(body["start_cursor"], "abc");
        assert_eq!(
            body["filter"]["and"],
            json!([
                {"property": "Published", "date": {"is_not_empty": true}},
                {"property": "Published", "date": {"on_or_after": "2024-01-01"}},
                {"property": "Published", "date": {"on_or_before": "2024-06-30"}}
            ])
        );
    }

    #[test]
    fn test_window_ignored_without_server_filter() {
        let client = client(false);
        let range = CalendarRange::full_year(2024).unwrap();
        let body = serde_json::to_value(client.query_body(Some(&range), None)).unwrap();

        assert!(body["filter"].get("and").is_none());
        assert_eq!(body["filter"]["date"]["is_not_empty"], true);
    }

    #[test]
    fn test_parse_response_resolves_dates() {
        let raw = json!({
            "object": "list",
            "results": [
                {
                    "id": "p1",
                    "properties": {
                        "Name": {"id": "title", "type": "title", "title": []},
                        "Published": {"id": "x", "type": "date", "date": {"start": "2024-01-03", "end": null}}
                    }
                },
                {
                    "id": "p2",
                    "properties": {
                        "Published": {"id": "x", "type": "date", "date": null}
                    }
                },
                {
                    "id": "p3",
                    "properties": {
                        "Published": {"id": "x", "type": "date", "date": {"start": "2024-02-01T10:00:00.000+08:00", "end": null}}
                    }
                },
                {
                    "id": "p5",
                    "properties": {
                        "Published": {"id": "x", "type": "formula", "formula": {"type": "date", "date": {"start": "2024-02-02"}}}
                    }
                },
                {
                    "id": "p4",
                    "properties": {"Other": {"type": "date", "date": {"start": "2024-03-03"}}}
                }
            ],
            "has_more": true,
            "next_cursor": "next-1"
        });
        let response: QueryResponse = serde_json::from_value(raw).unwrap();
        let page = client(true).parse_page(response);

        assert!(page.has_more);
        assert_eq!(page.next_cursor.as_deref(), Some("next-1"));
        assert_eq!(
            page.records,
            vec![
                Record::new("p1", Some("2024-01-03")),
                Record::new("p2", None),
                Record::new("p3", Some("2024-02-01T10:00:00.000+08:00")),
                Record::new("p5", None),
                Record::new("p4", None),
            ]
        );
    }

    #[test]
    fn test_parse_error_body() {
        let raw = r#"{"object":"error","status":401,"code":"unauthorized","message":"API token is invalid."}"#;
        let err: NotionError = serde_json::from_str(raw).unwrap();
        assert_eq!(err.code, "unauthorized");
        assert_eq!(err.message, "API token is invalid.");
    }
}
