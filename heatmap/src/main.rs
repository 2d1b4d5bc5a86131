//! Heatmap Lambda - Serves a calendar heatmap of Notion database entries.
//!
//! Endpoints:
//! - GET /api/heatmap - SVG heatmap for the configured range
//!
//! Optional query parameters:
//! - `layout` - `week` or `month`, overrides HEATMAP_LAYOUT
//! - `year` - render that whole year instead of the configured range

use aws_config::BehaviorVersion;
use chrono::{Datelike, NaiveDate, Utc};
use lambda_http::{run, service_fn, Body, Error, Request, RequestExt, Response};
use shared::http::{error_response, svg_response};
use shared::{
    aggregate, fetch_all_records, render, resolve_notion_token, CalendarRange, Config,
    HeatmapStyle, Layout, NotionClient, RangeMode, RecordSource,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Earliest year accepted in the `year` parameter
const MIN_YEAR: i32 = 1970;

/// Application state
struct AppState<S> {
    config: Config,
    source: S,
}

impl AppState<NotionClient> {
    async fn new() -> Result<Self, Error> {
        let config = Config::from_env()?;

        let secrets_client = if config.notion_token.is_none() {
            let aws_config = aws_config::defaults(BehaviorVersion::latest())
                .region(aws_config::Region::new(config.aws_region.clone()))
                .load()
                .await;
            Some(aws_sdk_secretsmanager::Client::new(&aws_config))
        } else {
            None
        };

        let token = resolve_notion_token(&config, secrets_client.as_ref()).await?;
        let source = NotionClient::new(reqwest::Client::new(), &config, token);

        Ok(Self { config, source })
    }
}

/// Parsed query string
#[derive(Debug, Default, PartialEq)]
struct HeatmapQuery {
    layout: Option<Layout>,
    year: Option<i32>,
}

fn parse_query(event: &Request) -> shared::Result<HeatmapQuery> {
    let params = event.query_string_parameters();

    let layout = params
        .first("layout")
        .map(str::parse::<Layout>)
        .transpose()?;

    let year = params
        .first("year")
        .map(|raw| {
            raw.trim()
                .parse::<i32>()
                .map_err(|_| shared::Error::Validation(format!("invalid year '{}'", raw)))
        })
        .transpose()?;

    Ok(HeatmapQuery { layout, year })
}

/// Range to render for a request made on `today`.
fn resolve_range(
    config: &Config,
    query: &HeatmapQuery,
    today: NaiveDate,
) -> shared::Result<CalendarRange> {
    let current = today.year();

    match query.year {
        Some(year) if !(MIN_YEAR..=current).contains(&year) => Err(shared::Error::Validation(
            format!("year must be between {} and {}", MIN_YEAR, current),
        )),
        Some(year) if year < current => CalendarRange::full_year(year),
        _ => match config.range_mode {
            RangeMode::YearToDate => Ok(CalendarRange::year_to_date(today)),
            RangeMode::FullYear => CalendarRange::full_year(current),
        },
    }
}

fn style_for(config: &Config, query: &HeatmapQuery) -> HeatmapStyle {
    HeatmapStyle::new(query.layout.unwrap_or(config.layout))
        .with_decorations(config.decorations)
        .with_palette(config.palette.clone())
}

/// Fetch, count and render. Any error aborts the whole heatmap.
async fn build_heatmap<S: RecordSource>(
    state: &AppState<S>,
    query: &HeatmapQuery,
    today: NaiveDate,
) -> shared::Result<String> {
    let range = resolve_range(&state.config, query, today)?;
    let records = fetch_all_records(&state.source, Some(&range), state.config.max_pages).await?;
    let counts = aggregate(&records, &range);

    info!(
        "Rendering {} to {}: {} records, {} in range",
        range.start(),
        range.end(),
        records.len(),
        counts.total()
    );

    Ok(render(&counts, &range, &style_for(&state.config, query)))
}

async fn handler<S: RecordSource>(
    state: Arc<AppState<S>>,
    event: Request,
) -> Result<Response<Body>, Error> {
    let method = event.method().as_str();
    let path = event.uri().path();

    info!("Heatmap request: {} {}", method, path);

    if method != "GET" {
        return error_response(&shared::Error::MethodNotAllowed(method.to_string()));
    }

    let today = Utc::now().with_timezone(&state.config.utc_offset).date_naive();
    let outcome = match parse_query(&event) {
        Ok(query) => build_heatmap(&state, &query, today).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(document) => svg_response(200, document),
        Err(e) => {
            error!("Failed to generate heatmap: {}", e);
            error_response(&e)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new().await?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
