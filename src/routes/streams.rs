use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::{ContentType, QueryContext, SortDirection, StreamRecord};
use crate::services::needs_redirect_resolution;
use crate::AppState;

/// Query string for stream lookups
#[derive(Debug, Default, Deserialize)]
pub struct StreamsQuery {
    #[serde(default)]
    pub season: Option<i32>,
    #[serde(default)]
    pub episode: Option<i32>,
    #[serde(default)]
    pub anime: Option<bool>,
    /// `size_desc` or `size_asc`, overrides the configured order
    #[serde(default)]
    pub sort: Option<String>,
    /// Overrides the configured duplicate removal
    #[serde(default)]
    pub dedup: Option<bool>,
}

/// Stream record plus playback hints for the client
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamView {
    #[serde(flatten)]
    pub record: StreamRecord,
    pub needs_resolution: bool,
}

#[derive(Serialize)]
pub struct StreamsResponse {
    pub total: usize,
    pub streams: Vec<StreamView>,
}

/// GET /api/streams/:content_type/:external_id - Aggregated streams for one item
pub async fn get_streams(
    State(state): State<Arc<AppState>>,
    Path((content_type, external_id)): Path<(String, String)>,
    Query(query): Query<StreamsQuery>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let content_type = ContentType::parse(&content_type).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": format!("Unknown content type '{}'", content_type)
            })),
        )
    })?;

    let mut policy = state.discovery.policy().clone();
    if let Some(sort) = query.sort.as_deref() {
        policy.sort = SortDirection::parse(sort).ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": format!("Unknown sort order '{}'", sort) })),
            )
        })?;
    }
    if let Some(dedup) = query.dedup {
        policy.remove_duplicates = dedup;
    }

    let ctx = match content_type {
        ContentType::Movie => QueryContext::movie(external_id),
        ContentType::Episode => QueryContext::episode(
            external_id,
            query.season.unwrap_or(0),
            query.episode.unwrap_or(0),
        )
        .with_anime(query.anime.unwrap_or(false)),
    };

    let records = state.discovery.discover_with(&ctx, &policy).await;
    let streams: Vec<StreamView> = records
        .into_iter()
        .map(|record| StreamView {
            needs_resolution: needs_redirect_resolution(&record.url),
            record,
        })
        .collect();

    Ok(Json(StreamsResponse {
        total: streams.len(),
        streams,
    }))
}
