//! HTTP routes of the Elasticsearch plugin

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::{debug, error, trace};

use super::instance::ElasticsearchInstance;
use crate::error::Result;
use crate::plugins::{backend_error, parse_i64, InstanceRegistry};

/// Route under which the plugin is mounted
pub const ROUTE: &str = "/elasticsearch";

type Registry = InstanceRegistry<dyn ElasticsearchInstance>;

/// Query parameters of the logs route
#[derive(Debug, Deserialize)]
pub struct LogsParams {
    pub query: Option<String>,
    #[serde(rename = "scrollID")]
    pub scroll_id: Option<String>,
    #[serde(rename = "timeStart")]
    pub time_start: Option<String>,
    #[serde(rename = "timeEnd")]
    pub time_end: Option<String>,
}

/// Mount the Elasticsearch routes bound to the given registry
pub fn configure(cfg: &mut web::ServiceConfig, registry: Arc<Registry>) {
    cfg.service(
        web::scope(ROUTE)
            .app_data(web::Data::from(registry))
            .route("/logs/{name}", web::get().to(get_logs)),
    );
}

/// GET /elasticsearch/logs/{name} - one page of raw documents plus their distribution
/// over the requested time range.
///
/// The instance is selected by the `name` path parameter; `query`, `scrollID`,
/// `timeStart` and `timeEnd` are passed on to its search.
async fn get_logs(
    registry: web::Data<Registry>,
    name: web::Path<String>,
    params: web::Query<LogsParams>,
) -> Result<HttpResponse> {
    let name = name.into_inner();
    let query = params.query.as_deref().unwrap_or_default();
    let scroll_id = params.scroll_id.as_deref().unwrap_or_default();

    trace!(
        name = %name,
        query,
        scroll_id,
        time_start = ?params.time_start,
        time_end = ?params.time_end,
        "getLogs"
    );

    let instance = registry.get(&name).map_err(|e| {
        debug!(name = %name, "Unknown Elasticsearch instance");
        e
    })?;

    let time_start = parse_i64(params.time_start.as_deref(), "could not parse start time")?;
    let time_end = parse_i64(params.time_end.as_deref(), "could not parse end time")?;

    let data = instance
        .get_logs(query, scroll_id, time_start, time_end)
        .await
        .map_err(|e| {
            error!(
                name = %name,
                query,
                scroll_id,
                time_start,
                time_end,
                error = %e,
                "Could not get logs"
            );
            backend_error(&name, "get logs", e)
        })?;

    Ok(HttpResponse::Ok().json(data))
}
