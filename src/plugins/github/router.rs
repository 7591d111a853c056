//! HTTP routes of the GitHub plugin

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, trace};

use super::instance::GithubInstance;
use crate::error::Result;
use crate::plugins::{backend_error, parse_optional_u32, Instance, InstanceRegistry};

/// Route under which the plugin is mounted
pub const ROUTE: &str = "/github";

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PER_PAGE: u32 = 30;
const MAX_PER_PAGE: u32 = 100;

type Registry = InstanceRegistry<dyn GithubInstance>;

/// Pagination and search parameters
#[derive(Debug, Deserialize)]
pub struct GithubParams {
    pub query: Option<String>,
    pub page: Option<String>,
    #[serde(rename = "perPage")]
    pub per_page: Option<String>,
}

impl GithubParams {
    fn pagination(&self) -> Result<(u32, u32)> {
        let page = parse_optional_u32(self.page.as_deref(), DEFAULT_PAGE, "could not parse page")?;
        let per_page = parse_optional_u32(
            self.per_page.as_deref(),
            DEFAULT_PER_PAGE,
            "could not parse perPage",
        )?;

        Ok((page.max(1), per_page.clamp(1, MAX_PER_PAGE)))
    }
}

/// Mount the GitHub routes bound to the given registry
pub fn configure(cfg: &mut web::ServiceConfig, registry: Arc<Registry>) {
    cfg.service(
        web::scope(ROUTE)
            .app_data(web::Data::from(registry))
            .route("/{name}", web::get().to(get_instance))
            .route("/{name}/repositories", web::get().to(get_repositories))
            .route("/{name}/issues", web::get().to(search_issues)),
    );
}

/// GET /github/{name}
async fn get_instance(registry: web::Data<Registry>, name: web::Path<String>) -> Result<HttpResponse> {
    let instance = registry.get(&name)?;

    Ok(HttpResponse::Ok().json(json!({
        "name": instance.name(),
        "organization": instance.organization(),
    })))
}

/// GET /github/{name}/repositories
async fn get_repositories(
    registry: web::Data<Registry>,
    name: web::Path<String>,
    params: web::Query<GithubParams>,
) -> Result<HttpResponse> {
    let name = name.into_inner();
    trace!(name = %name, page = ?params.page, per_page = ?params.per_page, "getRepositories");

    let instance = registry.get(&name).map_err(|e| {
        debug!(name = %name, "Unknown GitHub instance");
        e
    })?;
    let (page, per_page) = params.pagination()?;

    let repositories = instance
        .get_repositories(page, per_page)
        .await
        .map_err(|e| {
            error!(name = %name, page, per_page, error = %e, "Could not get repositories");
            backend_error(&name, "get repositories", e)
        })?;

    Ok(HttpResponse::Ok().json(repositories))
}

/// GET /github/{name}/issues
async fn search_issues(
    registry: web::Data<Registry>,
    name: web::Path<String>,
    params: web::Query<GithubParams>,
) -> Result<HttpResponse> {
    let name = name.into_inner();
    let query = params.query.as_deref().unwrap_or_default();
    trace!(name = %name, query, page = ?params.page, per_page = ?params.per_page, "searchIssues");

    let instance = registry.get(&name).map_err(|e| {
        debug!(name = %name, "Unknown GitHub instance");
        e
    })?;
    let (page, per_page) = params.pagination()?;

    let issues = instance
        .search_issues(query, page, per_page)
        .await
        .map_err(|e| {
            error!(name = %name, query, page, per_page, error = %e, "Could not search issues");
            backend_error(&name, "search issues", e)
        })?;

    Ok(HttpResponse::Ok().json(issues))
}
