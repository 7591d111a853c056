//! HTTP routes of the dashboards module

use std::collections::HashMap;

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::trace;

use super::variables::{get_variables, Variable};

/// Route under which the dashboards routes are mounted
pub const ROUTE: &str = "/dashboards";

/// Input of a variable resolution; absent or null fields are empty
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VariablesRequest {
    pub variables: Option<Vec<Variable>>,
    pub cluster: Option<String>,
    pub namespace: Option<String>,
    pub placeholders: Option<HashMap<String, String>>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope(ROUTE).route("/variables", web::post().to(resolve_variables)));
}

/// POST /dashboards/variables - the ordered variable list to evaluate for a render
async fn resolve_variables(request: web::Json<VariablesRequest>) -> HttpResponse {
    let request = request.into_inner();
    let declared = request.variables.unwrap_or_default();
    let placeholders = request.placeholders.unwrap_or_default();
    let cluster = request.cluster.unwrap_or_default();
    let namespace = request.namespace.unwrap_or_default();

    trace!(
        cluster = %cluster,
        namespace = %namespace,
        declared = declared.len(),
        placeholders = placeholders.len(),
        "resolveVariables"
    );

    HttpResponse::Ok().json(get_variables(
        &declared,
        &cluster,
        &namespace,
        &placeholders,
    ))
}
