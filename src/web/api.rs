//! Application routes shared by every plugin: catalog and health

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::dashboards;
use crate::plugins::{Catalog, Plugins};

/// Wire the catalog, health, dashboards and every plugin router into an app
pub fn configure_app(cfg: &mut web::ServiceConfig, plugins: Arc<Plugins>) {
    cfg.service(
        web::scope("/api")
            .app_data(web::Data::from(Arc::clone(plugins.catalog())))
            .route("/plugins", web::get().to(get_plugins))
            .route("/health", web::get().to(get_health)),
    );

    dashboards::configure(cfg);
    plugins.configure(cfg);
}

/// GET /api/plugins - every registered plugin instance
async fn get_plugins(catalog: web::Data<Catalog>) -> HttpResponse {
    HttpResponse::Ok().json(catalog.entries())
}

/// GET /api/health
async fn get_health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}
