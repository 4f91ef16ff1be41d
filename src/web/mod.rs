// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use crate::core::config_manager::ServerConfig;
use crate::core::{ConfigManager, ServiceClient};
use anyhow::Result;
use rocket::data::{Limits, ToByteUnit};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::figment::Figment;
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use std::sync::Arc;
use tracing::{error, info};

pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new(
            "Access-Control-Expose-Headers",
            "Content-Disposition",
        ));
    }
}

#[get("/health")]
pub async fn health() -> Json<TextResponse> {
    handlers::health_handler().await
}

#[get("/options")]
pub async fn search_options(state: &State<AppState>) -> Json<DataResponse<OptionsData>> {
    handlers::options_handler(state).await
}

#[post("/search", data = "<request>")]
pub async fn search(
    request: Json<StandardRequest<SearchPayload>>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<SearchData>>, ApiError> {
    handlers::search_handler(request, state).await
}

#[post("/search/export", data = "<request>")]
pub async fn export(
    request: Json<StandardRequest<ExportPayload>>,
    state: &State<AppState>,
) -> Result<CsvResponse, ApiError> {
    handlers::export_handler(request, state).await
}

#[options("/<_..>")]
pub async fn preflight() -> Status {
    Status::Ok
}

#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(413)]
pub fn payload_too_large(request: &Request) -> Json<StandardErrorResponse> {
    if request.uri().path().as_str().ends_with("/export") {
        Json(StandardErrorResponse::new(
            "Too many jobs to export in one request".to_string(),
            "EXPORT_ERROR".to_string(),
            vec![
                "Try exporting fewer jobs".to_string(),
                "Raise server.json_limit_mib".to_string(),
            ],
            None,
        ))
    } else {
        Json(StandardErrorResponse::new(
            "Request body is too large".to_string(),
            "PAYLOAD_TOO_LARGE".to_string(),
            vec!["Raise server.json_limit_mib".to_string()],
            None,
        ))
    }
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body does not match the expected shape".to_string(),
        "BAD_REQUEST".to_string(),
        vec!["Check field names and value types".to_string()],
        None,
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Check the server logs".to_string(),
        ],
        None,
    ))
}

/// Mount the API on `rocket`. Separate from launching so tests can drive it
/// with a local client.
pub fn build_rocket(rocket: Rocket<Build>, state: AppState) -> Rocket<Build> {
    rocket
        .attach(Cors)
        .manage(state)
        .register(
            "/api",
            catchers![bad_request, payload_too_large, unprocessable, internal_error],
        )
        .mount(
            "/api",
            routes![health, search_options, search, export, preflight],
        )
}

/// Rocket settings taken from the `server` section.
pub fn server_figment(config: &ServerConfig) -> Figment {
    rocket::Config::figment()
        .merge(("address", config.address.clone()))
        .merge(("port", config.port))
        .merge((
            "limits",
            Limits::default().limit("json", config.json_limit_mib.mebibytes()),
        ))
}

pub async fn start_web_server(config: ConfigManager) -> Result<()> {
    let client = ServiceClient::new(
        config.service.base_url.clone(),
        config.service.api_key.clone(),
        config.service.connect_timeout_seconds,
    )?;

    let state = AppState {
        backend: Arc::new(client),
        presenter: config.presenter.clone(),
    };

    info!("Starting Lucy API server ({})", config.environment);
    info!("Search service: {}", config.service.base_url);
    info!(
        "Listening on http://{}:{}",
        config.server.address, config.server.port
    );

    let figment = server_figment(&config.server);
    if let Err(e) = build_rocket(rocket::custom(figment), state).launch().await {
        error!("Server stopped: {}", e);
        anyhow::bail!("Failed to run API server: {}", e);
    }

    Ok(())
}
