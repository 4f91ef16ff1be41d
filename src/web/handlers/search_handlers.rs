// src/web/handlers/search_handlers.rs

use crate::core::SearchInvoker;
use crate::error::{ConfigurationError, ExportError, SearchError};
use crate::presenter::Presenter;
use crate::types::ResultSet;
use crate::web::types::*;

use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info, warn};

pub type ApiError = status::Custom<Json<StandardErrorResponse>>;

pub async fn search_handler(
    request: Json<StandardRequest<SearchPayload>>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<SearchData>>, ApiError> {
    let conversation_id = request.conversation_id();
    let payload = request.into_inner().data;

    let search_request = payload
        .form
        .check_ranges()
        .and_then(|()| payload.form.collect())
        .map_err(|e| configuration_error(e, conversation_id.clone()))?;
    let parameters = search_request.to_scrape_params();

    let invoker = SearchInvoker::new(state.backend.clone());
    let results = invoker
        .invoke(&search_request)
        .await
        .map_err(|e| search_error(e, conversation_id.clone()))?;

    let presenter = Presenter::new(state.presenter.options());
    let view = presenter.view(&results, &payload.view);
    let message = view.summary();
    let displayed = view.records.len();
    let warnings = view.warnings.clone();
    let jobs = view.render();

    info!("Search {} returned: {}", results.search_id, message);

    let data = SearchData {
        search_id: results.search_id.to_string(),
        parameters,
        found: results.len(),
        displayed,
        sites_present: results.sites_present(),
        job_types_present: results.job_types_present(),
        warnings,
        jobs,
        results,
    };

    Ok(Json(DataResponse::success(message, data, conversation_id)))
}

pub async fn export_handler(
    request: Json<StandardRequest<ExportPayload>>,
    state: &State<AppState>,
) -> Result<CsvResponse, ApiError> {
    let conversation_id = request.conversation_id();
    let payload = request.into_inner().data;
    let results = ResultSet::new(payload.results);

    let presenter = Presenter::new(state.presenter.options());
    let view = presenter.view(&results, &payload.view);
    for warning in &view.warnings {
        warn!("Export: {}", warning);
    }

    match view.to_csv() {
        Ok(data) => {
            info!("Exported {} of {} jobs", view.records.len(), view.total);
            Ok(CsvResponse {
                data,
                filename: state.presenter.export_file_name.clone(),
            })
        }
        Err(e) => Err(export_error(e, conversation_id)),
    }
}

fn configuration_error(e: ConfigurationError, conversation_id: Option<String>) -> ApiError {
    warn!("Rejected search parameters: {}", e);
    status::Custom(
        Status::BadRequest,
        Json(StandardErrorResponse::new(
            e.to_string(),
            "CONFIGURATION_ERROR".to_string(),
            vec!["Select at least one job board and valid search options".to_string()],
            conversation_id,
        )),
    )
}

fn search_error(e: SearchError, conversation_id: Option<String>) -> ApiError {
    let mut suggestions = SearchError::suggestions();
    suggestions.push(format!("Details: {}", e.detail));

    status::Custom(
        Status::BadGateway,
        Json(StandardErrorResponse::new(
            e.to_string(),
            "SEARCH_ERROR".to_string(),
            suggestions,
            conversation_id,
        )),
    )
}

fn export_error(e: ExportError, conversation_id: Option<String>) -> ApiError {
    error!("Export failed: {}", e);
    status::Custom(
        Status::InternalServerError,
        Json(StandardErrorResponse::new(
            e.to_string(),
            "EXPORT_ERROR".to_string(),
            vec!["Try exporting fewer jobs".to_string()],
            conversation_id,
        )),
    )
}
