// src/web/types.rs

use rocket::http::ContentType;
use rocket::response::{self, Responder};
use rocket::serde::{Deserialize, Serialize};
use rocket::{Request, Response};
use std::sync::Arc;

use crate::collector::SearchForm;
use crate::core::config_manager::PresenterConfig;
use crate::core::JobSearchBackend;
use crate::presenter::{RenderedJob, ViewSelection};
use crate::types::{JobRecord, ResultSet, ScrapeParams};

/// Shared by every request handler.
pub struct AppState {
    pub backend: Arc<dyn JobSearchBackend>,
    pub presenter: PresenterConfig,
}

pub struct CsvResponse {
    pub data: String,
    pub filename: String,
}

impl<'r> Responder<'r, 'static> for CsvResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .header(ContentType::CSV)
            .raw_header(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", self.filename),
            )
            .sized_body(self.data.len(), std::io::Cursor::new(self.data))
            .ok()
    }
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct SearchPayload {
    #[serde(default)]
    pub form: SearchForm,
    #[serde(default)]
    pub view: ViewSelection,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ExportPayload {
    pub results: Vec<JobRecord>,
    #[serde(default)]
    pub view: ViewSelection,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SearchData {
    pub search_id: String,
    /// Parameters exactly as sent to the search service.
    pub parameters: ScrapeParams,
    pub found: usize,
    pub displayed: usize,
    pub sites_present: Vec<String>,
    pub job_types_present: Vec<String>,
    pub warnings: Vec<String>,
    pub jobs: Vec<RenderedJob>,
    /// Raw rows, posted back to the export route.
    pub results: ResultSet,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct Choice {
    pub id: String,
    pub label: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct Slider<T> {
    pub min: T,
    pub max: T,
    pub default: T,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct OptionsData {
    pub sites: Vec<Choice>,
    pub job_types: Vec<Choice>,
    pub countries: Vec<Choice>,
    pub sort_orders: Vec<Choice>,
    pub results_wanted: Slider<i64>,
    pub hours_old: Slider<i64>,
    pub verbosity: Slider<i64>,
    pub timeout_secs: Slider<u64>,
    pub extended_controls: bool,
    pub defaults: SearchForm,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Error,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardRequest<T> {
    #[serde(flatten)]
    pub data: T,
    pub conversation_id: Option<String>,
}

pub trait WithConversationId {
    fn conversation_id(&self) -> Option<String>;
}

impl<T> WithConversationId for StandardRequest<T> {
    fn conversation_id(&self) -> Option<String> {
        self.conversation_id.clone()
    }
}

impl TextResponse {
    pub fn success(message: String, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
            conversation_id,
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
            conversation_id,
        }
    }
}

impl StandardErrorResponse {
    pub fn new(
        error: String,
        error_code: String,
        suggestions: Vec<String>,
        conversation_id: Option<String>,
    ) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
            conversation_id,
        }
    }
}
