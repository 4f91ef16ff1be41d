// src/web/handlers/system_handlers.rs
use crate::collector::{
    SearchForm, DEFAULT_TIMEOUT_SECS, HOURS_OLD_RANGE, RESULTS_WANTED_RANGE, TIMEOUT_SECS_RANGE,
    VERBOSITY_RANGE,
};
use crate::presenter::SortOrder;
use crate::types::{Country, JobType, Site};
use crate::web::types::*;

use rocket::serde::json::Json;
use rocket::State;
use std::ops::RangeInclusive;
use tracing::info;

pub async fn health_handler() -> Json<TextResponse> {
    info!("Health check");
    Json(TextResponse::success("OK".to_string(), None))
}

/// Everything a client needs to draw the search form and result controls.
pub async fn options_handler(state: &State<AppState>) -> Json<DataResponse<OptionsData>> {
    let defaults = SearchForm::default();

    let sites = Site::ALL
        .iter()
        .map(|s| choice(s.id(), s.label()))
        .collect();

    let mut job_types = vec![choice("any", "Any")];
    job_types.extend(JobType::ALL.iter().map(|t| choice(t.label(), t.label())));

    let countries = Country::ALL
        .iter()
        .map(|c| choice(c.name(), c.name()))
        .collect();
    let sort_orders = SortOrder::ALL
        .iter()
        .map(|o| choice(o.id(), o.label()))
        .collect();

    let data = OptionsData {
        sites,
        job_types,
        countries,
        sort_orders,
        results_wanted: slider(RESULTS_WANTED_RANGE, defaults.results_wanted as i64),
        hours_old: slider(HOURS_OLD_RANGE, defaults.hours_old as i64),
        verbosity: slider(VERBOSITY_RANGE, defaults.verbosity as i64),
        timeout_secs: slider(TIMEOUT_SECS_RANGE, DEFAULT_TIMEOUT_SECS),
        extended_controls: state.presenter.extended_controls,
        defaults,
    };

    Json(DataResponse::success(
        "Search options".to_string(),
        data,
        None,
    ))
}

fn choice(id: &str, label: &str) -> Choice {
    Choice {
        id: id.to_string(),
        label: label.to_string(),
    }
}

fn slider<T: Copy>(range: RangeInclusive<T>, default: T) -> Slider<T> {
    Slider {
        min: *range.start(),
        max: *range.end(),
        default,
    }
}
