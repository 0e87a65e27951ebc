// API routes and handlers
use actix_web::{post, web, HttpResponse};
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoadRequest {
    #[serde(rename = "modelName")]
    pub model_name: String,
}

#[derive(Serialize)]
struct LoadResponse {
    status: &'static str,
}

#[derive(Deserialize)]
pub struct InferenceRequest {
    pub input: String,
}

#[derive(Serialize, Deserialize)]
pub struct InferenceResponse {
    pub input: String,
    pub output: String,
}

#[post("/set-model-sql")]
pub async fn set_model_sql(
    state: web::Data<AppState>,
    payload: web::Json<LoadRequest>,
) -> Result<HttpResponse, ApiError> {
    state.registry.load_from_hub(&payload.model_name)?;
    Ok(HttpResponse::Ok().json(LoadResponse { status: "done" }))
}

/// Inference handler. Registered with a fixed path by the load-on-demand
/// server and with a configured path by the properties-file server.
pub async fn run_model_sql(
    state: web::Data<AppState>,
    payload: web::Json<InferenceRequest>,
) -> Result<HttpResponse, ApiError> {
    let question = payload.into_inner().input;
    info!("translating question: {question}");
    let output = state.registry.generate(&question)?;
    Ok(HttpResponse::Ok().json(InferenceResponse {
        input: question,
        output,
    }))
}
