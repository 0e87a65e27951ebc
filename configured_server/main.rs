// Web server entry point, fixed-model variant. Bind address, route path and
// model name come from a properties file; the model loads before the
// listener binds and stays fixed for the process lifetime.
use std::path::Path;

use actix_web::{web, App, HttpServer};
use log::info;
use nl2sql_server::api;
use nl2sql_server::config::{
    Config, MODEL_NAME_KEY, RUN_MODEL_ENDPOINT_SQL_KEY, SERVER_URL_KEY,
};
use nl2sql_server::registry::ModelRegistry;
use nl2sql_server::state::AppState;

const DEFAULT_CONFIG_PATH: &str = "nl2sql.properties";

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let args: Vec<String> = std::env::args().collect();
    let config_path = args.get(1).map(String::as_str).unwrap_or(DEFAULT_CONFIG_PATH);
    let config = Config::from_file(Path::new(config_path))?;

    let model_name = config.require(MODEL_NAME_KEY)?.to_string();
    let server_url = config.require(SERVER_URL_KEY)?.to_string();
    let route = format!(
        "/{}",
        config
            .require(RUN_MODEL_ENDPOINT_SQL_KEY)?
            .trim_start_matches('/')
    );

    let registry = ModelRegistry::new();
    registry.load_from_hub(&model_name)?;
    let state = web::Data::new(AppState { registry });

    info!("serving POST {route} on {server_url}");
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route(&route, web::post().to(api::run_model_sql))
    })
    .bind(server_url.as_str())?
    .run()
    .await?;
    Ok(())
}
