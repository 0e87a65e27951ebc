// Web server entry point, load-on-demand variant. The registry starts empty
// and POST /set-model-sql fills it.
use actix_web::{web, App, HttpServer};
use log::info;
use nl2sql_server::api;
use nl2sql_server::registry::ModelRegistry;
use nl2sql_server::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let state = web::Data::new(AppState {
        registry: ModelRegistry::new(),
    });

    info!("listening on 0.0.0.0:8080");
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api::set_model_sql)
            .route("/run-model-sql", web::post().to(api::run_model_sql))
    })
    .bind(("0.0.0.0", 8080))?
    .run()
    .await
}
