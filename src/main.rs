use std::{env, str::FromStr};

use actix_web::{
    middleware,
    web::{self, Data},
    App, HttpResponse, HttpServer,
};
use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode},
    SqlitePool,
};

mod db;
mod errors;
mod routes;
mod structs;
mod utils;

#[derive(Debug, Clone)]
pub struct AppState {
    db_pool: SqlitePool,
}

fn database_url() -> String {
    env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://teamstore.db".to_owned())
}

fn bind_addr() -> String {
    env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_owned())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let opts = SqliteConnectOptions::from_str(&database_url())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .read_only(false)
        .busy_timeout(std::time::Duration::from_secs(5));

    let db_pool = SqlitePool::connect_with(opts)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    db::init_schema(&db_pool)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    info!("Database schema ready");

    let addr = bind_addr();
    info!("Starting HTTP server on http://{}/", addr);

    HttpServer::new(move || {
        App::new()
            // enable automatic response compression - usually register this first
            .wrap(middleware::Compress::default())
            // enable logger - always register Actix Web Logger middleware last
            .wrap(middleware::Logger::default())
            .service(routes::create_team)
            .service(routes::list_teams)
            .service(routes::get_team)
            .service(routes::update_team)
            .service(routes::delete_team)
            .service(routes::list_team_users)
            .service(routes::create_user)
            .service(routes::list_users)
            .service(routes::get_user)
            .service(routes::update_user)
            .service(routes::delete_user)
            .service(routes::create_item)
            .service(routes::list_items)
            .service(routes::get_item)
            .service(routes::update_item)
            .service(routes::delete_item)
            .app_data(Data::new(AppState {
                db_pool: db_pool.clone(),
            }))
            .default_service(web::to(default_handler))
    })
    .bind(addr)?
    .run()
    .await
}

async fn default_handler() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "Not found" }))
}
