mod config;
mod job_controller;
mod services;

use crate::config::AppConfig;
use crate::job_controller::state::JobsState;
use crate::services::imports::persist;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;
use rusqlite::Connection;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = AppConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // Create the import tables before accepting uploads.
    let conn = Connection::open(&config.database_path).map_err(io::Error::other)?;
    persist::init_schema(&conn).map_err(io::Error::other)?;
    drop(conn);

    // Initialize job controller state
    let (tx, rx) = mpsc::channel(100);
    let jobs_state = JobsState {
        jobs: Arc::new(RwLock::new(HashMap::new())),
        tx,
    };

    // Start job updater task
    let updater_state = jobs_state.clone();
    tokio::spawn(async move {
        job_controller::state::start_job_updater(updater_state, rx).await;
    });

    let bind = (config.host.clone(), config.port);
    info!(
        "Server running at http://{}:{} (database {})",
        bind.0,
        bind.1,
        config.database_path.display()
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(jobs_state.clone()))
            .app_data(web::Data::new(config.clone()))
            .service(services::imports::configure_routes())
    })
    .bind(bind)?
    .run()
    .await
}
