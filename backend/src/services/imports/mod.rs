//! Bulk import of clients and vendors from delimited text files.
//!
//! The parsing and validation itself lives in `common::import`; this module
//! is the HTTP surface around it. The provided routes are:
//!
//! - `GET /api/imports/{kind}/template`: downloads the import template for
//!   `clients` or `vendors`, with a documented header and one example row.
//!
//! - `POST /api/imports/{kind}/validate`: multipart upload with a `file` part.
//!   Runs the import as a dry run and returns the full `ImportResult`, records
//!   included. Nothing is stored.
//!
//! - `POST /api/imports/{kind}/upload`: same upload contract, but the import
//!   runs as a background job and its records are stored when the whole file
//!   is valid. Returns the `job_id` right away.
//!
//! - `GET /api/imports/status/{job_id}`: polls a job started by `/upload`.

use actix_web::web::{get, post, scope};
use actix_web::Scope;

mod get_status;
pub(crate) mod persist;
mod template;
mod upload;
mod validate;

const API_PATH: &str = "/api/imports";

/// Configures and returns the Actix scope for import routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/status/{job_id}", get().to(get_status::process))
        .route("/{kind}/template", get().to(template::process))
        .route("/{kind}/validate", post().to(validate::process))
        .route("/{kind}/upload", post().to(upload::process))
}
