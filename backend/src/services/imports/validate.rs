use crate::config::AppConfig;
use crate::services::imports::upload::read_csv_upload;
use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder};
use common::import::{run_import, ImportOptions, ImportRecord};
use common::model::client::ClientRecord;
use common::model::vendor::VendorRecord;
use common::requests::ImportKind;
use serde::Serialize;

/// HTTP handler for `POST /api/imports/{kind}/validate`.
///
/// - `200 OK` with the `ImportResult` when every row is valid.
/// - `422 Unprocessable Entity` with the `ImportResult` when any error was found.
/// - `400 Bad Request` when the upload itself cannot be read.
pub(crate) async fn process(
    kind: web::Path<ImportKind>,
    payload: Multipart,
    config: web::Data<AppConfig>,
) -> impl Responder {
    let upload = match read_csv_upload(payload).await {
        Ok(upload) => upload,
        Err(e) => return HttpResponse::BadRequest().body(format!("Error: {}", e)),
    };

    let options = config.import.clone();
    let kind = kind.into_inner();
    let handle = tokio::task::spawn_blocking(move || match kind {
        ImportKind::Clients => dry_run::<ClientRecord>(&upload.text, &options),
        ImportKind::Vendors => dry_run::<VendorRecord>(&upload.text, &options),
    });

    match handle.await {
        Ok(Ok((true, body))) => HttpResponse::Ok().json(body),
        Ok(Ok((false, body))) => HttpResponse::build(StatusCode::UNPROCESSABLE_ENTITY).json(body),
        Ok(Err(e)) => HttpResponse::InternalServerError().body(e),
        Err(join_err) => {
            HttpResponse::InternalServerError().body(format!("join error: {}", join_err))
        }
    }
}

fn dry_run<R>(text: &str, options: &ImportOptions) -> Result<(bool, serde_json::Value), String>
where
    R: ImportRecord + Serialize,
{
    let result = run_import::<R>(text, options);
    let body = serde_json::to_value(&result).map_err(|e| e.to_string())?;
    Ok((result.success, body))
}
