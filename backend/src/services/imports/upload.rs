//! Upload handling and the background import job.
//!
//! `POST /api/imports/{kind}/upload` reads the `file` part of a multipart
//! request, registers a `Pending` job and hands the text to a blocking worker
//! that runs the import and stores the records. Progress and the final
//! `ImportReport` go through the shared `JobsState`.

use crate::config::AppConfig;
use crate::job_controller::state::{JobUpdate, JobsState};
use crate::services::imports::persist::{self, StoreRecords};
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use common::import::{run_import, ImportOptions};
use common::jobs::{ImportReport, JobStatus};
use common::model::client::ClientRecord;
use common::model::vendor::VendorRecord;
use common::requests::{ImportKind, StartImportResponse};
use futures_util::StreamExt;
use log::{info, warn};
use md5::Context;
use rusqlite::Connection;
use std::path::Path;
use tokio::sync::mpsc;

/// An uploaded import file, decoded as UTF-8.
#[derive(Debug, Clone)]
pub(crate) struct UploadedFile {
    pub filename: String,
    pub text: String,
    /// Hex MD5 of the uploaded bytes.
    pub md5: String,
}

/// Reads the `file` part of a multipart upload.
///
/// The filename must end with `.csv` and the content must be UTF-8; a leading
/// byte-order mark is left for the importer to strip.
pub(crate) async fn read_csv_upload(mut payload: Multipart) -> Result<UploadedFile, String> {
    let mut upload: Option<UploadedFile> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| e.to_string())?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));
        if name.as_deref() != Some("file") {
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
            .unwrap_or_default();
        if !filename.to_lowercase().ends_with(".csv") {
            return Err("The file must end with .csv".to_string());
        }

        let mut md5_hasher = Context::new();
        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| e.to_string())?;
            md5_hasher.consume(&chunk);
            bytes.extend_from_slice(&chunk);
        }

        let text = String::from_utf8(bytes).map_err(|_| "The file is not valid UTF-8".to_string())?;
        upload = Some(UploadedFile {
            filename,
            text,
            md5: format!("{:x}", md5_hasher.finalize()),
        });
    }

    upload.ok_or_else(|| "Missing file".to_string())
}

/// HTTP handler for `POST /api/imports/{kind}/upload`.
///
/// - On success: `200 OK` with `{"job_id": ...}`.
/// - On an unreadable upload: `400 Bad Request` with the error message.
pub(crate) async fn process(
    kind: web::Path<ImportKind>,
    payload: Multipart,
    state: web::Data<JobsState>,
    config: web::Data<AppConfig>,
) -> impl Responder {
    let upload = match read_csv_upload(payload).await {
        Ok(upload) => upload,
        Err(e) => return HttpResponse::BadRequest().body(format!("Error: {}", e)),
    };

    match schedule_import_job(state, config.get_ref().clone(), kind.into_inner(), upload).await {
        Ok(job_id) => HttpResponse::Ok().json(StartImportResponse { job_id }),
        Err(err) => HttpResponse::InternalServerError().body(err),
    }
}

async fn schedule_import_job(
    state: web::Data<JobsState>,
    config: AppConfig,
    kind: ImportKind,
    upload: UploadedFile,
) -> Result<String, String> {
    let job_id = uuid::Uuid::new_v4().to_string();
    state
        .jobs
        .write()
        .await
        .insert(job_id.clone(), JobStatus::Pending);
    info!(
        "Import job {} queued: {} from '{}'",
        job_id,
        kind.as_str(),
        upload.filename
    );

    let tx = state.tx.clone();
    let value = job_id.clone();

    tokio::spawn(async move {
        let tx_block = tx.clone();
        let job_for_blocking = value.clone();

        let handle = tokio::task::spawn_blocking(move || {
            import_blocking(
                tx_block,
                &job_for_blocking,
                &config.database_path,
                &config.import,
                kind,
                &upload,
            )
        });

        let status = match handle.await {
            Ok(Ok(report)) => JobStatus::Completed(report),
            Ok(Err(e)) => {
                warn!("Import job {} failed: {}", value, e);
                JobStatus::Failed(e)
            }
            Err(join_err) => JobStatus::Failed(format!("join error: {}", join_err)),
        };
        let _ = tx.send(JobUpdate { job_id: value, status }).await;
    });

    Ok(job_id)
}

/// Runs one import job to completion on a blocking thread.
fn import_blocking(
    tx: mpsc::Sender<JobUpdate>,
    job_id: &str,
    database_path: &Path,
    options: &ImportOptions,
    kind: ImportKind,
    upload: &UploadedFile,
) -> Result<ImportReport, String> {
    let _ = tx.blocking_send(JobUpdate {
        job_id: job_id.to_string(),
        status: JobStatus::InProgress(0),
    });

    let mut conn = Connection::open(database_path).map_err(|e| e.to_string())?;
    let report = match kind {
        ImportKind::Clients => import_and_save::<ClientRecord>(&mut conn, kind, upload, options)?,
        ImportKind::Vendors => import_and_save::<VendorRecord>(&mut conn, kind, upload, options)?,
    };

    info!(
        "Import job {} finished: {} of {} rows valid, {} stored",
        job_id, report.valid_rows, report.total_rows, report.persisted
    );
    Ok(report)
}

fn import_and_save<R: StoreRecords>(
    conn: &mut Connection,
    kind: ImportKind,
    upload: &UploadedFile,
    options: &ImportOptions,
) -> Result<ImportReport, String> {
    let result = run_import::<R>(&upload.text, options);
    let persisted =
        persist::save_import(conn, kind, &upload.md5, &result).map_err(|e| e.to_string())?;
    Ok(ImportReport::new(&result, persisted))
}

