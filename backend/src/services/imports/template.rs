use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse, Responder};
use common::import::{generate_template, ImportRecord};
use common::model::client::ClientRecord;
use common::model::vendor::VendorRecord;
use common::requests::ImportKind;
use log::error;

/// HTTP handler for `GET /api/imports/{kind}/template`.
///
/// - On success: `200 OK` with the template as a CSV attachment.
/// - On failure: `500 Internal Server Error` with the error message.
pub(crate) async fn process(kind: web::Path<ImportKind>) -> impl Responder {
    let kind = kind.into_inner();
    let rendered = match kind {
        ImportKind::Clients => render::<ClientRecord>(),
        ImportKind::Vendors => render::<VendorRecord>(),
    };

    match rendered {
        Ok(text) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(kind.template_filename())],
            })
            .body(text),
        Err(e) => {
            error!("Could not render {} template: {}", kind.as_str(), e);
            HttpResponse::InternalServerError().body(format!("Error: {}", e))
        }
    }
}

fn render<R: ImportRecord>() -> Result<String, String> {
    generate_template(&R::example()).map_err(|e| e.to_string())
}
