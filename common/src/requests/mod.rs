use serde::{Deserialize, Serialize};

/// Which bulk import an `/api/imports/{kind}/...` request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    Clients,
    Vendors,
}

impl ImportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ImportKind::Clients => "clients",
            ImportKind::Vendors => "vendors",
        }
    }

    pub fn template_filename(self) -> String {
        format!("{}_import_template.csv", self.as_str())
    }
}

/// Response body of `POST /api/imports/{kind}/upload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartImportResponse {
    pub job_id: String,
}
