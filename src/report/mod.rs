// src/report/mod.rs
//! Case report generation: three identifying strings in, one PDF on disk out.

pub mod pdf;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::error::ReportError;

pub const REPORT_PREFIX: &str = "report_";
pub const REPORT_EXTENSION: &str = "pdf";

/// Raw, possibly incomplete parameters as they arrive on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportParams {
    pub tourist_id: Option<String>,
    pub alert: Option<String>,
    pub last_location: Option<String>,
}

impl ReportParams {
    /// Fill fields missing here from `other`. Values already present win.
    pub fn or(self, other: ReportParams) -> ReportParams {
        ReportParams {
            tourist_id: self.tourist_id.or(other.tourist_id),
            alert: self.alert.or(other.alert),
            last_location: self.last_location.or(other.last_location),
        }
    }
}

/// A complete report request. Empty strings are valid values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub tourist_id: String,
    pub alert: String,
    pub last_location: String,
}

impl ReportRequest {
    pub fn new(
        tourist_id: impl Into<String>,
        alert: impl Into<String>,
        last_location: impl Into<String>,
    ) -> Self {
        Self {
            tourist_id: tourist_id.into(),
            alert: alert.into(),
            last_location: last_location.into(),
        }
    }

    /// Fields are checked in declaration order; the first absent one is reported.
    pub fn from_params(params: ReportParams) -> Result<Self, ReportError> {
        Ok(Self {
            tourist_id: params
                .tourist_id
                .ok_or(ReportError::MissingField("tourist_id"))?,
            alert: params.alert.ok_or(ReportError::MissingField("alert"))?,
            last_location: params
                .last_location
                .ok_or(ReportError::MissingField("last_location"))?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportResult {
    pub status: &'static str,
    pub file: String,
}

impl ReportResult {
    pub fn success(file: String) -> Self {
        Self {
            status: "success",
            file,
        }
    }
}

/// `report_<32 hex>.pdf` from a fresh v4 UUID.
pub fn report_file_name() -> String {
    format!(
        "{REPORT_PREFIX}{}.{REPORT_EXTENSION}",
        Uuid::new_v4().simple()
    )
}

/// Render the report and write it into `output_dir`.
///
/// The name is random but not reserved: an existing file with the same name is
/// overwritten, and nothing removes the file afterwards.
pub async fn generate(req: &ReportRequest, output_dir: &Path) -> Result<ReportResult, ReportError> {
    let file = report_file_name();
    let bytes = pdf::render(req).inspect_err(|e| error!(error = %e, "case report render failed"))?;
    let path: PathBuf = output_dir.join(&file);

    if let Err(e) = tokio::fs::write(&path, &bytes).await {
        error!(path = %path.display(), error = %e, "case report write failed");
        return Err(e.into());
    }

    metrics::histogram!("case_report_bytes").record(bytes.len() as f64);
    info!(
        tourist_id = %req.tourist_id,
        file = %file,
        bytes = bytes.len(),
        "case report written"
    );
    Ok(ReportResult::success(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> ReportParams {
        ReportParams {
            tourist_id: Some("T1".into()),
            alert: Some("Fall detected".into()),
            last_location: Some("Lat:10,Lon:20".into()),
        }
    }

    #[test]
    fn complete_params_convert() {
        let req = ReportRequest::from_params(full()).unwrap();
        assert_eq!(req, ReportRequest::new("T1", "Fall detected", "Lat:10,Lon:20"));
    }

    #[test]
    fn each_missing_field_is_named() {
        let mut p = full();
        p.tourist_id = None;
        assert!(matches!(
            ReportRequest::from_params(p),
            Err(ReportError::MissingField("tourist_id"))
        ));

        let mut p = full();
        p.alert = None;
        assert!(matches!(
            ReportRequest::from_params(p),
            Err(ReportError::MissingField("alert"))
        ));

        let mut p = full();
        p.last_location = None;
        assert!(matches!(
            ReportRequest::from_params(p),
            Err(ReportError::MissingField("last_location"))
        ));
    }

    #[test]
    fn empty_strings_are_accepted() {
        let p = ReportParams {
            tourist_id: Some(String::new()),
            alert: Some(String::new()),
            last_location: Some(String::new()),
        };
        assert!(ReportRequest::from_params(p).is_ok());
    }

    #[test]
    fn or_prefers_existing_values() {
        let q = ReportParams {
            tourist_id: Some("Q".into()),
            ..Default::default()
        };
        let merged = q.or(full());
        assert_eq!(merged.tourist_id.as_deref(), Some("Q"));
        assert_eq!(merged.alert.as_deref(), Some("Fall detected"));
    }

    #[test]
    fn file_names_are_hex_and_distinct() {
        let a = report_file_name();
        let b = report_file_name();
        assert_ne!(a, b);
        let hex = a
            .strip_prefix("report_")
            .and_then(|s| s.strip_suffix(".pdf"))
            .unwrap();
        assert_eq!(hex.len(), 32);
        assert!(hex.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[tokio::test]
    async fn generate_writes_into_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let req = ReportRequest::new("T1", "Fall detected", "Lat:10,Lon:20");
        let res = generate(&req, dir.path()).await.unwrap();
        assert_eq!(res.status, "success");
        let bytes = std::fs::read(dir.path().join(&res.file)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn generate_into_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let req = ReportRequest::new("T1", "a", "b");
        assert!(matches!(
            generate(&req, &missing).await,
            Err(ReportError::Io(_))
        ));
    }
}
