use std::fmt;

use tracing::{info, warn};

use crate::api::fallback::Notice;
use crate::api::types::UploadFile;
use crate::api::KnowledgeBase;

/// Extensions the ingestion pipeline has readers for.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "md", "csv"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadRejection {
    NoFiles,
    Unsupported(Vec<String>),
}

impl fmt::Display for UploadRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadRejection::NoFiles => write!(f, "Please select at least one file to upload"),
            UploadRejection::Unsupported(names) => write!(
                f,
                "Unsupported file type: {}. PDF, Markdown, and CSV files supported",
                names.join(", ")
            ),
        }
    }
}

/// A non-empty set of files that passed client-side checks.
#[derive(Debug)]
pub struct UploadBatch {
    files: Vec<UploadFile>,
}

impl UploadBatch {
    pub fn validate(files: Vec<UploadFile>) -> Result<Self, UploadRejection> {
        check_names(files.iter().map(|f| f.name.as_str()))?;
        Ok(Self { files })
    }
}

/// Client-side checks that need only the file names, so callers can run
/// them before fetching any file contents.
pub fn check_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<(), UploadRejection> {
    let mut any = false;
    let mut unsupported = Vec::new();
    for name in names {
        any = true;
        if !is_accepted(name) {
            unsupported.push(name.to_string());
        }
    }
    if !any {
        return Err(UploadRejection::NoFiles);
    }
    if !unsupported.is_empty() {
        return Err(UploadRejection::Unsupported(unsupported));
    }
    Ok(())
}

fn is_accepted(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| ACCEPTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Validate and send. Rejections never reach the network.
pub async fn upload(api: &dyn KnowledgeBase, files: Vec<UploadFile>) -> Notice {
    let batch = match UploadBatch::validate(files) {
        Ok(batch) => batch,
        Err(rejection) => {
            info!(%rejection, "upload rejected client-side");
            return Notice::error(rejection.to_string());
        }
    };

    let count = batch.files.len();
    match api.upload_documents(batch.files).await {
        Ok(()) => Notice::success(format!("{} document(s) uploaded successfully", count)),
        Err(e) => {
            warn!(error = %e, count, "upload failed");
            Notice::error("Failed to upload documents")
        }
    }
}
