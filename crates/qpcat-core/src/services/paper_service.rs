//! Paper service - single-paper lookups and downloads.

use std::sync::Arc;

use crate::domain::QuestionPaper;
use crate::ports::{CoreError, FileStorage, QuestionPaperRepository};

/// MIME type served for every stored paper.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Bytes of a stored paper ready to hand to a client.
#[derive(Debug, Clone)]
pub struct PaperDownload {
    /// Basename of the stored file.
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl PaperDownload {
    /// `attachment; filename="..."` header value.
    pub fn content_disposition(&self) -> String {
        let escaped = self.filename.replace('\\', "\\\\").replace('"', "\\\"");
        format!("attachment; filename=\"{escaped}\"")
    }
}

pub struct PaperService {
    papers: Arc<dyn QuestionPaperRepository>,
    storage: Arc<dyn FileStorage>,
}

impl PaperService {
    pub fn new(papers: Arc<dyn QuestionPaperRepository>, storage: Arc<dyn FileStorage>) -> Self {
        Self { papers, storage }
    }

    pub async fn get(&self, id: i64) -> Result<QuestionPaper, CoreError> {
        Ok(self.papers.get_by_id(id).await?)
    }

    /// Load a paper's stored bytes.
    pub async fn download(&self, id: i64) -> Result<PaperDownload, CoreError> {
        let paper = self.get(id).await?;
        let bytes = self.storage.read(&paper.file).await?;
        Ok(PaperDownload {
            filename: paper.filename().to_string(),
            content_type: PDF_CONTENT_TYPE,
            bytes,
        })
    }
}
