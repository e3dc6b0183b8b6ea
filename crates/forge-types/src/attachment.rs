//! Bug attachments (Bugzilla).

use serde::Serialize;

/// Metadata of a file attached to a bug.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Attachment {
    pub id: u64,
    pub author: String,
    pub created_at: String,
    pub file_name: String,
    pub summary: String,
    pub content_type: String,
    pub is_obsolete: bool,
}
