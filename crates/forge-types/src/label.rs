//! Issue/pull labels.

use serde::Serialize;

/// A label definition in a repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Label {
    pub id: u64,
    pub name: String,
    pub description: String,
    /// Colour as `0xRRGGBB00`; the low byte is reserved and always zero.
    pub color: u32,
}
