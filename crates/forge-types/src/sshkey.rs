//! SSH public keys registered with the account.

use serde::Serialize;

/// A registered SSH public key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SshKey {
    pub id: u64,
    pub title: String,
    pub key: String,
    pub created_at: String,
}
