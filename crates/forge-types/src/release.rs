//! Releases and their assets.

use serde::Serialize;

/// A published release.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Release {
    /// Carried as a string: GitHub/Gitea use numeric ids, GitLab uses the
    /// tag name as the identifier for deletion.
    pub id: String,
    pub name: String,
    pub body: String,
    pub author: String,
    pub date: String,
    /// GitHub only: asset upload URL template from the create response.
    pub upload_url: Option<String>,
    pub tarball_url: Option<String>,
    pub draft: bool,
    pub prerelease: bool,
    pub assets: Vec<ReleaseAsset>,
}

/// A downloadable asset attached to a release.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub url: String,
}

/// A local file to be uploaded as a release asset.
#[derive(Debug, Clone, Default)]
pub struct ReleaseAssetUpload {
    /// File name to register the asset under.
    pub name: String,
    /// Local path to read the content from.
    pub path: String,
}

/// Options for creating a release.
#[derive(Debug, Clone, Default)]
pub struct NewRelease {
    pub owner: String,
    pub repo: String,
    pub tag: String,
    pub name: String,
    pub body: String,
    /// Commitish the tag should point at, if the tag does not exist yet.
    pub commitish: Option<String>,
    pub draft: bool,
    pub prerelease: bool,
    pub assets: Vec<ReleaseAssetUpload>,
}
