use serde::{Deserialize, Serialize};

/// Purpose of an upload. Each kind fixes its form field, file count, remote
/// namespace, and public id shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadKind {
    ProfilePhoto,
    PostImage,
}

impl UploadKind {
    /// Multipart form field carrying the file(s)
    pub fn form_field(self) -> &'static str {
        match self {
            UploadKind::ProfilePhoto => "photo",
            UploadKind::PostImage => "images",
        }
    }

    /// Namespace below the configured folder root
    pub fn folder_suffix(self) -> &'static str {
        match self {
            UploadKind::ProfilePhoto => "profiles",
            UploadKind::PostImage => "posts",
        }
    }

    /// Prefix of generated public ids
    pub fn id_prefix(self) -> &'static str {
        match self {
            UploadKind::ProfilePhoto => "profile",
            UploadKind::PostImage => "post",
        }
    }

    /// Whether generated ids carry a random suffix. Batches can produce several
    /// ids within the same millisecond.
    pub fn randomized_ids(self) -> bool {
        matches!(self, UploadKind::PostImage)
    }

    /// Full remote folder for this kind, e.g. `earnbuddy/profiles`
    pub fn folder(self, root: &str) -> String {
        let root = root.trim_matches('/');
        if root.is_empty() {
            self.folder_suffix().to_string()
        } else {
            format!("{}/{}", root, self.folder_suffix())
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UploadKind::ProfilePhoto => "profile_photo",
            UploadKind::PostImage => "post_image",
        }
    }
}
