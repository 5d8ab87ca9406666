use serde::{Deserialize, Serialize};

/// `parentId` value (or empty string) that marks a direct child of the root.
pub const ROOT_PARENT_ID: &str = "0";

/// Folder new bookmarks land in when the user picked no path.
pub const DEFAULT_PARENT_ID: &str = "1";

/// Hierarchy-only node. Folders carry no URL by construction, so the
/// "folder = record without url" convention of imported data becomes a
/// separate type here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub title: String,
    #[serde(rename = "parentId", default)]
    pub parent_id: String,
}

impl Folder {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_empty() || self.parent_id == ROOT_PARENT_ID
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(rename = "parentId", default)]
    pub parent_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: f64,
}

/// Persisted document shape of bookmarks.json.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookmarkData {
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,
    #[serde(default)]
    pub folders: Vec<Folder>,
}

/// Descriptor of the focused tab, reported by the frontend and
/// refreshed every time the popup opens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TabInfo {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "favIconUrl", default, skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
}

/// What the popup form holds while open. `sync_delete` controls whether
/// deleting also removes records sharing the same URL; `is_home` is part
/// of the form contract but has no UI behind it yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormValues {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "parentId", default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(rename = "syncDelete", default = "default_true")]
    pub sync_delete: bool,
    #[serde(rename = "isHome", default)]
    pub is_home: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FormValues {
    fn default() -> Self {
        FormValues {
            title: String::new(),
            url: String::new(),
            parent_id: None,
            tags: Vec::new(),
            note: None,
            sync_delete: true,
            is_home: false,
        }
    }
}
