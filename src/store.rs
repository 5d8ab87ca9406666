use crate::model::{Bookmark, BookmarkData, Folder, FormValues, DEFAULT_PARENT_ID};
use std::collections::HashSet;
use std::path::PathBuf;

/// File-backed bookmark store over bookmarks.json
/// (`{"bookmarks":[],"folders":[]}`). Every mutation persists before it
/// returns, so the popup never observes a half-applied change.
pub struct BookmarkStore {
    path: PathBuf,
    data: BookmarkData,
}

impl BookmarkStore {
    /// Load the document from disk, starting empty when the file does
    /// not exist yet.
    pub fn open(path: PathBuf) -> Result<Self, String> {
        let data = load_data(&path)?;
        Ok(BookmarkStore { path, data })
    }

    /// Empty store at the given path, for recovery after a failed open.
    pub fn empty(path: PathBuf) -> Self {
        BookmarkStore {
            path,
            data: BookmarkData::default(),
        }
    }

    /// Re-read the document from disk, discarding the in-memory copy.
    /// This is the "warm the store" step the popup runs on open and
    /// after every mutation.
    pub fn reload(&mut self) -> Result<(), String> {
        self.data = load_data(&self.path)?;
        Ok(())
    }

    /// Atomic save: write .tmp, then rename over the live file.
    pub fn save(&self) -> Result<(), String> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| format!("create data dir: {}", e))?;
        }
        let json = serde_json::to_string(&self.data).map_err(|e| format!("serialize: {}", e))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| format!("write tmp: {}", e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| format!("rename: {}", e))?;
        Ok(())
    }

    pub fn data(&self) -> &BookmarkData {
        &self.data
    }

    pub fn folders(&self) -> &[Folder] {
        &self.data.folders
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.data.bookmarks
    }

    /// Lookup backing the popup's "does this tab already have a
    /// bookmark" search. Exact match wins; otherwise URLs are compared
    /// after parsing, so `https://a.com` and `https://a.com/` meet.
    pub fn find_by_url(&self, url: &str) -> Option<&Bookmark> {
        if url.is_empty() {
            return None;
        }
        self.data
            .bookmarks
            .iter()
            .find(|b| b.url == url)
            .or_else(|| self.data.bookmarks.iter().find(|b| urls_match(&b.url, url)))
    }

    pub fn create(&mut self, values: &FormValues, favicon: Option<String>) -> Result<String, String> {
        let id = uuid::Uuid::new_v4().to_string();
        let parent_id = values
            .parent_id
            .clone()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PARENT_ID.to_string());
        self.data.bookmarks.push(Bookmark {
            id: id.clone(),
            title: values.title.clone(),
            url: values.url.clone(),
            favicon,
            parent_id,
            tags: values.tags.clone(),
            note: values.note.clone(),
            created_at: chrono::Utc::now().timestamp_millis() as f64,
        });
        self.save()?;
        Ok(id)
    }

    /// Update goes through remove-then-recreate keeping the id, so a
    /// path change drops the bookmark at the end of its new parent the
    /// same way a fresh save would.
    pub fn update(&mut self, values: &FormValues, existing_id: &str) -> Result<(), String> {
        let pos = self
            .data
            .bookmarks
            .iter()
            .position(|b| b.id == existing_id)
            .ok_or("bookmark not found")?;
        let old = self.data.bookmarks.remove(pos);
        self.data.bookmarks.push(Bookmark {
            id: old.id,
            title: values.title.clone(),
            url: values.url.clone(),
            favicon: old.favicon,
            parent_id: values
                .parent_id
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or(old.parent_id),
            tags: values.tags.clone(),
            note: values.note.clone(),
            created_at: old.created_at,
        });
        self.save()
    }

    /// Remove a bookmark. With `sync_delete` set, records sharing the
    /// removed bookmark's URL go with it.
    pub fn remove(&mut self, id: &str, sync_delete: bool) -> Result<(), String> {
        let pos = self
            .data
            .bookmarks
            .iter()
            .position(|b| b.id == id)
            .ok_or("bookmark not found")?;
        let removed = self.data.bookmarks.remove(pos);
        if sync_delete {
            self.data.bookmarks.retain(|b| !urls_match(&b.url, &removed.url));
        }
        self.save()
    }

    /// De-duplicated union of tags across all bookmarks, first-seen
    /// order. Feeds the popup's tag suggestions.
    pub fn all_tags(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut tags = Vec::new();
        for bm in &self.data.bookmarks {
            for tag in &bm.tags {
                if seen.insert(tag.clone()) {
                    tags.push(tag.clone());
                }
            }
        }
        tags
    }
}

fn load_data(path: &PathBuf) -> Result<BookmarkData, String> {
    if !path.exists() {
        return Ok(BookmarkData::default());
    }
    let json = std::fs::read_to_string(path).map_err(|e| format!("read bookmarks: {}", e))?;
    serde_json::from_str(&json).map_err(|e| format!("parse bookmarks: {}", e))
}

fn urls_match(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    match (url::Url::parse(a), url::Url::parse(b)) {
        (Ok(ua), Ok(ub)) => ua == ub,
        _ => a.trim_end_matches('/') == b.trim_end_matches('/'),
    }
}
