use crate::diag;
use crate::model::{Bookmark, FormValues, TabInfo, DEFAULT_PARENT_ID};
use crate::store::BookmarkStore;
use crate::tree::{folder_tree, picker_nodes, PickerNode};
use serde::Serialize;

/// Supplies the focused tab's descriptor. Production reads the
/// frontend-reported tab state; tests plug in a fake.
pub trait TabProvider {
    fn active_tab(&self) -> Result<TabInfo, String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    /// No bookmark matches the tab URL; submit creates one.
    Create,
    /// A match exists; submit updates it and delete becomes available.
    Edit,
}

/// Everything the popup window needs to render one state of the form.
#[derive(Debug, Clone, Serialize)]
pub struct PopupView {
    pub mode: FormMode,
    pub tab: TabInfo,
    pub values: FormValues,
    #[serde(rename = "canDelete")]
    pub can_delete: bool,
    pub tree: Vec<PickerNode>,
    #[serde(rename = "tagOptions")]
    pub tag_options: Vec<String>,
}

/// One popup session: created when the window opens, dropped when it
/// closes. Holds only the tab snapshot, the matched bookmark, and a
/// latch against re-entrant submits.
pub struct PopupForm {
    tab: TabInfo,
    exist_node: Option<Bookmark>,
    submitting: bool,
}

impl PopupForm {
    pub fn new() -> Self {
        PopupForm {
            tab: TabInfo::default(),
            exist_node: None,
            submitting: false,
        }
    }

    /// Open-time init: fetch the tab, warm the store, look up an
    /// existing bookmark for the tab URL. A failed fetch is logged and
    /// leaves the default empty create form.
    pub fn init(&mut self, tabs: &dyn TabProvider, store: &mut BookmarkStore) -> PopupView {
        self.tab = TabInfo::default();
        self.exist_node = None;
        if let Err(e) = self.try_init(tabs, store) {
            diag::log_error("popup", &format!("tab info fetch failed: {}", e));
        }
        self.view(store)
    }

    fn try_init(&mut self, tabs: &dyn TabProvider, store: &mut BookmarkStore) -> Result<(), String> {
        let tab = tabs.active_tab()?;
        store.reload()?;
        self.exist_node = store.find_by_url(&tab.url).cloned();
        self.tab = tab;
        Ok(())
    }

    pub fn mode(&self) -> FormMode {
        if self.exist_node.is_some() {
            FormMode::Edit
        } else {
            FormMode::Create
        }
    }

    /// Pre-filled form values: the existing bookmark merged over tab
    /// info in edit mode, tab title/URL with the default parent in
    /// create mode.
    pub fn initial_values(&self) -> FormValues {
        match &self.exist_node {
            Some(node) => FormValues {
                title: node.title.clone(),
                url: node.url.clone(),
                parent_id: Some(node.parent_id.clone()),
                tags: node.tags.clone(),
                note: node.note.clone(),
                ..FormValues::default()
            },
            None => FormValues {
                title: self.tab.title.clone(),
                url: self.tab.url.clone(),
                parent_id: Some(DEFAULT_PARENT_ID.to_string()),
                ..FormValues::default()
            },
        }
    }

    pub fn view(&self, store: &BookmarkStore) -> PopupView {
        PopupView {
            mode: self.mode(),
            tab: self.tab.clone(),
            values: self.initial_values(),
            can_delete: self.exist_node.is_some(),
            tree: picker_nodes(&folder_tree(store.folders())),
            tag_options: store.all_tags(),
        }
    }

    /// Explicit submit and the on-change autosave both land here: the
    /// popup saves incrementally as the user edits, there is no
    /// unsaved-changes state.
    pub fn submit(&mut self, values: &FormValues, store: &mut BookmarkStore) -> Result<PopupView, String> {
        if self.submitting {
            return Err("submit already in progress".into());
        }
        self.submitting = true;
        let res = self.dispatch(values, store);
        self.submitting = false;
        res?;
        self.refresh(store)?;
        Ok(self.view(store))
    }

    fn dispatch(&mut self, values: &FormValues, store: &mut BookmarkStore) -> Result<(), String> {
        // partial values come through while the user is still typing
        if values.title.is_empty() || values.url.is_empty() {
            return Err("title and url are required".into());
        }
        match &self.exist_node {
            Some(node) => store.update(values, &node.id),
            None => store.create(values, self.tab.fav_icon_url.clone()).map(|_| ()),
        }
    }

    pub fn delete(&mut self, sync_delete: bool, store: &mut BookmarkStore) -> Result<PopupView, String> {
        let node = self.exist_node.clone().ok_or("no bookmark to delete")?;
        store.remove(&node.id, sync_delete)?;
        self.refresh(store)?;
        Ok(self.view(store))
    }

    /// Post-mutation side effects: re-read the store and re-run the
    /// existing-node lookup so the picker, tag options, and mode stay
    /// current.
    fn refresh(&mut self, store: &mut BookmarkStore) -> Result<(), String> {
        store.reload()?;
        self.exist_node = store.find_by_url(&self.tab.url).cloned();
        Ok(())
    }
}
