mod diag;
mod i18n;
mod model;
mod popup;
mod store;
mod tree;

use model::{Bookmark, BookmarkData, FormValues, TabInfo};
use parking_lot::Mutex;
use popup::{PopupForm, PopupView, TabProvider};
use std::fs;
use std::path::{Path, PathBuf};
use store::BookmarkStore;
use tauri::Manager;
use tree::{folder_tree, picker_nodes, PickerNode};

struct StoreState {
    store: Mutex<BookmarkStore>,
}

struct PopupState {
    form: Mutex<PopupForm>,
}

/// Focused-tab descriptor, pushed by the frontend whenever tab focus or
/// navigation changes.
struct TabState {
    active: Mutex<Option<TabInfo>>,
}

struct I18nState {
    lang: Mutex<i18n::Lang>,
}

/// `TabProvider` over the frontend-reported tab state.
struct ReportedTabs<'a> {
    state: &'a TabState,
}

impl TabProvider for ReportedTabs<'_> {
    fn active_tab(&self) -> Result<TabInfo, String> {
        self.state
            .active
            .lock()
            .clone()
            .ok_or_else(|| "no active tab reported".to_string())
    }
}

#[tauri::command]
async fn report_active_tab(state: tauri::State<'_, TabState>, tab: TabInfo) -> Result<(), String> {
    *state.active.lock() = Some(tab);
    Ok(())
}

/// Popup open: resolve the tab, look up an existing bookmark, return
/// the pre-filled form plus picker tree and tag options.
#[tauri::command]
async fn popup_init(app: tauri::AppHandle) -> Result<PopupView, String> {
    let tabs = app.state::<TabState>();
    let stores = app.state::<StoreState>();
    let popups = app.state::<PopupState>();
    let provider = ReportedTabs { state: tabs.inner() };
    let mut store = stores.store.lock();
    let mut form = popups.form.lock();
    Ok(form.init(&provider, &mut store))
}

#[tauri::command]
async fn popup_submit(app: tauri::AppHandle, values: FormValues) -> Result<PopupView, String> {
    let stores = app.state::<StoreState>();
    let popups = app.state::<PopupState>();
    let mut store = stores.store.lock();
    let mut form = popups.form.lock();
    form.submit(&values, &mut store)
}

/// Autosave: every field change in the popup re-submits the whole form.
#[tauri::command]
async fn popup_values_changed(app: tauri::AppHandle, values: FormValues) -> Result<PopupView, String> {
    let stores = app.state::<StoreState>();
    let popups = app.state::<PopupState>();
    let mut store = stores.store.lock();
    let mut form = popups.form.lock();
    form.submit(&values, &mut store)
}

#[tauri::command]
async fn popup_delete(app: tauri::AppHandle, sync_delete: Option<bool>) -> Result<PopupView, String> {
    let stores = app.state::<StoreState>();
    let popups = app.state::<PopupState>();
    let mut store = stores.store.lock();
    let mut form = popups.form.lock();
    form.delete(sync_delete.unwrap_or(true), &mut store)
}

#[tauri::command]
async fn folder_picker_data(state: tauri::State<'_, StoreState>) -> Result<Vec<PickerNode>, String> {
    let store = state.store.lock();
    Ok(picker_nodes(&folder_tree(store.folders())))
}

#[tauri::command]
async fn tag_options(state: tauri::State<'_, StoreState>) -> Result<Vec<String>, String> {
    Ok(state.store.lock().all_tags())
}

#[tauri::command]
async fn bookmark_search(state: tauri::State<'_, StoreState>, url: String) -> Result<Option<Bookmark>, String> {
    Ok(state.store.lock().find_by_url(&url).cloned())
}

#[tauri::command]
async fn bookmark_list(state: tauri::State<'_, StoreState>) -> Result<BookmarkData, String> {
    let mut store = state.store.lock();
    store.reload()?;
    Ok(store.data().clone())
}

#[tauri::command]
async fn open_bookmark(url: String) -> Result<(), String> {
    tauri_plugin_opener::open_url(&url, None::<&str>).map_err(|e| e.to_string())
}

#[tauri::command]
async fn i18n_text(state: tauri::State<'_, I18nState>, key: String) -> Result<String, String> {
    let lang = *state.lang.lock();
    Ok(i18n::text(lang, &key).to_string())
}

#[tauri::command]
async fn set_language(app: tauri::AppHandle, tag: String) -> Result<(), String> {
    let lang = i18n::Lang::from_tag(&tag);
    *app.state::<I18nState>().lang.lock() = lang;
    let dir = app
        .path()
        .app_data_dir()
        .map_err(|e| format!("app data dir: {}", e))?;
    save_language(&dir, &tag)
}

fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join("settings.json")
}

// settings.json is owned by the frontend; read it leniently and only
// touch the one key we manage
fn load_language(data_dir: &Path) -> i18n::Lang {
    let p = settings_path(data_dir);
    if !p.exists() {
        return i18n::Lang::En;
    }
    fs::read_to_string(&p)
        .ok()
        .and_then(|s| serde_json::from_str::<serde_json::Value>(&s).ok())
        .and_then(|v| v.get("language")?.as_str().map(i18n::Lang::from_tag))
        .unwrap_or(i18n::Lang::En)
}

fn save_language(data_dir: &Path, tag: &str) -> Result<(), String> {
    let _ = fs::create_dir_all(data_dir);
    let p = settings_path(data_dir);
    let mut settings = if p.exists() {
        fs::read_to_string(&p)
            .ok()
            .and_then(|s| serde_json::from_str::<serde_json::Value>(&s).ok())
            .unwrap_or_else(|| serde_json::json!({}))
    } else {
        serde_json::json!({})
    };
    settings["language"] = serde_json::Value::String(tag.to_string());
    let json = serde_json::to_string(&settings).map_err(|e| format!("serialize settings: {}", e))?;
    fs::write(&p, json).map_err(|e| format!("write settings: {}", e))
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("com.shiori.popup");
    let _ = fs::create_dir_all(&data_dir);
    diag::init(&data_dir);
    diag::log_info(
        "startup",
        &format!(
            "Shiori popup v{} starting, pid={}",
            env!("CARGO_PKG_VERSION"),
            std::process::id()
        ),
    );

    let lang = load_language(&data_dir);
    let fallback_dir = data_dir.clone();

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .manage(TabState {
            active: Mutex::new(None),
        })
        .manage(PopupState {
            form: Mutex::new(PopupForm::new()),
        })
        .manage(I18nState {
            lang: Mutex::new(lang),
        })
        .setup(move |app| {
            let store_path = app
                .path()
                .app_data_dir()
                .unwrap_or_else(|_| fallback_dir.clone())
                .join("bookmarks.json");
            let store = BookmarkStore::open(store_path.clone()).unwrap_or_else(|e| {
                diag::log_error("startup", &format!("bookmark store open failed: {}", e));
                BookmarkStore::empty(store_path)
            });
            app.manage(StoreState {
                store: Mutex::new(store),
            });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            report_active_tab,
            popup_init,
            popup_submit,
            popup_values_changed,
            popup_delete,
            folder_picker_data,
            tag_options,
            bookmark_search,
            bookmark_list,
            open_bookmark,
            i18n_text,
            set_language,
            diag::read_diag_log,
            diag::clear_diag_log
        ])
        .run(tauri::generate_context!())
        .unwrap_or_else(|e| {
            diag::log_error("startup", &format!("Tauri run() failed: {}", e));
            eprintln!("FATAL: Shiori popup failed to start: {}", e);
        });
}
