use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static LOG_DIR: OnceLock<PathBuf> = OnceLock::new();

const LOG_FILE: &str = "diag.log";
const ROTATE_BYTES: u64 = 1024 * 1024;

/// Initialize the diagnostic log directory and install the panic hook.
/// Must run early in `run()`, before any command can fire.
pub fn init(data_dir: &Path) {
    let log_dir = data_dir.join("logs");
    let _ = fs::create_dir_all(&log_dir);
    LOG_DIR.set(log_dir.clone()).ok();

    rotate(&log_dir);

    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = format_panic(info);
        append(&msg);
        eprintln!("{}", msg);
        prev_hook(info);
    }));
}

pub fn log_error(context: &str, message: &str) {
    write_line("ERROR", context, message);
    eprintln!("[{}] {}", context, message);
}

pub fn log_info(context: &str, message: &str) {
    write_line("INFO ", context, message);
}

fn write_line(level: &str, context: &str, message: &str) {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    append(&format!("[{}] {} [{}] {}", timestamp, level, context, message));
}

fn append(line: &str) {
    if let Some(dir) = LOG_DIR.get() {
        let path = dir.join(LOG_FILE);
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&path) {
            let _ = f.write_all(line.as_bytes());
            let _ = f.write_all(b"\n");
        }
    }
}

fn format_panic(info: &std::panic::PanicHookInfo) -> String {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let location = info
        .location()
        .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
        .unwrap_or_else(|| "unknown".into());
    let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".into()
    };

    format!(
        "[{}] PANIC [{}] {} (thread {:?}, pid {})\nBacktrace:\n{}",
        timestamp,
        location,
        payload,
        std::thread::current().name().unwrap_or("unnamed"),
        std::process::id(),
        std::backtrace::Backtrace::force_capture()
    )
}

// keep the last 3 rotated logs
fn rotate(log_dir: &Path) {
    let live = log_dir.join(LOG_FILE);
    if let Ok(meta) = fs::metadata(&live) {
        if meta.len() > ROTATE_BYTES {
            for i in (1..3).rev() {
                let from = log_dir.join(format!("diag.{}.log", i));
                let to = log_dir.join(format!("diag.{}.log", i + 1));
                let _ = fs::rename(&from, &to);
            }
            let _ = fs::rename(&live, log_dir.join("diag.1.log"));
        }
    }
}

/// Read the diagnostic log for the frontend's troubleshooting view.
#[tauri::command]
pub async fn read_diag_log() -> Result<String, String> {
    let dir = LOG_DIR.get().ok_or("log dir not initialized")?;
    let path = dir.join(LOG_FILE);
    if path.exists() {
        fs::read_to_string(&path).map_err(|e| e.to_string())
    } else {
        Ok(String::new())
    }
}

#[tauri::command]
pub async fn clear_diag_log() -> Result<(), String> {
    let dir = LOG_DIR.get().ok_or("log dir not initialized")?;
    fs::write(dir.join(LOG_FILE), "").map_err(|e| e.to_string())
}
