use chrono::Local;
use std::path::PathBuf;
use std::sync::Once;

static INIT: Once = Once::new();

/// Installs the global logger. Later calls are no-ops.
pub fn init_logging(app_name: &str) -> Result<(), String> {
    let mut init_result: Result<(), String> = Ok(());
    INIT.call_once(|| {
        if let Err(err) = init_logging_inner(app_name) {
            init_result = Err(err);
        }
    });
    init_result
}

fn level_from_env() -> log::LevelFilter {
    std::env::var("IBAN_TESTGEN_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
        .and_then(|level| level.trim().parse::<log::LevelFilter>().ok())
        .unwrap_or(log::LevelFilter::Info)
}

fn log_dir_from(value: Option<&str>) -> Option<PathBuf> {
    match value.map(str::trim) {
        Some("off") | Some("none") | Some("") | None => None,
        Some(path) => Some(PathBuf::from(path)),
    }
}

fn init_logging_inner(app_name: &str) -> Result<(), String> {
    let level = level_from_env();
    let log_dir = log_dir_from(std::env::var("IBAN_TESTGEN_LOG_DIR").ok().as_deref());

    // stdout carries generated IBANs and export documents
    let mut dispatch = fern::Dispatch::new()
        .level(level)
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} | {:<5} | {} | {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .chain(std::io::stderr());

    if let Some(dir) = log_dir {
        std::fs::create_dir_all(&dir).map_err(|err| err.to_string())?;
        let date = Local::now().format("%Y_%m_%d");
        let file_path = dir.join(format!("{app_name}-{date}.log"));
        dispatch = dispatch.chain(fern::log_file(file_path).map_err(|err| err.to_string())?);
    }

    dispatch.apply().map_err(|err| err.to_string())
}
