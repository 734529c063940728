//! Rakestone entry point.
//!
//! Usage: `rakestone [CONFIG.json] [SCRIPT.json]`. Without a script the
//! built-in demo session runs.

use rakestone_app::{AppConfig, AppError, Script, Session};

fn main() {
    env_logger::init();
    log::info!("Starting Rakestone");

    if let Err(e) = run() {
        log::error!("{}", e);
        eprintln!("rakestone: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let script = match args.next() {
        Some(path) => Script::load(path)?,
        None => Script::demo(),
    };

    let mut session = Session::new(config)?;
    session.run(&script)?;
    let report = session.report()?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
