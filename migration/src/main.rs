use std::{env, fs, path::Path, process};

mod runner;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let db_path = env::var("DATABASE_PATH").unwrap_or_else(|_| "data/attendance.db".into());
    let url = format!("sqlite://{}?mode=rwc", db_path);
    let args: Vec<String> = env::args().collect();

    let outcome = match args.get(1).map(|s| s.as_str()) {
        Some("clean") => remove_db_file(&db_path),
        Some("fresh") => match remove_db_file(&db_path).and_then(|_| create_db_dir(&db_path)) {
            Ok(()) => runner::run_all_migrations(&url).await,
            Err(e) => Err(e),
        },
        _ => match create_db_dir(&db_path) {
            Ok(()) => runner::run_all_migrations(&url).await,
            Err(e) => Err(e),
        },
    };

    if let Err(e) = outcome {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn remove_db_file(path: &str) -> Result<(), String> {
    let db_path = Path::new(path);
    if db_path.exists() {
        fs::remove_file(db_path).map_err(|e| format!("Failed to delete DB file: {e}"))?;
        println!("Deleted DB: {}", db_path.display());
    } else {
        println!("DB file does not exist: {}", db_path.display());
    }
    Ok(())
}

fn create_db_dir(path: &str) -> Result<(), String> {
    match Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| format!("Failed to create DB directory: {e}"))
        }
        _ => Ok(()),
    }
}
