use dotenv::dotenv;

/// Load `.env` from the working directory. When the server is launched from
/// somewhere else (e.g. a service unit), fall back to the file next to
/// Cargo.toml. Absent files are fine; the config layer has defaults.
pub fn ensure_dotenv() {
    if dotenv().is_ok() {
        return;
    }
    let fallback = concat!(env!("CARGO_MANIFEST_DIR"), "/.env");
    let _ = dotenv::from_filename(fallback);
}
