use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Caredesk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the application data directory
/// ~/Caredesk/ on all platforms (user-visible)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Caredesk")
}

/// Path of the SQLite database file
pub fn db_path() -> PathBuf {
    app_data_dir().join("caredesk.db")
}

/// Default tracing filter when RUST_LOG is unset
pub fn default_log_filter() -> String {
    "caredesk=info".to_string()
}

/// Address the API binds to. `CAREDESK_ADDR` overrides the default
/// loopback address.
pub fn bind_addr() -> SocketAddr {
    std::env::var("CAREDESK_ADDR")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8470)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("Caredesk"));
    }

    #[test]
    fn db_path_under_app_data() {
        let path = db_path();
        assert!(path.starts_with(app_data_dir()));
        assert!(path.ends_with("caredesk.db"));
    }

    #[test]
    fn app_name_is_caredesk() {
        assert_eq!(APP_NAME, "Caredesk");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.3.0");
    }

    #[test]
    fn default_bind_addr_is_loopback() {
        assert!(bind_addr().ip().is_loopback());
    }
}
