//! # File I/O Module
//!
//! Settings, quote records and rendered quotations are written with:
//! - **Atomic saves**: Write to `.tmp`, sync, rename to prevent corruption
//! - **Version validation**: Ensure schema compatibility on load
//!
//! ## Example
//!
//! ```rust,no_run
//! use quote_core::file_io::{load_settings, save_settings};
//! use quote_core::settings::QuoteSettings;
//! use std::path::Path;
//!
//! let path = Path::new("wallquote.json");
//! save_settings(&QuoteSettings::default(), path)?;
//! let settings = load_settings(path)?;
//! # Ok::<(), quote_core::errors::QuoteError>(())
//! ```

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{CalcResult, QuoteError};
use crate::export::record::QuoteRecord;
use crate::settings::{QuoteSettings, SCHEMA_VERSION};

/// `<path>.tmp`, next to the target so the rename stays on one filesystem
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write bytes atomically: temp file, fsync, rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> CalcResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        QuoteError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(bytes).map_err(|e| {
        QuoteError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        QuoteError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        QuoteError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

/// Serialize `value` as pretty JSON and write it atomically.
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_atomic(path, json.as_bytes())
}

fn load_json<T: DeserializeOwned>(path: &Path) -> CalcResult<T> {
    let contents = fs::read_to_string(path)
        .map_err(|e| QuoteError::file_error("read", path.display().to_string(), e.to_string()))?;

    serde_json::from_str(&contents).map_err(|e| QuoteError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })
}

pub fn save_settings(settings: &QuoteSettings, path: &Path) -> CalcResult<()> {
    save_json(settings, path)
}

/// Load settings, checking the schema version and the rate card.
pub fn load_settings(path: &Path) -> CalcResult<QuoteSettings> {
    let settings: QuoteSettings = load_json(path)?;
    validate_version(&settings.version)?;
    settings.validate()?;
    Ok(settings)
}

pub fn save_record(record: &QuoteRecord, path: &Path) -> CalcResult<()> {
    save_json(record, path)
}

pub fn load_record(path: &Path) -> CalcResult<QuoteRecord> {
    let record: QuoteRecord = load_json(path)?;
    validate_version(&record.version)?;
    Ok(record)
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || QuoteError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // For 0.x versions a newer minor is a breaking change
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    use crate::pricing::WallType;

    fn temp_path(name: &str) -> PathBuf {
        temp_dir().join(format!("wallquote_test_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_tmp_path_generation() {
        assert_eq!(
            tmp_path_for(Path::new("/data/wallquote.json")),
            Path::new("/data/wallquote.json.tmp")
        );
        assert_eq!(
            tmp_path_for(Path::new("Quote_boundary_01-02-2026.pdf")),
            Path::new("Quote_boundary_01-02-2026.pdf.tmp")
        );
    }

    #[test]
    fn test_settings_roundtrip() {
        let path = temp_path("settings");

        let mut settings = QuoteSettings::default();
        settings.company.phone = "+91 00000 00000".to_string();
        save_settings(&settings, &path).unwrap();

        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded.company, settings.company);
        assert_eq!(loaded.price_table.rate_for(WallType::Exterior).unwrap(), 140.0);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_path("atomic");

        save_settings(&QuoteSettings::default(), &path).unwrap();

        assert!(!tmp_path_for(&path).exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_invalid_rate_card() {
        let path = temp_path("bad_rates");

        let mut settings = QuoteSettings::default();
        settings.shipping.free_radius_km = -1.0;
        save_json(&settings, &path).unwrap();

        assert!(load_settings(&path).is_err());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_settings(Path::new("/nonexistent/wallquote.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_load_invalid_json() {
        let path = temp_path("garbage");
        fs::write(&path, "{ not json").unwrap();

        let err = load_settings(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.0").is_ok());
        assert!(validate_version("0.1.5").is_ok());

        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("dev").is_err());
    }

    #[test]
    fn test_newer_settings_file_rejected() {
        let path = temp_path("newer");

        let settings = QuoteSettings {
            version: "0.9.0".to_string(),
            ..QuoteSettings::default()
        };
        save_json(&settings, &path).unwrap();

        let err = load_settings(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");

        let _ = fs::remove_file(&path);
    }
}
