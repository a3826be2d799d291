//! Server configuration

use crate::pdf::{MAX_RENDER_WIDTH, VIEWPORT_MARGIN};
use std::path::PathBuf;

/// Environment variable naming the export directory
pub const ENV_DOWNLOAD_DIR: &str = "PDF_FORM_DOWNLOAD_DIR";
/// Environment variable holding a path list of allowed directories
pub const ENV_RESOURCE_DIRS: &str = "PDF_FORM_RESOURCE_DIRS";
/// Environment variable overriding the per-file upload cap
pub const ENV_MAX_UPLOAD_BYTES: &str = "PDF_FORM_MAX_UPLOAD_BYTES";

/// Security and resource configuration for the PDF Form MCP Server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory filled PDFs are written to (default: current directory)
    pub download_dir: PathBuf,
    /// Directories uploads by path and export destinations must stay inside.
    /// Empty means unrestricted.
    pub resource_dirs: Vec<String>,
    /// Maximum size of a single uploaded file (default: 100MB)
    pub max_upload_bytes: u64,
    /// Widest page preview in pixels (default: 600)
    pub max_render_width: u32,
    /// Width reserved around the preview (default: 100)
    pub viewport_margin: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("."),
            resource_dirs: Vec::new(),
            max_upload_bytes: 100 * 1024 * 1024, // 100MB
            max_render_width: MAX_RENDER_WIDTH,
            viewport_margin: VIEWPORT_MARGIN,
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `PDF_FORM_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup(ENV_DOWNLOAD_DIR).filter(|d| !d.trim().is_empty()) {
            config.download_dir = PathBuf::from(dir);
        }

        if let Some(dirs) = lookup(ENV_RESOURCE_DIRS) {
            config.resource_dirs = std::env::split_paths(&dirs)
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.to_string_lossy().into_owned())
                .collect();
        }

        if let Some(raw) = lookup(ENV_MAX_UPLOAD_BYTES) {
            match raw.trim().parse::<u64>() {
                Ok(bytes) if bytes > 0 => config.max_upload_bytes = bytes,
                _ => tracing::warn!(
                    value = %raw,
                    default = config.max_upload_bytes,
                    "Invalid {}, using default",
                    ENV_MAX_UPLOAD_BYTES
                ),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config.download_dir, PathBuf::from("."));
        assert!(config.resource_dirs.is_empty());
        assert_eq!(config.max_upload_bytes, 100 * 1024 * 1024);
        assert_eq!(config.max_render_width, 600);
        assert_eq!(config.viewport_margin, 100);
    }

    #[test]
    fn test_env_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            (ENV_DOWNLOAD_DIR, "/tmp/out"),
            (ENV_RESOURCE_DIRS, "/data/a:/data/b"),
            (ENV_MAX_UPLOAD_BYTES, "2048"),
        ]));
        assert_eq!(config.download_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.resource_dirs, vec!["/data/a", "/data/b"]);
        assert_eq!(config.max_upload_bytes, 2048);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = ServerConfig::from_lookup(lookup(&[
            (ENV_DOWNLOAD_DIR, "  "),
            (ENV_MAX_UPLOAD_BYTES, "lots"),
        ]));
        assert_eq!(config.download_dir, PathBuf::from("."));
        assert_eq!(config.max_upload_bytes, 100 * 1024 * 1024);

        let config = ServerConfig::from_lookup(lookup(&[(ENV_MAX_UPLOAD_BYTES, "0")]));
        assert_eq!(config.max_upload_bytes, 100 * 1024 * 1024);
    }
}
