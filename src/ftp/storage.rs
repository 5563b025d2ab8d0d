//! Filename handling for received transfers: only the basename survives,
//! joined with the configured download directory, so a malicious or
//! malformed `START` payload can't escape it with `../` or an absolute path.

use std::path::{Path, PathBuf};

pub fn sanitize_filename(name: &str) -> String {
    Path::new(name)
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unnamed".to_string())
}

pub fn resolve_download_path(download_dir: &Path, filename: &str) -> PathBuf {
    download_dir.join(sanitize_filename(filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_directory_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("/abs/path/flight.log"), "flight.log");
        assert_eq!(sanitize_filename("plain.bin"), "plain.bin");
    }

    #[test]
    fn resolves_under_the_download_directory() {
        let dir = Path::new("/downloads");
        assert_eq!(
            resolve_download_path(dir, "../secret"),
            PathBuf::from("/downloads/secret")
        );
    }
}
