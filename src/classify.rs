use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use once_cell::sync::Lazy;

/// Number of leading bytes probed when the extension is unknown.
pub const PROBE_BYTES: u64 = 2048;

static TEXT_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "py", "js", "ts", "tsx", "jsx", "json", "md", "txt", "sh", "bash", "yml", "yaml", "toml",
        "ini", "cfg", "conf", "html", "css", "sql", "env", "rs",
    ]
    .into_iter()
    .collect()
});

/// Heuristic text/binary decision for one filesystem entry.
///
/// Directories are never text. Known extensions short-circuit to text;
/// everything else gets a UTF-8 probe of the first [`PROBE_BYTES`] bytes.
/// Any I/O failure counts as non-text; this function never surfaces an
/// error.
#[must_use]
pub fn is_text(path: &Path) -> bool {
    if path.is_dir() {
        return false;
    }

    if has_text_extension(path) {
        return true;
    }

    probe_is_utf8(path)
}

fn has_text_extension(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase)
        .is_some_and(|extension| TEXT_EXTENSIONS.contains(extension.as_str()))
}

fn probe_is_utf8(path: &Path) -> bool {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(_) => return false,
    };

    let mut probe = Vec::new();
    if file.take(PROBE_BYTES).read_to_end(&mut probe).is_err() {
        return false;
    }

    match std::str::from_utf8(&probe) {
        Ok(_) => true,
        // A char cut in half at the probe edge is our truncation, not the
        // file's; mid-file invalid bytes or a file ending mid-char are not.
        Err(error) => error.error_len().is_none() && probe.len() == PROBE_BYTES as usize,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{is_text, PROBE_BYTES};

    #[test]
    fn directories_are_never_text() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        assert!(!is_text(dir.path()));
    }

    #[test]
    fn known_extension_short_circuits_to_text() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("notes.md");
        fs::write(&path, [0xFF, 0xFE, 0x00]).expect("file should be written");

        // Extension wins even over non-UTF-8 content.
        assert!(is_text(&path));
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("README.TXT");
        fs::write(&path, "hello").expect("file should be written");

        assert!(is_text(&path));
    }

    #[test]
    fn unknown_extension_with_utf8_content_is_text() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("LICENSE");
        fs::write(&path, "MIT License\n").expect("file should be written");

        assert!(is_text(&path));
    }

    #[test]
    fn binary_content_is_not_text() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("blob.bin");
        fs::write(&path, [0u8, 159, 146, 150, 255]).expect("file should be written");

        assert!(!is_text(&path));
    }

    #[test]
    fn missing_file_is_not_text() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        assert!(!is_text(&dir.path().join("missing")));
    }

    #[test]
    fn char_split_at_probe_edge_still_counts_as_text() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("data");

        // 2047 ASCII bytes followed by a multi-byte char straddling the
        // probe boundary.
        let mut content = vec![b'a'; PROBE_BYTES as usize - 1];
        content.extend_from_slice("é".as_bytes());
        fs::write(&path, &content).expect("file should be written");

        assert!(is_text(&path));
    }
}
