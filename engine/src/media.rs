use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use crate::TaskResult;

/// Prefix of the stdout line that tells a calling process where the produced file is.
pub const MEDIA_MARKER: &str = "MEDIA: ";

/// Writes `data` to `path` in one go and announces it on `out`.
///
/// Prints a human-readable line followed by the marker line with the absolute path.
pub fn save_media(
    out: &mut impl Write,
    label: &str,
    path: &Path,
    data: &[u8],
) -> TaskResult<PathBuf> {
    fs::write(path, data)?;
    let abs = std::path::absolute(path)?;

    writeln!(out, "{label} saved to {}", path.display())?;
    writeln!(out, "{MEDIA_MARKER}{}", abs.display())?;
    Ok(abs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_bytes_and_marker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cat.png");
        let mut out = Vec::new();

        let abs = save_media(&mut out, "Image", &path, b"\x89PNG\r\n").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"\x89PNG\r\n");
        assert!(abs.is_absolute());
        let out = String::from_utf8(out).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], format!("Image saved to {}", path.display()));
        assert_eq!(lines[1], format!("MEDIA: {}", abs.display()));
    }
}
