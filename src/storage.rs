use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;

pub const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// Where menu item images end up. The catalog only tracks filenames; the
/// bytes live behind this interface.
pub trait BlobStore: Send + Sync {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<()>;
    fn remove(&self, filename: &str) -> Result<()>;
}

pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Timestamp-prefixed name so concurrent uploads of the same file never
/// overwrite each other.
pub fn unique_filename(original: &str) -> String {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    format!("{timestamp}_{}", sanitize(original))
}

fn sanitize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect()
}

pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("creating upload directory {}", root.display()))?;
        Ok(Self { root })
    }
}

impl BlobStore for FsImageStore {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<()> {
        let path = self.root.join(filename);
        fs::write(&path, bytes).with_context(|| format!("writing image {}", path.display()))?;
        Ok(())
    }

    fn remove(&self, filename: &str) -> Result<()> {
        let path = self.root.join(filename);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            // Already gone is fine; the row no longer references it.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("removing image {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn extension_allowlist() {
        assert!(allowed_file("tajine.jpg"));
        assert!(allowed_file("couscous.WEBP"));
        assert!(allowed_file("photo.final.png"));
        assert!(!allowed_file("menu.pdf"));
        assert!(!allowed_file("noextension"));
    }

    #[test]
    fn unique_filename_is_prefixed_and_sanitized() {
        let name = unique_filename("my photo (1).jpg");
        let (prefix, rest) = name.split_at(16);
        assert_eq!(&prefix[8..9], "_");
        assert!(prefix[..8].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(rest, "myphoto1.jpg");
    }

    #[test]
    fn fs_store_saves_and_removes() {
        let dir = std::env::temp_dir().join(format!("images-{}", Uuid::new_v4()));
        let store = FsImageStore::new(&dir).unwrap();

        store.save("test.png", b"png bytes").unwrap();
        assert!(dir.join("test.png").exists());

        store.remove("test.png").unwrap();
        assert!(!dir.join("test.png").exists());

        // Removing a missing file is not an error.
        store.remove("test.png").unwrap();

        fs::remove_dir_all(&dir).ok();
    }
}
