//! A local library of sample assets (garment sprites, style references).

use std::{collections::BTreeMap, fs, io, path::Path};

use anyhow::Context;

use crate::image::Image;

const EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Decoded images, keyed by file stem.
#[derive(Debug, Default, Clone)]
pub struct AssetLibrary {
    images: BTreeMap<String, Image>,
}

impl AssetLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every PNG and JPEG image in `dir` (non-recursively).
    ///
    /// Empty and undecodable files are skipped with a warning. A missing directory yields an
    /// empty library. Other I/O errors are returned.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> anyhow::Result<Self> {
        let dir = dir.as_ref();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("asset directory '{}' does not exist", dir.display());
                return Ok(Self::new());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read '{}'", dir.display()))
            }
        };

        let mut lib = Self::new();
        for entry in entries {
            let path = entry?.path();
            let is_image = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map_or(false, |ext| {
                    EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext))
                });
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if !is_image || !path.is_file() {
                continue;
            }

            let data = fs::read(&path)
                .with_context(|| format!("failed to read '{}'", path.display()))?;
            if data.is_empty() {
                log::warn!("skipping empty asset '{}'", path.display());
                continue;
            }
            match Image::decode(&data) {
                Ok(image) => {
                    log::trace!("loaded asset '{stem}' ({:?})", image);
                    lib.insert(stem, image);
                }
                Err(e) => log::warn!("skipping asset '{}': {e:#}", path.display()),
            }
        }

        log::debug!("loaded {} assets from '{}'", lib.len(), dir.display());
        Ok(lib)
    }

    pub fn insert(&mut self, name: impl Into<String>, image: Image) {
        self.images.insert(name.into(), image);
    }

    pub fn get(&self, name: &str) -> Option<&Image> {
        self.images.get(name)
    }

    /// Asset names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.images.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::image::{Color, Resolution};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("makeover-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_dir_is_empty() {
        let lib = AssetLibrary::load_dir("/this/does/not/exist").unwrap();
        assert!(lib.is_empty());
    }

    #[test]
    fn loads_images_by_stem() {
        let dir = scratch_dir("assets");
        let shirt = Image::filled(Resolution::new(3, 2), Color::BLUE);
        shirt.save(dir.join("shirt.png")).unwrap();
        fs::write(dir.join("dress.JPG"), shirt.encode_png().unwrap()).unwrap();
        fs::write(dir.join("empty.png"), b"").unwrap();
        fs::write(dir.join("broken.jpeg"), b"not an image").unwrap();
        fs::write(dir.join("notes.txt"), b"hello").unwrap();

        let lib = AssetLibrary::load_dir(&dir).unwrap();
        assert_eq!(lib.names().collect::<Vec<_>>(), ["dress", "shirt"]);
        assert_eq!(lib.get("shirt"), Some(&shirt));
        assert_eq!(lib.get("dress").map(Image::resolution), Some(shirt.resolution()));
        assert!(lib.get("empty").is_none());

        fs::remove_dir_all(&dir).unwrap();
    }
}
