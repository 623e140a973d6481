//! On-disk storage for uploads and annotated results.
//!
//! Uploads are kept under their sanitized client file name; results are
//! written as `{uuid}.png` so concurrent analyses never collide.

use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};
use sl_core::config::StorageConfig;
use sl_core::Result;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

/// File extensions accepted by `POST /upload`.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Lower-cased text after the last `.`, if there is a `.` at all.
pub fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Whether `filename` carries one of the [`ALLOWED_EXTENSIONS`].
pub fn allowed_file(filename: &str) -> bool {
    extension(filename).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Reduce a client-supplied file name to something safe to join onto a
/// directory.
///
/// The name is NFKD-normalized so accented letters keep their base letter.
/// Path separators become word breaks, runs of whitespace become `_`, and
/// anything outside `[A-Za-z0-9._-]` is dropped. Leading and trailing `.`
/// and `_` are trimmed so the result can never be `..` or a dotfile. If
/// nothing survives, a random name is generated that keeps the original
/// extension.
pub fn secure_filename(filename: &str) -> String {
    let spaced: String = filename
        .nfkd()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    let stem = Uuid::new_v4().simple().to_string();
    match extension(filename).filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str())) {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem,
    }
}

/// A name that can be looked up directly inside a storage directory.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// Filesystem layout for uploads and results.
#[derive(Debug, Clone)]
pub struct FileStore {
    upload_dir: PathBuf,
    result_dir: PathBuf,
}

impl FileStore {
    pub fn new(upload_dir: impl Into<PathBuf>, result_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            result_dir: result_dir.into(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.upload_dir.clone(), config.result_dir.clone())
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn result_dir(&self) -> &Path {
        &self.result_dir
    }

    /// Create both directories if they are missing.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.upload_dir, &self.result_dir] {
            if !dir.exists() {
                std::fs::create_dir_all(dir)?;
                tracing::info!("Created storage directory {}", dir.display());
            }
        }
        Ok(())
    }

    /// Write uploaded bytes under an already-sanitized name.
    pub fn save_upload(&self, filename: &str, data: &[u8]) -> Result<PathBuf> {
        let path = self.upload_dir.join(filename);
        std::fs::write(&path, data)?;
        tracing::debug!(bytes = data.len(), "Saved upload to {}", path.display());
        Ok(path)
    }

    /// Encode `image` as PNG under a fresh random name and return that name.
    pub fn save_result(&self, image: &RgbImage) -> Result<String> {
        let filename = format!("{}.png", Uuid::new_v4().simple());
        let path = self.result_dir.join(&filename);
        image.save_with_format(&path, ImageFormat::Png)?;
        tracing::debug!("Saved result to {}", path.display());
        Ok(filename)
    }

    /// Resolve a result file name to its path.
    ///
    /// Names with path separators or parent references resolve to `None`.
    pub fn result_path(&self, filename: &str) -> Option<PathBuf> {
        is_plain_name(filename).then(|| self.result_dir.join(filename))
    }
}

/// Content type for a stored image, by file extension.
pub fn content_type_for(filename: &str) -> &'static str {
    match extension(filename).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
