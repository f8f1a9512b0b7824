use finrag_core::backend::FileSelection;
use finrag_core::error::{FinragError, Result};
use std::path::Path;

/// Reads a file from disk into a [`FileSelection`] ready for upload.
///
/// The display name is the file name; the mime type is guessed from the
/// extension.
pub async fn read_file_selection(path: impl AsRef<Path>) -> Result<FileSelection> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| FinragError::io(format!("Not a file path: {}", path.display())))?
        .to_string();

    let bytes = tokio::fs::read(path).await?;
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    tracing::debug!("[Upload] Read {} ({} bytes, {})", name, bytes.len(), mime_type);
    Ok(FileSelection::new(name, mime_type, bytes))
}
