use std::path::Path;

use crate::error::ValidationError;

/// A file attached to the alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    name: String,
    bytes: Vec<u8>,
    mime_type: String,
}

impl File {
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyFileName);
        }
        let mime_type = guess_mime_type(&name).to_string();
        Ok(Self {
            name,
            bytes,
            mime_type,
        })
    }

    /// Read a file from disk; the attachment is named after the file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ValidationError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_bytes(name, bytes)
    }

    pub(crate) fn csv(name: String, bytes: Vec<u8>) -> Self {
        Self {
            name,
            bytes,
            mime_type: "text/csv".to_string(),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

fn guess_mime_type(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "csv" => "text/csv",
        "txt" | "log" => "text/plain",
        "json" => "application/json",
        "html" | "htm" => "text/html",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_type_from_extension() {
        let f = File::from_bytes("report.PDF", vec![]).unwrap();
        assert_eq!(f.mime_type(), "application/pdf");
        let f = File::from_bytes("dump", vec![1, 2]).unwrap();
        assert_eq!(f.mime_type(), "application/octet-stream");
    }

    #[test]
    fn explicit_mime_type_overrides_guess() {
        let f = File::from_bytes("events.log", b"{}\n".to_vec())
            .unwrap()
            .with_mime_type("application/x-ndjson");
        assert_eq!(f.mime_type(), "application/x-ndjson");
        assert_eq!(f.name(), "events.log");
    }

    #[test]
    fn blank_name_rejected() {
        assert!(matches!(
            File::from_bytes("  ", vec![]),
            Err(ValidationError::EmptyFileName)
        ));
    }

    #[test]
    fn from_path_reads_bytes() {
        let path = std::env::temp_dir().join("alert_core_file_test.txt");
        std::fs::write(&path, b"hello").unwrap();
        let f = File::from_path(&path).unwrap();
        assert_eq!(f.name(), "alert_core_file_test.txt");
        assert_eq!(f.bytes(), b"hello");
        assert_eq!(f.mime_type(), "text/plain");
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn from_missing_path_is_validation_error() {
        let result = File::from_path("/definitely/not/here.bin");
        assert!(matches!(result, Err(ValidationError::Io { .. })));
    }
}
