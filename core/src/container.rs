//! ZIP container handling for spreadsheet packages.
//!
//! Wraps a ZIP archive and validates that it is an Office Open XML package
//! (`[Content_Types].xml` present), with limits on entry counts and
//! uncompressed sizes so a hostile file cannot exhaust memory.

use std::io::{Read, Seek};
use thiserror::Error;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error_codes;

#[derive(Debug, Clone, Copy)]
pub struct ContainerLimits {
    pub max_entries: usize,
    pub max_part_uncompressed_bytes: u64,
    pub max_total_uncompressed_bytes: u64,
}

impl Default for ContainerLimits {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            max_part_uncompressed_bytes: 100 * 1024 * 1024,
            max_total_uncompressed_bytes: 500 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContainerError {
    #[error("[SHRECON_CONTAINER_001] I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("[SHRECON_CONTAINER_002] not a ZIP container")]
    NotZipContainer,
    #[error("[SHRECON_CONTAINER_003] not a spreadsheet package (missing [Content_Types].xml)")]
    NotPackage,
    #[error("[SHRECON_CONTAINER_004] archive has too many entries: {entries} (limit: {max_entries})")]
    TooManyEntries { entries: usize, max_entries: usize },
    #[error("[SHRECON_CONTAINER_005] part '{path}' is too large: {size} bytes (limit: {limit} bytes)")]
    PartTooLarge { path: String, size: u64, limit: u64 },
    #[error("[SHRECON_CONTAINER_006] total uncompressed size exceeds limit: would exceed {limit} bytes")]
    TotalTooLarge { limit: u64 },
    #[error("[SHRECON_CONTAINER_007] failed to read archive entry '{path}': {reason}")]
    PartRead { path: String, reason: String },
    #[error("[SHRECON_CONTAINER_007] part not found in archive: {path}")]
    PartNotFound { path: String },
}

impl ContainerError {
    pub fn code(&self) -> &'static str {
        match self {
            ContainerError::Io(_) => error_codes::CONTAINER_IO,
            ContainerError::NotZipContainer => error_codes::CONTAINER_NOT_ZIP,
            ContainerError::NotPackage => error_codes::CONTAINER_NOT_OPC,
            ContainerError::TooManyEntries { .. } => error_codes::CONTAINER_TOO_MANY_ENTRIES,
            ContainerError::PartTooLarge { .. } => error_codes::CONTAINER_PART_TOO_LARGE,
            ContainerError::TotalTooLarge { .. } => error_codes::CONTAINER_TOTAL_TOO_LARGE,
            ContainerError::PartRead { .. } | ContainerError::PartNotFound { .. } => {
                error_codes::CONTAINER_READ
            }
        }
    }
}

trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

/// A validated spreadsheet package opened for reading.
pub struct PackageContainer {
    archive: ZipArchive<Box<dyn ReadSeek>>,
    limits: ContainerLimits,
    total_read: u64,
}

impl PackageContainer {
    pub fn open_from_reader<R: Read + Seek + 'static>(
        reader: R,
    ) -> Result<PackageContainer, ContainerError> {
        Self::open_from_reader_with_limits(reader, ContainerLimits::default())
    }

    pub fn open_from_reader_with_limits<R: Read + Seek + 'static>(
        reader: R,
        limits: ContainerLimits,
    ) -> Result<PackageContainer, ContainerError> {
        let reader: Box<dyn ReadSeek> = Box::new(reader);
        let archive = ZipArchive::new(reader).map_err(|err| match err {
            ZipError::InvalidArchive(_) | ZipError::UnsupportedArchive(_) => {
                ContainerError::NotZipContainer
            }
            ZipError::Io(e) => ContainerError::Io(e),
            other => ContainerError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                other.to_string(),
            )),
        })?;

        if archive.len() > limits.max_entries {
            return Err(ContainerError::TooManyEntries {
                entries: archive.len(),
                max_entries: limits.max_entries,
            });
        }

        let mut container = PackageContainer {
            archive,
            limits,
            total_read: 0,
        };

        if container.archive.by_name("[Content_Types].xml").is_err() {
            return Err(ContainerError::NotPackage);
        }

        Ok(container)
    }

    pub fn open_from_path(
        path: impl AsRef<std::path::Path>,
    ) -> Result<PackageContainer, ContainerError> {
        let file = std::fs::File::open(path)?;
        Self::open_from_reader(file)
    }

    /// Read one archive part, enforcing the per-part and cumulative limits.
    pub fn read_part(&mut self, name: &str) -> Result<Vec<u8>, ContainerError> {
        let size = {
            let part = self.archive.by_name(name).map_err(|e| match e {
                ZipError::FileNotFound => ContainerError::PartNotFound {
                    path: name.to_string(),
                },
                other => ContainerError::PartRead {
                    path: name.to_string(),
                    reason: other.to_string(),
                },
            })?;
            part.size()
        };

        if size > self.limits.max_part_uncompressed_bytes {
            return Err(ContainerError::PartTooLarge {
                path: name.to_string(),
                size,
                limit: self.limits.max_part_uncompressed_bytes,
            });
        }

        let new_total = self.total_read.saturating_add(size);
        if new_total > self.limits.max_total_uncompressed_bytes {
            return Err(ContainerError::TotalTooLarge {
                limit: self.limits.max_total_uncompressed_bytes,
            });
        }

        let mut part = self
            .archive
            .by_name(name)
            .map_err(|e| ContainerError::PartRead {
                path: name.to_string(),
                reason: e.to_string(),
            })?;

        let mut buf = Vec::new();
        part.read_to_end(&mut buf)
            .map_err(|e| ContainerError::PartRead {
                path: name.to_string(),
                reason: e.to_string(),
            })?;

        self.total_read = new_total;
        Ok(buf)
    }

    /// Like [`read_part`](Self::read_part) but absence is not an error.
    pub fn read_part_optional(&mut self, name: &str) -> Result<Option<Vec<u8>>, ContainerError> {
        match self.read_part(name) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(ContainerError::PartNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn limits(&self) -> &ContainerLimits {
        &self.limits
    }
}
