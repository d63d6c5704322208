//! Read-only status of the canonical data files.
//!
//! Takes no lock and never writes, so it is safe to call while a run is in
//! flight. Readings taken mid-run are provisional: artifacts are deleted at
//! the start of a run and reappear only when their stage finishes.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::fs;

use crate::config::paths::{CanonicalKind, DataLayout};

/// Size and modification time of a present file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMetadata {
    pub size_bytes: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// One canonical file and what was found at its path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStatus {
    #[serde(flatten)]
    pub kind: CanonicalKind,
    pub path: PathBuf,

    /// `None` when the file is absent or the path is not a regular file
    /// (a directory at a canonical path is reported as missing)
    pub metadata: Option<FileMetadata>,
}

impl FileStatus {
    pub fn exists(&self) -> bool {
        self.metadata.is_some()
    }
}

/// Snapshot of all canonical files
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataStatus {
    pub data_dir: PathBuf,
    pub files: Vec<FileStatus>,
}

impl DataStatus {
    pub fn render(&self) -> String {
        let mut lines = vec!["# Data file status".to_string(), String::new()];

        for file in &self.files {
            let label = file.kind.label();
            match &file.metadata {
                Some(meta) => {
                    lines.push(format!("✓ **{}**", label));
                    lines.push(format!("  - Path: {}", file.path.display()));
                    lines.push(format!("  - Size: {}", format_size(meta.size_bytes)));
                    if let Some(modified) = meta.modified {
                        lines.push(format!(
                            "  - Modified: {}",
                            modified.format("%Y-%m-%d %H:%M:%S UTC")
                        ));
                    }
                    lines.push("  - Status: available".to_string());
                }
                None => {
                    lines.push(format!("✗ **{}**", label));
                    lines.push(format!("  - Path: {}", file.path.display()));
                    lines.push("  - Status: missing".to_string());
                }
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }
}

/// Human-readable size: bytes below 1 KiB, then KB, then MB
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    }
}

/// Inspects the canonical files of a data directory
pub struct DataStatusReporter {
    layout: DataLayout,
}

impl DataStatusReporter {
    pub fn new(layout: DataLayout) -> Self {
        Self { layout }
    }

    /// Stat every canonical path
    ///
    /// Only regular files (or symlinks to them) count as present; anything
    /// else at a canonical path, such as a directory, is reported as missing
    /// because the pipeline could not read it as a workbook.
    pub async fn check(&self) -> DataStatus {
        let mut files = Vec::new();

        for (kind, path) in self.layout.canonical_files() {
            let metadata = match fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => Some(FileMetadata {
                    size_bytes: meta.len(),
                    modified: meta.modified().ok().map(DateTime::<Utc>::from),
                }),
                _ => None,
            };
            files.push(FileStatus {
                kind,
                path,
                metadata,
            });
        }

        DataStatus {
            data_dir: self.layout.data_dir().to_path_buf(),
            files,
        }
    }
}
