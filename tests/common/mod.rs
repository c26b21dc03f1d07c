#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use calamine::{Data, Range, Reader, Xlsx, open_workbook};
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Files directly under `dir` (relative to the workspace) with the given extension.
    pub fn files_with_extension(&self, dir: &str, extension: &str) -> Vec<PathBuf> {
        let root = self.temp_dir.path().join(dir);
        let Ok(entries) = fs::read_dir(&root) else {
            return Vec::new();
        };
        let mut found: Vec<PathBuf> = entries
            .map(|entry| entry.expect("dir entry").path())
            .filter(|path| path.extension().is_some_and(|ext| ext == extension))
            .collect();
        found.sort();
        found
    }
}

/// Reads `Sheet1` of a generated workbook.
pub fn read_sheet(path: &Path) -> Range<Data> {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("open workbook");
    workbook
        .worksheet_range("Sheet1")
        .expect("Sheet1 exists")
}

/// Cell value by zero-based worksheet position.
pub fn cell(range: &Range<Data>, row: u32, col: u32) -> Data {
    range.get_value((row, col)).cloned().unwrap_or(Data::Empty)
}

pub const SAMPLE_PAYLOAD: &str = r#"{
    "values": [
        {"name": "Ana", "age": 30, "joined": "2024-03-15", "seen": "2024-03-15 08:30:05", "phone": "11987654321"},
        {"name": "Rui", "age": "41", "joined": "2023-12-01", "seen": "not a date", "phone": 5}
    ],
    "mailaddr": ["ana@example.com", "rui@example.com"]
}"#;
