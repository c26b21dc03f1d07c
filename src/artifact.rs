use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use serde_json::Value;
use uuid::Uuid;

use crate::classify::InferredValue;
use crate::error::{GridError, GridResult};
use crate::grid::{Cell, Grid, HEADER_ROW};

pub const SHEET_NAME: &str = "Sheet1";
pub const ARTIFACT_EXTENSION: &str = "xlsx";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactOptions {
    pub bold_header: bool,
    pub autofit: bool,
}

impl Default for ArtifactOptions {
    fn default() -> Self {
        Self {
            bold_header: true,
            autofit: true,
        }
    }
}

/// The file is not removed on drop; the request owner decides when it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    path: PathBuf,
}

impl Artifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn remove(self) -> GridResult<()> {
        fs::remove_file(&self.path).map_err(|source| GridError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Fresh `<uuid>.xlsx` name; unique across concurrent requests.
pub fn unique_file_name() -> String {
    format!("{}.{ARTIFACT_EXTENSION}", Uuid::new_v4())
}

/// Write `grid` into a uniquely named workbook under `dir`.
pub fn write_artifact(grid: &Grid, dir: &Path, options: &ArtifactOptions) -> GridResult<Artifact> {
    fs::create_dir_all(dir).map_err(|source| GridError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(unique_file_name());
    write_workbook(grid, &path, options)?;
    info!(
        "Wrote {} data row(s) across {} column(s) to {:?}",
        grid.row_count(),
        grid.column_count(),
        path
    );
    Ok(Artifact { path })
}

/// A failed save never leaves a partial file behind.
pub fn write_workbook(grid: &Grid, path: &Path, options: &ArtifactOptions) -> GridResult<()> {
    let result = build_and_save(grid, path, options);
    if result.is_err() && path.exists() {
        if let Err(err) = fs::remove_file(path) {
            warn!("Could not remove partial workbook {path:?}: {err}");
        }
    }
    result
}

fn build_and_save(grid: &Grid, path: &Path, options: &ArtifactOptions) -> GridResult<()> {
    let mut workbook = Workbook::new();
    let header_format = if options.bold_header {
        Format::new().set_bold()
    } else {
        Format::new()
    };
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;
    for cell in grid.cells() {
        if cell.row == HEADER_ROW {
            write_header_cell(worksheet, cell, &header_format)?;
        } else {
            write_cell(worksheet, cell)?;
        }
    }
    if options.autofit {
        worksheet.autofit();
    }
    workbook.save(path)?;
    Ok(())
}

fn write_header_cell(worksheet: &mut Worksheet, cell: &Cell, format: &Format) -> GridResult<()> {
    let (row, col) = worksheet_position(cell)?;
    worksheet.write_string_with_format(row, col, cell.value.as_display(), format)?;
    Ok(())
}

fn write_cell(worksheet: &mut Worksheet, cell: &Cell) -> GridResult<()> {
    let (row, col) = worksheet_position(cell)?;
    match &cell.value {
        InferredValue::Number(n) => {
            worksheet.write_number(row, col, *n)?;
        }
        InferredValue::DateTime(text) | InferredValue::Date(text) | InferredValue::String(text) => {
            worksheet.write_string(row, col, text)?;
        }
        InferredValue::Raw(Value::Null) => {}
        InferredValue::Raw(Value::Bool(flag)) => {
            worksheet.write_boolean(row, col, *flag)?;
        }
        InferredValue::Raw(other) => {
            worksheet.write_string(row, col, other.to_string())?;
        }
    }
    Ok(())
}

fn worksheet_position(cell: &Cell) -> GridResult<(u32, u16)> {
    let col = u16::try_from(cell.column).map_err(|_| GridError::ColumnOutOfRange(cell.column))?;
    Ok((cell.row - 1, col))
}
