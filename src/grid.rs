use log::debug;
use serde_json::Value;

use crate::address::{cell_address, parse_cell_address};
use crate::classify::{InferredValue, classify};
use crate::dataset::{Dataset, Row};
use crate::error::{GridError, GridResult};

pub const HEADER_ROW: u32 = 1;
pub const FIRST_DATA_ROW: u32 = 2;
pub const MAX_ROWS: u32 = 1_048_576;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridState {
    Empty,
    Populating,
    Finalized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub column: usize,
    pub row: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub column: usize,
    pub row: u32,
    pub address: String,
    pub value: InferredValue,
}

#[derive(Debug)]
pub struct GridBuilder {
    headers: Vec<Cell>,
    rows: Vec<Vec<Cell>>,
    cursor: Cursor,
    state: GridState,
}

impl Default for GridBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GridBuilder {
    pub fn new() -> Self {
        Self {
            headers: Vec::new(),
            rows: Vec::new(),
            cursor: Cursor {
                column: 0,
                row: FIRST_DATA_ROW,
            },
            state: GridState::Empty,
        }
    }

    pub fn state(&self) -> GridState {
        self.state
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// On error no cell of the row is kept and the cursors are unchanged.
    pub fn push_row(&mut self, row: &Row) -> GridResult<()> {
        let row_idx = self.cursor.row;
        if row_idx > MAX_ROWS {
            return Err(GridError::RowOutOfRange(u64::from(row_idx)));
        }
        let placed = self.place_fields(row, row_idx);
        self.cursor.column = 0;
        let (headers, cells) = placed?;

        debug!("Row {row_idx}: placed {} cell(s)", cells.len());
        self.headers.extend(headers);
        self.rows.push(cells);
        self.cursor.row = row_idx + 1;
        self.state = GridState::Populating;
        Ok(())
    }

    fn place_fields(&mut self, row: &Row, row_idx: u32) -> GridResult<(Vec<Cell>, Vec<Cell>)> {
        let is_first = row_idx == FIRST_DATA_ROW;
        let mut headers = Vec::new();
        let mut cells = Vec::with_capacity(row.len());
        for field in row.fields() {
            let column = self.cursor.column;
            let address = cell_address(column, row_idx)?;
            if is_first {
                headers.push(Cell {
                    column,
                    row: HEADER_ROW,
                    address: cell_address(column, HEADER_ROW)?,
                    value: InferredValue::String(field.label.clone()),
                });
            }
            cells.push(Cell {
                column,
                row: row_idx,
                address,
                value: classify(&field.value),
            });
            self.cursor.column += 1;
        }
        Ok((headers, cells))
    }

    pub fn finalize(self) -> Grid {
        Grid {
            headers: self.headers,
            rows: self.rows,
        }
    }
}

/// A finalized, read-only grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    headers: Vec<Cell>,
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn state(&self) -> GridState {
        GridState::Finalized
    }

    pub fn headers(&self) -> &[Cell] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Header cells followed by data cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.headers.iter().chain(self.rows.iter().flatten())
    }

    pub fn cell(&self, reference: &str) -> Option<&InferredValue> {
        let (column, row) = parse_cell_address(reference).ok()?;
        let cells = if row == HEADER_ROW {
            &self.headers
        } else {
            let idx = row.checked_sub(FIRST_DATA_ROW)? as usize;
            self.rows.get(idx)?
        };
        cells.get(column).map(|cell| &cell.value)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Last worksheet row that holds anything, or 0 for an empty grid.
    pub fn last_row(&self) -> u32 {
        match self.rows.len() {
            0 if self.headers.is_empty() => 0,
            0 => HEADER_ROW,
            n => FIRST_DATA_ROW + n as u32 - 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.iter().all(Vec::is_empty)
    }
}

/// Populate a grid from every row of `dataset`.
pub fn populate(dataset: &Dataset) -> GridResult<Grid> {
    let mut builder = GridBuilder::new();
    for row in dataset.rows() {
        builder.push_row(row)?;
    }
    Ok(builder.finalize())
}

pub fn populate_values(values: &Value) -> GridResult<Grid> {
    populate(&Dataset::from_values(values)?)
}
