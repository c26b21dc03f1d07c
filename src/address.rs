//! Spreadsheet-style cell addressing.
//!
//! Columns `0..=25` map to `A..=Z`. From column 26 onward addresses use two
//! letters: the second letter cycles with `index % 26` and the first letter is
//! the block prefix `(index - 26) / 26`, so `AA` starts at 26 and the prefix
//! only moves to `B` at 52. Three-letter addresses are not supported; the last
//! addressable column is `ZZ` (index 701).

use crate::error::{GridError, GridResult};

pub const BLOCK_WIDTH: usize = 26;
/// Highest column index that still fits in a two-letter address (`ZZ`).
pub const MAX_COLUMN_INDEX: usize = BLOCK_WIDTH + BLOCK_WIDTH * BLOCK_WIDTH - 1;

fn letter(position: usize) -> char {
    debug_assert!(position < BLOCK_WIDTH);
    (b'A' + position as u8) as char
}

/// Position of the block-prefix letter for `index`, or `None` while the
/// single-letter range is still in use.
pub fn block_prefix(index: usize) -> Option<usize> {
    if index < BLOCK_WIDTH {
        None
    } else {
        Some((index - BLOCK_WIDTH) / BLOCK_WIDTH)
    }
}

pub fn column_address(index: usize) -> GridResult<String> {
    if index > MAX_COLUMN_INDEX {
        return Err(GridError::ColumnOutOfRange(index));
    }
    let mut address = String::with_capacity(2);
    if let Some(prefix) = block_prefix(index) {
        address.push(letter(prefix));
    }
    address.push(letter(index % BLOCK_WIDTH));
    Ok(address)
}

/// Encode a zero-based column and a 1-based row, e.g. `(1, 2)` → `B2`.
pub fn cell_address(column: usize, row: u32) -> GridResult<String> {
    if row == 0 {
        return Err(GridError::RowOutOfRange(0));
    }
    let mut address = column_address(column)?;
    address.push_str(&row.to_string());
    Ok(address)
}

pub fn column_index(letters: &str) -> GridResult<usize> {
    let invalid = || GridError::InvalidReference(letters.to_string());
    let positions = letters
        .chars()
        .map(|c| {
            let upper = c.to_ascii_uppercase();
            if upper.is_ascii_uppercase() {
                Ok(upper as usize - 'A' as usize)
            } else {
                Err(invalid())
            }
        })
        .collect::<GridResult<Vec<_>>>()?;
    match positions.as_slice() {
        [single] => Ok(*single),
        [prefix, last] => Ok(BLOCK_WIDTH + prefix * BLOCK_WIDTH + last),
        _ => Err(invalid()),
    }
}

/// Split a reference such as `AB12` into `(column index, row)`.
pub fn parse_cell_address(reference: &str) -> GridResult<(usize, u32)> {
    let invalid = || GridError::InvalidReference(reference.to_string());
    let trimmed = reference.trim();
    let split = trimmed
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(invalid)?;
    let (letters, digits) = trimmed.split_at(split);
    if letters.is_empty() {
        return Err(invalid());
    }
    let column = column_index(letters).map_err(|_| invalid())?;
    let row: u32 = digits.parse().map_err(|_| invalid())?;
    if row == 0 {
        return Err(invalid());
    }
    Ok((column, row))
}
