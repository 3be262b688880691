// Copyright (c) 2026 rezky_nightky

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("failed to read overlay {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("overlay image has no rows")]
    Empty,

    #[error(
        "overlay image is {image_rows}x{image_cols} but the grid is only {grid_rows}x{grid_cols}"
    )]
    TooLarge {
        image_rows: usize,
        image_cols: usize,
        grid_rows: u16,
        grid_cols: u16,
    },
}

/// A picture centred on the grid. Any non-whitespace character in the source
/// text marks a lit cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Overlay {
    rows: u16,
    cols: u16,
    mask: Vec<bool>,
    top_cells: Vec<Option<u16>>,
    pad_top: u16,
    pad_left: u16,
}

impl Overlay {
    pub fn load(path: &Path, rows: u16, cols: u16) -> Result<Self, OverlayError> {
        let text = fs::read_to_string(path).map_err(|source| OverlayError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_text(&text, rows, cols)
    }

    pub fn from_text(text: &str, rows: u16, cols: u16) -> Result<Self, OverlayError> {
        let lines: Vec<Vec<char>> = text.lines().map(|l| l.chars().collect()).collect();
        if lines.is_empty() {
            return Err(OverlayError::Empty);
        }

        let image_rows = lines.len();
        let image_cols = lines.iter().map(Vec::len).max().unwrap_or(0);
        if image_rows > rows as usize || image_cols > cols as usize {
            return Err(OverlayError::TooLarge {
                image_rows,
                image_cols,
                grid_rows: rows,
                grid_cols: cols,
            });
        }

        let pad_top = (rows - image_rows as u16) / 2;
        let pad_left = (cols - image_cols as u16) / 2;

        let mut mask = vec![false; rows as usize * cols as usize];
        let mut top_cells = vec![None; cols as usize];
        for (y, line) in lines.iter().enumerate() {
            let row = pad_top + y as u16;
            for (x, ch) in line.iter().enumerate() {
                if ch.is_whitespace() {
                    continue;
                }
                let col = pad_left + x as u16;
                mask[row as usize * cols as usize + col as usize] = true;
                let top = &mut top_cells[col as usize];
                if top.is_none() {
                    *top = Some(row);
                }
            }
        }

        log::debug!(
            "overlay {}x{} placed at row {} col {} on {}x{} grid",
            image_rows,
            image_cols,
            pad_top,
            pad_left,
            rows,
            cols
        );

        Ok(Self {
            rows,
            cols,
            mask,
            top_cells,
            pad_top,
            pad_left,
        })
    }

    pub fn contains(&self, row: u16, col: u16) -> bool {
        if row >= self.rows || col >= self.cols {
            return false;
        }
        self.mask[row as usize * self.cols as usize + col as usize]
    }

    /// Topmost overlay row of each column, `None` where the column is empty.
    pub fn top_cells(&self) -> &[Option<u16>] {
        &self.top_cells
    }

    pub fn padding(&self) -> (u16, u16) {
        (self.pad_top, self.pad_left)
    }

    pub fn member_count(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }
}
