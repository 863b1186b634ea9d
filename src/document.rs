use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::debug;

use crate::favorites::Favorites;
use crate::grid::{Matrix, PaletteGrid, Row, MAX_COLS, MAX_HUE, MAX_ROWS, MIN_COLS};

/// Application identifier written to the `[meta]` section.
pub const APP_ID: &str = "huedeck";

/// One variant per import validation step. Parsing never touches live
/// state, so any of these leaves the caller's grid and favorites untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("missing `[{0}]` section")]
    MissingSection(&'static str),
    #[error("missing `{key}` under `[inputs]`")]
    MissingKey { key: String },
    #[error("`{key}` must be an integer")]
    InvalidInt { key: String },
    #[error("`{key}` is {value}, expected {min}..={max}")]
    OutOfRange {
        key: String,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("missing hex list for `row{row}`")]
    MissingHexRow { row: usize },
    #[error("hex list for `row{row}` has {found} entries, expected {expected}")]
    HexRowShape {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("hex list for `row{row}` contains malformed entry `{token}`")]
    HexRowToken { row: usize, token: String },
    #[error("`[palette]` contains malformed entry `{token}`")]
    PaletteToken { token: String },
}

/// A complete serializable snapshot of the designer state.
///
/// Round-trip contract: `Document::parse(doc.serialize())` reproduces `doc`
/// for every valid document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub cols: u16,
    pub hue: u16,
    pub rows: Vec<Row>,
    /// Uppercase `#RRGGBB`-shaped entries in file order; deduplicated
    /// case-insensitively when applied.
    pub favorites: Vec<String>,
}

impl Document {
    /// Capture the current grid configuration, rows and favorites.
    pub fn snapshot(grid: &PaletteGrid, favorites: &Favorites) -> Self {
        Self {
            cols: grid.cols(),
            hue: grid.hue(),
            rows: grid.rows().to_vec(),
            favorites: favorites.list().to_vec(),
        }
    }

    /// Replace the live state wholesale. The matrix is derived from the
    /// imported inputs afterwards; the persisted `[hex]` section is never
    /// read back into cells.
    pub fn apply(self, grid: &mut PaletteGrid, favorites: &mut Favorites) {
        grid.set_cols(i64::from(self.cols));
        grid.set_hue(i64::from(self.hue));
        grid.replace_rows(self.rows);
        favorites.replace_all(self.favorites);
    }

    /// Serialize to the INI schema.
    ///
    /// `[inputs]` carries the generating parameters; adjustable rows are
    /// numbered from 2 because row 1 is the fixed header row. `[hex]`
    /// persists the rendered matrix redundantly next to the inputs that
    /// generate it; import only ever checks its shape.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        out.push_str("[meta]\n");
        out.push_str(&format!("app = {}\n", APP_ID));
        out.push_str(&format!("version = {}\n\n", env!("CARGO_PKG_VERSION")));

        out.push_str("[inputs]\n");
        out.push_str(&format!("cols = {}\n", self.cols));
        out.push_str(&format!("h = {}\n", self.hue));
        out.push_str(&format!("rows_count = {}\n", self.rows.len()));
        for (i, row) in self.rows.iter().enumerate() {
            out.push_str(&format!("row{}_s = {}\n", i + 2, row.saturation));
            out.push_str(&format!("row{}_v = {}\n", i + 2, row.value));
        }
        out.push('\n');

        out.push_str("[hex]\n");
        let matrix = Matrix::compute(self.cols, self.hue, &self.rows);
        for r in 0..matrix.row_count() {
            let line: Vec<String> = matrix.row(r).iter().map(|c| c.to_hex_upper()).collect();
            out.push_str(&format!("row{} = {}\n", r + 1, line.join(" ")));
        }
        out.push('\n');

        out.push_str("[palette]\n");
        out.push_str(&format!("colors = {}\n", self.favorites.join(" ")));
        out
    }

    /// Parse and validate a serialized document.
    ///
    /// Validation runs in the documented order and stops at the first
    /// failure; a malformed `[palette]` rejects the whole import even
    /// though every earlier step already passed.
    pub fn parse(text: &str) -> Result<Self, ImportError> {
        let sections = parse_sections(text);
        let inputs = sections
            .get("inputs")
            .ok_or(ImportError::MissingSection("inputs"))?;
        let hex = sections
            .get("hex")
            .ok_or(ImportError::MissingSection("hex"))?;

        let cols = require_int(inputs, "cols")?;
        let hue = require_int(inputs, "h")?;
        let rows_count = require_int(inputs, "rows_count")?;
        let cols = check_range(cols, "cols", i64::from(MIN_COLS), i64::from(MAX_COLS))? as u16;
        let hue = check_range(hue, "h", 0, i64::from(MAX_HUE))? as u16;
        let rows_count = check_range(rows_count, "rows_count", 0, MAX_ROWS as i64)? as usize;

        let mut rows = Vec::with_capacity(rows_count);
        for i in 2..rows_count + 2 {
            let s_key = format!("row{i}_s");
            let v_key = format!("row{i}_v");
            let s = check_range(require_int(inputs, &s_key)?, &s_key, 0, 100)?;
            let v = check_range(require_int(inputs, &v_key)?, &v_key, 0, 100)?;
            rows.push(Row::new(s as i32, v as i32));
        }

        for r in 1..=rows_count + 1 {
            let line = hex
                .get(&format!("row{r}"))
                .ok_or(ImportError::MissingHexRow { row: r })?;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != cols as usize {
                return Err(ImportError::HexRowShape {
                    row: r,
                    expected: cols as usize,
                    found: tokens.len(),
                });
            }
            for token in tokens {
                if !hex_shaped(token) {
                    return Err(ImportError::HexRowToken {
                        row: r,
                        token: token.to_string(),
                    });
                }
            }
        }

        let favorites = match sections.get("palette").and_then(|s| s.get("colors")) {
            Some(raw) => {
                let mut list = Vec::new();
                for token in raw.split_whitespace() {
                    if !hex_shaped(token) {
                        return Err(ImportError::PaletteToken {
                            token: token.to_string(),
                        });
                    }
                    list.push(token.to_ascii_uppercase());
                }
                list
            }
            None => Vec::new(),
        };

        Ok(Self {
            cols,
            hue,
            rows,
            favorites,
        })
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;
        let doc = Self::parse(&text)
            .with_context(|| format!("invalid configuration in {}", path.display()))?;
        debug!(
            cols = doc.cols,
            hue = doc.hue,
            rows = doc.rows.len(),
            favorites = doc.favorites.len(),
            "loaded configuration"
        );
        Ok(doc)
    }

    /// Write the serialized document to a file. State is never mutated by
    /// an export, failed or not.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.serialize())
            .with_context(|| format!("failed to write configuration to {}", path.display()))?;
        debug!(path = %path.display(), "wrote configuration");
        Ok(())
    }
}

/// Shape check only: 7 characters starting with `#`. Hex-digit validity of
/// the remaining six is deliberately not enforced, so every token the
/// validator accepts survives a round trip unchanged.
fn hex_shaped(token: &str) -> bool {
    token.len() == 7 && token.starts_with('#')
}

fn require_int(section: &HashMap<String, String>, key: &str) -> Result<i64, ImportError> {
    let raw = section.get(key).ok_or_else(|| ImportError::MissingKey {
        key: key.to_string(),
    })?;
    raw.trim().parse().map_err(|_| ImportError::InvalidInt {
        key: key.to_string(),
    })
}

fn check_range(value: i64, key: &str, min: i64, max: i64) -> Result<i64, ImportError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ImportError::OutOfRange {
            key: key.to_string(),
            value,
            min,
            max,
        })
    }
}

/// Minimal INI reader: `[section]` headers, `key = value` pairs, `;`/`#`
/// full-line comments. Section and key names are lowercased; unknown lines
/// are ignored. Values keep `#` intact because hex lists live there.
fn parse_sections(text: &str) -> HashMap<String, HashMap<String, String>> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current: Option<String> = None;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            let name = line[1..line.len() - 1].trim().to_ascii_lowercase();
            sections.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }
        if let (Some(section), Some(eq)) = (&current, line.find('=')) {
            let key = line[..eq].trim().to_ascii_lowercase();
            let value = line[eq + 1..].trim().to_string();
            if let Some(entries) = sections.get_mut(section) {
                entries.insert(key, value);
            }
        }
    }
    sections
}
