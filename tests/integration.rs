use std::path::PathBuf;
use std::process::Command;

use huedeck::document::{Document, ImportError};
use huedeck::favorites::Favorites;
use huedeck::grid::{Matrix, PaletteGrid, Row};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sample_state() -> (PaletteGrid, Favorites) {
    let mut grid = PaletteGrid::new(5, 210);
    grid.append_row(Row::new(85, 85));
    grid.append_row(Row::new(55, 75));
    grid.append_row(Row::new(30, 95));
    let mut favorites = Favorites::default();
    favorites.add("#FF0000");
    favorites.add("#00abCD");
    (grid, favorites)
}

/// Validate the structural correctness of an exported document.
fn validate_export_structure(text: &str) {
    for section in ["[meta]", "[inputs]", "[hex]", "[palette]"] {
        assert!(text.contains(section), "missing section {section}");
    }

    let hex_re = regex::Regex::new(r"^#[0-9A-F]{6}$").unwrap();
    let mut in_hex = false;
    for line in text.lines() {
        if line.starts_with('[') {
            in_hex = line == "[hex]";
            continue;
        }
        if !in_hex || line.is_empty() {
            continue;
        }
        let (_, value) = line.split_once('=').expect("hex line should be key = value");
        for token in value.split_whitespace() {
            assert!(
                hex_re.is_match(token),
                "hex token should be uppercase #RRGGBB, got '{token}'"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Export structure
// ---------------------------------------------------------------------------

#[test]
fn export_structure_is_valid() {
    let (grid, favorites) = sample_state();
    let text = Document::snapshot(&grid, &favorites).serialize();
    validate_export_structure(&text);
}

#[test]
fn export_hex_rows_match_inputs() {
    let (grid, favorites) = sample_state();
    let text = Document::snapshot(&grid, &favorites).serialize();

    assert!(text.contains("cols = 5"));
    assert!(text.contains("h = 210"));
    assert!(text.contains("rows_count = 3"));

    // One hex line per matrix row, each with exactly `cols` tokens.
    for r in 1..=4 {
        let key = format!("row{r} = ");
        let line = text
            .lines()
            .find(|l| l.starts_with(&key))
            .unwrap_or_else(|| panic!("missing hex line row{r}"));
        assert_eq!(line[key.len()..].split_whitespace().count(), 5);
    }
    assert!(!text.lines().any(|l| l.starts_with("row5 = ")));
}

#[test]
fn export_palette_preserves_favorite_order() {
    let (grid, favorites) = sample_state();
    let text = Document::snapshot(&grid, &favorites).serialize();
    assert!(text.contains("colors = #FF0000 #00ABCD"));
}

#[test]
fn exported_hex_grid_matches_recomputed_matrix() {
    let (grid, favorites) = sample_state();
    let text = Document::snapshot(&grid, &favorites).serialize();
    let matrix = grid.matrix();

    let key = "row1 = ";
    let line = text.lines().find(|l| l.starts_with(key)).unwrap();
    let tokens: Vec<&str> = line[key.len()..].split_whitespace().collect();
    for (c, token) in tokens.iter().enumerate() {
        assert_eq!(*token, matrix.cell(0, c).to_hex_upper());
    }
}

// ---------------------------------------------------------------------------
// Round-trip law
// ---------------------------------------------------------------------------

#[test]
fn round_trip_reproduces_state() {
    let (grid, favorites) = sample_state();
    let doc = Document::snapshot(&grid, &favorites);
    let parsed = Document::parse(&doc.serialize()).unwrap();

    let mut grid2 = PaletteGrid::default();
    let mut favorites2 = Favorites::default();
    parsed.apply(&mut grid2, &mut favorites2);

    assert_eq!(grid2, grid);
    assert_eq!(favorites2, favorites);
}

#[test]
fn round_trip_preserves_row_order() {
    let (mut grid, favorites) = sample_state();
    grid.move_row(0, 2).unwrap();
    let before = grid.rows().to_vec();

    let parsed = Document::parse(&Document::snapshot(&grid, &favorites).serialize()).unwrap();
    assert_eq!(parsed.rows, before);
}

// ---------------------------------------------------------------------------
// Import rejection leaves state untouched
// ---------------------------------------------------------------------------

/// Corrupt one aspect of a valid export and return the resulting import
/// error. Parsing never touches live state, so a rejection here means the
/// existing grid and favorites stay exactly as they were: `apply` only ever
/// runs on a fully validated `Document`.
fn assert_rejected(mutate: impl Fn(&str) -> String) -> ImportError {
    let (grid, favorites) = sample_state();
    let text = mutate(&Document::snapshot(&grid, &favorites).serialize());
    Document::parse(&text).unwrap_err()
}

#[test]
fn import_rejects_cols_below_minimum() {
    let err = assert_rejected(|t| t.replace("cols = 5", "cols = 1"));
    assert!(matches!(err, ImportError::OutOfRange { value: 1, .. }));
}

#[test]
fn import_rejects_cols_above_maximum() {
    let err = assert_rejected(|t| t.replace("cols = 5", "cols = 361"));
    assert!(matches!(err, ImportError::OutOfRange { value: 361, .. }));
}

#[test]
fn import_rejects_rows_count_51() {
    let err = assert_rejected(|t| t.replace("rows_count = 3", "rows_count = 51"));
    assert!(matches!(err, ImportError::OutOfRange { value: 51, .. }));
}

#[test]
fn import_rejects_short_hex_row() {
    let err = assert_rejected(|t| {
        t.lines()
            .map(|l| {
                if let Some(rest) = l.strip_prefix("row2 = ") {
                    let kept: Vec<&str> = rest.split_whitespace().take(3).collect();
                    format!("row2 = {}", kept.join(" "))
                } else {
                    l.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    });
    assert_eq!(
        err,
        ImportError::HexRowShape {
            row: 2,
            expected: 5,
            found: 3,
        }
    );
}

#[test]
fn import_rejects_malformed_palette_after_valid_grid() {
    let err = assert_rejected(|t| t.replace("colors = #FF0000 #00ABCD", "colors = #FF0000 bad"));
    assert_eq!(
        err,
        ImportError::PaletteToken {
            token: "bad".to_string()
        }
    );
}

#[test]
fn import_rejects_missing_inputs_section() {
    let err = assert_rejected(|t| t.replace("[inputs]", "[inpts]"));
    assert_eq!(err, ImportError::MissingSection("inputs"));
}

// ---------------------------------------------------------------------------
// Property tests
// ---------------------------------------------------------------------------

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_row() -> impl Strategy<Value = Row> {
        (0i32..=100, 0i32..=100).prop_map(|(s, v)| Row::new(s, v))
    }

    fn arb_hex() -> impl Strategy<Value = String> {
        proptest::collection::vec(0u32..16, 6).prop_map(|digits| {
            let body: String = digits
                .iter()
                .map(|d| char::from_digit(*d, 16).unwrap().to_ascii_uppercase())
                .collect();
            format!("#{body}")
        })
    }

    fn arb_state() -> impl Strategy<Value = (i64, i64, Vec<Row>, Vec<String>)> {
        (
            2i64..=36,
            0i64..=359,
            proptest::collection::vec(arb_row(), 0..8),
            proptest::collection::vec(arb_hex(), 0..6),
        )
    }

    proptest! {
        #[test]
        fn round_trip_any_valid_state((cols, hue, rows, hexes) in arb_state()) {
            let mut grid = PaletteGrid::new(cols, hue);
            grid.replace_rows(rows);
            let mut favorites = Favorites::default();
            favorites.replace_all(&hexes);

            let doc = Document::snapshot(&grid, &favorites);
            let parsed = Document::parse(&doc.serialize()).unwrap();
            prop_assert_eq!(&parsed, &doc);

            let mut grid2 = PaletteGrid::default();
            let mut favorites2 = Favorites::default();
            parsed.apply(&mut grid2, &mut favorites2);
            prop_assert_eq!(grid2, grid);
            prop_assert_eq!(favorites2, favorites);
        }

        #[test]
        fn matrix_dimensions_always_match((cols, hue, rows, _) in arb_state()) {
            let matrix = Matrix::compute(cols as u16, hue as u16, &rows);
            prop_assert_eq!(matrix.row_count(), 1 + rows.len());
            prop_assert_eq!(matrix.col_count(), cols as usize);
        }

        #[test]
        fn matrix_header_row_is_full_saturation((cols, hue, _, _) in arb_state()) {
            let matrix = Matrix::compute(cols as u16, hue as u16, &[]);
            let hues = huedeck::grid::column_hues(cols as u16, hue as u16);
            for (c, &h) in hues.iter().enumerate() {
                prop_assert_eq!(
                    matrix.cell(0, c),
                    huedeck::color::Color::from_hsv(h, 100, 100)
                );
            }
        }

        #[test]
        fn move_row_is_a_pure_permutation(
            rows in proptest::collection::vec(arb_row(), 1..8),
            from in 0usize..8,
            to in 0usize..8,
        ) {
            let from = from % rows.len();
            let to = to % rows.len();
            let mut grid = PaletteGrid::new(4, 0);
            grid.replace_rows(rows.clone());
            grid.move_row(from, to).unwrap();

            let mut sorted_before: Vec<(u8, u8)> =
                rows.iter().map(|r| (r.saturation, r.value)).collect();
            let mut sorted_after: Vec<(u8, u8)> =
                grid.rows().iter().map(|r| (r.saturation, r.value)).collect();
            sorted_before.sort_unstable();
            sorted_after.sort_unstable();
            prop_assert_eq!(sorted_before, sorted_after);

            if from == to {
                prop_assert_eq!(grid.rows(), &rows[..]);
            }
        }

        #[test]
        fn favorites_add_is_idempotent(hexes in proptest::collection::vec(arb_hex(), 1..6)) {
            let mut favorites = Favorites::default();
            for hex in &hexes {
                favorites.add(hex);
            }
            let once = favorites.list().to_vec();
            for hex in &hexes {
                favorites.add(&hex.to_ascii_lowercase());
            }
            prop_assert_eq!(favorites.list(), &once[..]);
        }
    }
}

// ---------------------------------------------------------------------------
// CLI integration tests (run the actual binary)
// ---------------------------------------------------------------------------

fn cargo_bin() -> PathBuf {
    // Build the binary in test mode and return its path
    let output = Command::new("cargo")
        .args(["build", "--quiet"])
        .output()
        .expect("failed to build binary");
    assert!(output.status.success(), "cargo build failed");

    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("debug")
        .join("huedeck")
}

#[test]
fn cli_export_writes_valid_config() {
    let bin = cargo_bin();
    let tmp = std::env::temp_dir().join("huedeck-test-cli-export");
    std::fs::create_dir_all(&tmp).unwrap();
    let out_path = tmp.join("palette.ini");

    let output = Command::new(&bin)
        .args(["--export", out_path.to_str().unwrap()])
        .output()
        .expect("failed to run binary");

    assert!(output.status.success(), "binary exited with error");
    let text = std::fs::read_to_string(&out_path).unwrap();
    validate_export_structure(&text);

    // The default session: 7 columns, hue 25, five rows.
    let doc = Document::parse(&text).unwrap();
    assert_eq!(doc.cols, 7);
    assert_eq!(doc.hue, 25);
    assert_eq!(doc.rows.len(), 5);

    std::fs::remove_dir_all(&tmp).unwrap();
}

#[test]
fn cli_config_round_trips_through_import() {
    let bin = cargo_bin();
    let tmp = std::env::temp_dir().join("huedeck-test-cli-roundtrip");
    std::fs::create_dir_all(&tmp).unwrap();
    let first = tmp.join("first.ini");
    let second = tmp.join("second.ini");

    let (grid, favorites) = sample_state();
    Document::snapshot(&grid, &favorites)
        .write_to(&first)
        .unwrap();

    let output = Command::new(&bin)
        .args([
            first.to_str().unwrap(),
            "--export",
            second.to_str().unwrap(),
        ])
        .output()
        .expect("failed to run binary");
    assert!(output.status.success());

    let a = std::fs::read_to_string(&first).unwrap();
    let b = std::fs::read_to_string(&second).unwrap();
    assert_eq!(a, b, "import followed by export should be lossless");

    std::fs::remove_dir_all(&tmp).unwrap();
}

#[test]
fn cli_png_flag_writes_image() {
    let bin = cargo_bin();
    let tmp = std::env::temp_dir().join("huedeck-test-cli-png");
    std::fs::create_dir_all(&tmp).unwrap();
    let out_path = tmp.join("grid.png");

    let output = Command::new(&bin)
        .args(["--cols", "4", "--png", out_path.to_str().unwrap()])
        .output()
        .expect("failed to run binary");

    assert!(output.status.success());
    let img = image::open(&out_path).expect("exported PNG should decode").to_rgb8();
    // 4 columns, 6 matrix rows, default 96x64 cells with an 8px gap.
    assert_eq!(img.width(), 4 * (96 + 8) + 8);
    assert_eq!(img.height(), 6 * (64 + 8) + 8);

    std::fs::remove_dir_all(&tmp).unwrap();
}

#[test]
fn cli_invalid_config_error() {
    let bin = cargo_bin();
    let tmp = std::env::temp_dir().join("huedeck-test-cli-invalid");
    std::fs::create_dir_all(&tmp).unwrap();
    let path = tmp.join("broken.ini");
    std::fs::write(
        &path,
        "[inputs]\ncols = 1\nh = 0\nrows_count = 0\n[hex]\nrow1 = #FF0000\n",
    )
    .unwrap();

    let output = Command::new(&bin)
        .args([path.to_str().unwrap(), "--export", "/dev/null"])
        .output()
        .expect("failed to run binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid configuration"),
        "expected a validation error, got: {stderr}"
    );

    std::fs::remove_dir_all(&tmp).unwrap();
}

#[test]
fn cli_help_output() {
    let bin = cargo_bin();
    let output = Command::new(&bin)
        .arg("--help")
        .output()
        .expect("failed to run binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("huedeck"));
    assert!(stdout.contains("--export"));
    assert!(stdout.contains("--png"));
    assert!(stdout.contains("--cols"));
    assert!(stdout.contains("--hue"));
}
