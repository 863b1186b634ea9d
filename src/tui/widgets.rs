use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::color::Color as AppColor;
use crate::favorites::Favorites;
use crate::grid::Matrix;

fn to_color(c: AppColor) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Choose black or white foreground for readable text on the given swatch.
fn contrast_fg(c: AppColor) -> Color {
    if c.is_light() {
        Color::Black
    } else {
        Color::White
    }
}

/// Renders the swatch matrix as rows of colored cells, each labeled with
/// its hex value. Highlights the cell under the cursor and shows an info
/// line for it.
pub struct MatrixWidget<'a> {
    matrix: &'a Matrix,
    cursor: Option<(usize, usize)>,
}

impl<'a> MatrixWidget<'a> {
    pub fn new(matrix: &'a Matrix, cursor: Option<(usize, usize)>) -> Self {
        Self { matrix, cursor }
    }
}

/// Build one matrix row: a dimmed 1-based row number followed by a swatch
/// per column. The cursor cell gets bold + underline.
fn build_matrix_row(matrix: &Matrix, row: usize, cursor: Option<(usize, usize)>) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{:>3} ", row + 1),
        Style::default().fg(Color::DarkGray),
    )];
    for col in 0..matrix.col_count() {
        let cell = matrix.cell(row, col);
        let mut style = Style::default().bg(to_color(cell)).fg(contrast_fg(cell));
        if cursor == Some((row, col)) {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        spans.push(Span::styled(format!(" {} ", cell.to_hex_upper()), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

impl Widget for MatrixWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered().title("Swatches");
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = Vec::with_capacity(self.matrix.row_count() + 2);
        for row in 0..self.matrix.row_count() {
            lines.push(build_matrix_row(self.matrix, row, self.cursor));
        }

        if let Some((row, col)) = self.cursor {
            if row < self.matrix.row_count() && col < self.matrix.col_count() {
                let cell = self.matrix.cell(row, col);
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        format!("  {}  ", cell.to_hex_upper()),
                        Style::default().bg(to_color(cell)).fg(contrast_fg(cell)),
                    ),
                    Span::raw(format!(
                        "  row {} col {}  rgb({}, {}, {})",
                        row + 1,
                        col + 1,
                        cell.r,
                        cell.g,
                        cell.b,
                    )),
                ]));
            }
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

/// Renders the favorites strip: curated swatches in insertion order, with
/// the cursor entry highlighted when the pane has focus.
pub struct FavoritesWidget<'a> {
    favorites: &'a Favorites,
    cursor: Option<usize>,
}

impl<'a> FavoritesWidget<'a> {
    pub fn new(favorites: &'a Favorites, cursor: Option<usize>) -> Self {
        Self { favorites, cursor }
    }
}

impl Widget for FavoritesWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered().title(format!("Favorites ({})", self.favorites.len()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.favorites.is_empty() {
            Paragraph::new(" (empty) press f on a swatch to keep it")
                .style(Style::default().fg(Color::DarkGray))
                .render(inner, buf);
            return;
        }

        let mut spans = vec![Span::raw(" ")];
        for (i, hex) in self.favorites.list().iter().enumerate() {
            // Imported entries are only shape-checked, so fall back to a
            // neutral gray swatch when one does not parse.
            let swatch = AppColor::from_hex(hex).unwrap_or(AppColor::new(128, 128, 128));
            let mut style = Style::default().bg(to_color(swatch)).fg(contrast_fg(swatch));
            if self.cursor == Some(i) {
                style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            spans.push(Span::styled(format!(" {hex} "), style));
            spans.push(Span::raw(" "));
        }
        Paragraph::new(Line::from(spans))
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
