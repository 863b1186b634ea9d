pub mod widgets;

use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::document::Document;
use crate::favorites::Favorites;
use crate::grid::PaletteGrid;
use crate::render::{self, RenderOptions};
use self::widgets::{FavoritesWidget, MatrixWidget};

/// Which pane owns the cursor keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Matrix,
    Favorites,
}

/// State for the interactive designer. Every keybinding maps onto one core
/// operation; the matrix is recomputed on each draw, so a mutation is
/// always fully visible by the next frame.
pub struct App {
    grid: PaletteGrid,
    favorites: Favorites,
    cursor: (usize, usize),
    fav_cursor: usize,
    focus: Focus,
    status: String,
    export_path: PathBuf,
    png_path: PathBuf,
    render_options: RenderOptions,
    quit: bool,
}

const HELP: &str =
    "arrows move · a/d add/delete row · J/K shift row · s/S v/V [/] {/} adjust · f favorite · y copy · e/p export · q quit";

impl App {
    pub fn new(
        grid: PaletteGrid,
        favorites: Favorites,
        export_path: PathBuf,
        png_path: PathBuf,
        render_options: RenderOptions,
    ) -> Self {
        Self {
            grid,
            favorites,
            cursor: (0, 0),
            fav_cursor: 0,
            focus: Focus::Matrix,
            status: HELP.to_string(),
            export_path,
            png_path,
            render_options,
            quit: false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Matrix => Focus::Favorites,
                    Focus::Favorites => Focus::Matrix,
                };
            }
            KeyCode::Char('e') => self.export_config(),
            KeyCode::Char('p') => self.export_png(),
            KeyCode::Char('y') => self.copy_selected(),
            _ => match self.focus {
                Focus::Matrix => self.handle_matrix_key(key.code),
                Focus::Favorites => self.handle_favorites_key(key.code),
            },
        }
    }

    fn handle_matrix_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.cursor.0 = self.cursor.0.saturating_sub(1),
            KeyCode::Down => {
                self.cursor.0 = (self.cursor.0 + 1).min(self.grid.row_count());
            }
            KeyCode::Left => self.cursor.1 = self.cursor.1.saturating_sub(1),
            KeyCode::Right => {
                self.cursor.1 = (self.cursor.1 + 1).min(self.grid.cols() as usize - 1);
            }
            KeyCode::Char('a') | KeyCode::Char('+') => {
                let row = self.grid.append_default_row();
                self.cursor.0 = self.grid.row_count();
                self.status = format!(
                    "added row {} at S/V {}/{}",
                    self.grid.row_count() + 1,
                    row.saturation,
                    row.value
                );
            }
            KeyCode::Char('d') | KeyCode::Char('-') => self.delete_cursor_row(),
            KeyCode::Char('K') => self.shift_cursor_row(-1),
            KeyCode::Char('J') => self.shift_cursor_row(1),
            KeyCode::Char('s') => self.nudge_saturation(-1),
            KeyCode::Char('S') => self.nudge_saturation(1),
            KeyCode::Char('v') => self.nudge_value(-1),
            KeyCode::Char('V') => self.nudge_value(1),
            KeyCode::Char('[') => self.nudge_hue(-1),
            KeyCode::Char(']') => self.nudge_hue(1),
            KeyCode::Char('{') => self.nudge_cols(-1),
            KeyCode::Char('}') => self.nudge_cols(1),
            KeyCode::Char('f') | KeyCode::Enter => self.favorite_selected(),
            _ => {}
        }
    }

    fn handle_favorites_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left | KeyCode::Up => {
                self.fav_cursor = self.fav_cursor.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Down => {
                if !self.favorites.is_empty() {
                    self.fav_cursor = (self.fav_cursor + 1).min(self.favorites.len() - 1);
                }
            }
            KeyCode::Char('x') | KeyCode::Char('d') | KeyCode::Delete => self.remove_favorite(),
            _ => {}
        }
    }

    fn delete_cursor_row(&mut self) {
        let (row, _) = self.cursor;
        if row == 0 {
            self.status = "the top row is fixed".to_string();
            return;
        }
        match self.grid.remove_row(row - 1) {
            Ok(_) => {
                self.status = format!("removed row {}", row + 1);
                self.clamp_cursor();
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    fn shift_cursor_row(&mut self, delta: isize) {
        let (row, _) = self.cursor;
        if row == 0 {
            self.status = "the top row is fixed".to_string();
            return;
        }
        let from = row - 1;
        let to = from as isize + delta;
        if to < 0 || to >= self.grid.row_count() as isize {
            return;
        }
        match self.grid.move_row(from, to as usize) {
            Ok(()) => {
                self.cursor.0 = to as usize + 1;
                self.status = format!("moved row to position {}", to + 2);
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    fn nudge_saturation(&mut self, delta: i32) {
        let (row, _) = self.cursor;
        if row == 0 {
            self.status = "the top row is fixed at S/V 100/100".to_string();
            return;
        }
        let index = row - 1;
        let Ok(current) = self.grid.row(index) else {
            return;
        };
        if let Err(e) = self
            .grid
            .set_row_saturation(index, i32::from(current.saturation) + delta)
        {
            self.status = e.to_string();
            return;
        }
        if let Ok(updated) = self.grid.row(index) {
            self.status = format!("row {} S {}%", row + 1, updated.saturation);
        }
    }

    fn nudge_value(&mut self, delta: i32) {
        let (row, _) = self.cursor;
        if row == 0 {
            self.status = "the top row is fixed at S/V 100/100".to_string();
            return;
        }
        let index = row - 1;
        let Ok(current) = self.grid.row(index) else {
            return;
        };
        if let Err(e) = self
            .grid
            .set_row_value(index, i32::from(current.value) + delta)
        {
            self.status = e.to_string();
            return;
        }
        if let Ok(updated) = self.grid.row(index) {
            self.status = format!("row {} V {}%", row + 1, updated.value);
        }
    }

    fn nudge_hue(&mut self, delta: i64) {
        let hue = (i64::from(self.grid.hue()) + delta).rem_euclid(360);
        self.grid.set_hue(hue);
        self.status = format!("hue {}°", self.grid.hue());
    }

    fn nudge_cols(&mut self, delta: i64) {
        self.grid.set_cols(i64::from(self.grid.cols()) + delta);
        self.clamp_cursor();
        self.status = format!("{} columns", self.grid.cols());
    }

    fn favorite_selected(&mut self) {
        let matrix = self.grid.matrix();
        let (row, col) = self.cursor;
        if row >= matrix.row_count() || col >= matrix.col_count() {
            return;
        }
        let hex = matrix.cell(row, col).to_hex_upper();
        if self.favorites.add(&hex) {
            self.status = format!("added {hex} to favorites");
        } else {
            self.status = format!("{hex} is already a favorite");
        }
    }

    fn remove_favorite(&mut self) {
        let Some(hex) = self.favorites.list().get(self.fav_cursor).cloned() else {
            return;
        };
        self.favorites.remove(&hex);
        self.status = format!("removed {hex} from favorites");
        self.clamp_cursor();
    }

    fn copy_selected(&mut self) {
        let hex = match self.focus {
            Focus::Matrix => {
                let matrix = self.grid.matrix();
                let (row, col) = self.cursor;
                if row >= matrix.row_count() || col >= matrix.col_count() {
                    return;
                }
                matrix.cell(row, col).to_hex_upper()
            }
            Focus::Favorites => match self.favorites.list().get(self.fav_cursor) {
                Some(hex) => hex.clone(),
                None => return,
            },
        };
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(hex.clone())) {
            Ok(()) => self.status = format!("copied {hex}"),
            Err(e) => self.status = format!("clipboard unavailable: {e}"),
        }
    }

    fn export_config(&mut self) {
        let doc = Document::snapshot(&self.grid, &self.favorites);
        match doc.write_to(&self.export_path) {
            Ok(()) => self.status = format!("wrote {}", self.export_path.display()),
            Err(e) => self.status = format!("export failed: {e:#}"),
        }
    }

    fn export_png(&mut self) {
        match render::write_png(&self.grid.matrix(), &self.render_options, &self.png_path) {
            Ok(()) => self.status = format!("wrote {}", self.png_path.display()),
            Err(e) => self.status = format!("export failed: {e:#}"),
        }
    }

    /// Keep both cursors inside the current grid and favorites bounds.
    fn clamp_cursor(&mut self) {
        self.cursor.0 = self.cursor.0.min(self.grid.row_count());
        self.cursor.1 = self.cursor.1.min(self.grid.cols() as usize - 1);
        if self.fav_cursor >= self.favorites.len() {
            self.fav_cursor = self.favorites.len().saturating_sub(1);
        }
    }
}

/// Launch the interactive designer and block until the user quits.
pub fn run(mut app: App) -> Result<()> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app);
    ratatui::restore();
    result
}

fn event_loop(terminal: &mut ratatui::DefaultTerminal, app: &mut App) -> Result<()> {
    while !app.quit {
        terminal.draw(|frame| draw(frame, app))?;
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, app: &App) {
    let [header, matrix_area, favorites_area, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(4),
        Constraint::Length(4),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let summary = format!(
        " huedeck · {} columns · hue {}° · {} rows",
        app.grid.cols(),
        app.grid.hue(),
        1 + app.grid.row_count(),
    );
    frame.render_widget(
        Paragraph::new(summary).style(Style::default().add_modifier(Modifier::BOLD)),
        header,
    );

    let matrix = app.grid.matrix();
    let cursor = (app.focus == Focus::Matrix).then_some(app.cursor);
    frame.render_widget(MatrixWidget::new(&matrix, cursor), matrix_area);

    let fav_cursor = (app.focus == Focus::Favorites).then_some(app.fav_cursor);
    frame.render_widget(FavoritesWidget::new(&app.favorites, fav_cursor), favorites_area);

    frame.render_widget(
        Paragraph::new(format!(" {}", app.status)).style(Style::default().fg(Color::DarkGray)),
        status,
    );
}
