use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use globe::{RenderStyle, Scene};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    DefaultTerminal, Frame,
};

use crate::braille::BrailleCanvas;

/// Rendered preview for one terminal size
struct Preview {
    area: (u16, u16),
    braille: BrailleCanvas,
}

/// Show a static braille preview of the scene until q or Esc is pressed
pub fn run(scene: &Scene, style: &RenderStyle) -> Result<()> {
    let mut terminal = ratatui::init();
    let result = preview_loop(&mut terminal, scene, style);
    ratatui::restore();
    result
}

fn preview_loop(terminal: &mut DefaultTerminal, scene: &Scene, style: &RenderStyle) -> Result<()> {
    let mut preview: Option<Preview> = None;

    loop {
        terminal.draw(|frame| render(frame, scene, style, &mut preview))?;

        // Resize events fall through to a redraw at the new size
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                break;
            }
        }
    }

    Ok(())
}

fn render(frame: &mut Frame, scene: &Scene, style: &RenderStyle, preview: &mut Option<Preview>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Globe
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Globe ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(chunks[0]);
    frame.render_widget(block, chunks[0]);

    // Re-render only when the drawing area changes
    let size = (inner.width, inner.height);
    if preview.as_ref().map(|p| p.area) != Some(size) {
        // Braille gives 2x4 dots per character
        let resolution = (inner.width as usize * 2).min(inner.height as usize * 4);
        let canvas = scene.render(resolution, style);
        log::debug!("Preview re-rendered at {}px for {}x{} cells", resolution, size.0, size.1);
        *preview = Some(Preview {
            area: size,
            braille: BrailleCanvas::from_canvas(&canvas, style.background),
        });
    }
    if let Some(p) = preview.as_ref() {
        frame.render_widget(GlobeWidget { braille: &p.braille }, inner);
    }

    render_status_bar(frame, scene, chunks[1]);
}

fn render_status_bar(frame: &mut Frame, scene: &Scene, area: Rect) {
    let center = scene.orientation().center();
    let coords = format!(
        "{:.1}°{}, {:.1}°{}",
        center.lat.abs(),
        if center.lat >= 0.0 { "N" } else { "S" },
        center.lng.abs(),
        if center.lng >= 0.0 { "E" } else { "W" }
    );
    let line = Line::from(vec![
        Span::styled(coords, Style::default().fg(Color::Yellow)),
        Span::raw(format!("  {} drawables  ", scene.drawables().len())),
        Span::styled("q", Style::default().fg(Color::Cyan)),
        Span::raw(" quit"),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Braille globe, horizontally centered in its area
struct GlobeWidget<'a> {
    braille: &'a BrailleCanvas,
}

impl Widget for GlobeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (row_idx, row) in self.braille.rows().enumerate() {
            if row_idx >= area.height as usize {
                break;
            }
            let y = area.y + row_idx as u16;
            let offset = area.width.saturating_sub(row.chars().count() as u16) / 2;

            for (col_idx, ch) in row.chars().enumerate() {
                let col = offset as usize + col_idx;
                if col >= area.width as usize {
                    break;
                }
                // Skip empty braille characters (U+2800)
                if ch == '\u{2800}' {
                    continue;
                }
                buf[(area.x + col as u16, y)].set_char(ch).set_fg(Color::Cyan);
            }
        }
    }
}
