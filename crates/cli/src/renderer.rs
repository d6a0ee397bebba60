use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Gauge},
};
use storefront_core::{DepthEngine, ScrollThrottle};
use storefront_protocol::LayerStyle;

const LINE_STEP: f64 = 50.0;
const PAGE_STEP: f64 = 500.0;

fn layer_color(layer: &LayerStyle) -> Color {
    if !layer.interactive {
        Color::DarkGray
    } else if layer.blur > 0.0 {
        Color::Yellow
    } else {
        Color::Green
    }
}

fn layer_title(layer: &LayerStyle) -> String {
    format!(
        " layer {} | depth {:>7.0} | blur {:>4.1}px | {} ",
        layer.index,
        layer.depth,
        layer.blur,
        if layer.interactive { "clickable" } else { "passed" },
    )
}

/// Interactive terminal preview of the depth scene.
///
/// Scroll events go through the same [`ScrollThrottle`] the browser bridge
/// uses; the scene is re-evaluated once per redraw.
pub fn render_preview(engine: &DepthEngine, viewport_height: f64) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let max_scroll = (engine.track_length() - viewport_height).max(0.0);
    let mut throttle = ScrollThrottle::new();
    let mut offset = 0.0_f64;
    let mut frame_state = engine.on_scroll(offset);

    loop {
        if let Some(latest) = throttle.take() {
            frame_state = engine.on_scroll(latest);
        }

        terminal.draw(|frame| {
            let area = frame.area();

            let header_area = Rect::new(0, 0, area.width, 1);
            let header = Block::default()
                .title(format!(
                    " storefront depth preview | scroll {:.0}/{:.0} | ↑↓ scroll | PgUp/PgDn page | q quit ",
                    frame_state.world.translate_z, max_scroll
                ))
                .style(Style::default().fg(Color::White).bg(Color::DarkGray));
            frame.render_widget(header, header_area);

            let content_area = Rect::new(0, 1, area.width, area.height.saturating_sub(1));
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints(
                    frame_state
                        .layers
                        .iter()
                        .map(|_| Constraint::Length(3))
                        .collect::<Vec<_>>(),
                )
                .split(content_area);

            for (layer, row) in frame_state.layers.iter().zip(rows.iter()) {
                let gauge = Gauge::default()
                    .block(
                        Block::default()
                            .title(layer_title(layer))
                            .borders(Borders::ALL),
                    )
                    .gauge_style(Style::default().fg(layer_color(layer)).bg(Color::Black))
                    .ratio(layer.opacity.clamp(0.0, 1.0))
                    .label(format!("opacity {:.2}", layer.opacity));
                frame.render_widget(gauge, *row);
            }
        })?;

        if event::poll(Duration::from_millis(16))? {
            let step = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Up => -LINE_STEP,
                    KeyCode::Down => LINE_STEP,
                    KeyCode::PageUp => -PAGE_STEP,
                    KeyCode::PageDown => PAGE_STEP,
                    KeyCode::Home => -offset,
                    KeyCode::End => max_scroll - offset,
                    _ => 0.0,
                },
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollDown => LINE_STEP,
                    MouseEventKind::ScrollUp => -LINE_STEP,
                    _ => 0.0,
                },
                _ => 0.0,
            };
            if step != 0.0 {
                offset = (offset + step).clamp(0.0, max_scroll);
                throttle.notify(offset);
            }
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}
