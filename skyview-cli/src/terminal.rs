//! Paints [`Screen`] values with crossterm styling.

use crossterm::style::{Color, Stylize};
use skyview_core::{
    BackgroundTheme, Renderer, Screen, ViewState,
    render::{Background, Chart, ChartBar, DecorKind, ParamsPanel},
};
use std::{
    io::{self, Write},
    time::Duration,
};

const STRIP_WIDTH: usize = 48;
const BAR_WIDTH: usize = 30;

#[derive(Debug)]
pub struct Painter {
    renderer: Renderer,
    animate: bool,
}

impl Painter {
    pub fn new(renderer: Renderer, animate: bool) -> Self {
        Self { renderer, animate }
    }

    pub fn render(&self, state: &ViewState) -> Screen {
        self.renderer.render(state)
    }

    /// The search control line, e.g. `[ Loading... ]`.
    pub fn paint_control<W: Write>(&self, screen: &Screen, out: &mut W) -> io::Result<()> {
        let label = format!("[ {} ]", screen.search.label);
        if screen.search.enabled {
            writeln!(out, "{}", label.bold())
        } else {
            writeln!(out, "{}", label.dim())
        }
    }

    /// Suspends between chart bars when animating; nothing else waits.
    pub async fn paint<W: Write>(&self, screen: &Screen, out: &mut W) -> io::Result<()> {
        if let Some(status) = &screen.status {
            writeln!(out, "{}", status.as_str().red().bold())?;
        }

        if let Some(background) = &screen.background {
            writeln!(out, "{}", strip(background))?;
        }

        if let Some(card) = &screen.card {
            writeln!(out)?;
            writeln!(out, "  {}", card.place.as_str().bold())?;
            writeln!(
                out,
                "  {}  {}",
                card.temperature.as_str().bold().yellow(),
                card.description.as_str().italic()
            )?;
            writeln!(out, "  {}", card.icon_url.as_str().dark_grey())?;
        }

        if let Some(params) = &screen.params {
            writeln!(out)?;
            self.paint_params(params, out).await?;
        }

        out.flush()
    }

    async fn paint_params<W: Write>(&self, panel: &ParamsPanel, out: &mut W) -> io::Result<()> {
        for param in &panel.params {
            let value = match param.unit {
                "" => param.value.clone(),
                unit => format!("{} {}", param.value, unit),
            };
            writeln!(out, "  {:<14}{}", param.label, value.as_str().green())?;
        }

        writeln!(out)?;
        writeln!(out, "  {}", "Next 24 hours".yellow())?;

        match &panel.chart {
            Chart::Unavailable(message) => writeln!(out, "  {}", (*message).dark_grey()),
            Chart::Bars(bars) => self.paint_bars(bars, out).await,
        }
    }

    async fn paint_bars<W: Write>(&self, bars: &[ChartBar], out: &mut W) -> io::Result<()> {
        let mut shown_at = Duration::ZERO;

        for bar in bars {
            if self.animate {
                out.flush()?;
                tokio::time::sleep(bar.reveal_delay.saturating_sub(shown_at)).await;
                shown_at = bar.reveal_delay;
            }
            let cells = format!("{:<width$}", bar_cells(bar.height_percent), width = BAR_WIDTH);
            writeln!(out, "  {} {} {}", bar.hour_label, cells.cyan(), bar.temp_label)?;
        }

        Ok(())
    }
}

fn bar_cells(height_percent: f64) -> String {
    let cells = (height_percent / 100.0 * BAR_WIDTH as f64).round() as usize;
    "█".repeat(cells.min(BAR_WIDTH))
}

fn theme_color(theme: BackgroundTheme) -> Color {
    match theme {
        BackgroundTheme::Clear => Color::Yellow,
        BackgroundTheme::Clouds => Color::Grey,
        BackgroundTheme::Rain => Color::Blue,
        BackgroundTheme::Snow => Color::White,
        BackgroundTheme::Thunderstorm => Color::Magenta,
        BackgroundTheme::Fog => Color::DarkGrey,
    }
}

fn glyph(kind: DecorKind) -> char {
    match kind {
        DecorKind::Sun => '☀',
        DecorKind::Cloud { .. } => '☁',
        DecorKind::Drop { .. } => '¦',
        DecorKind::Flake { .. } => '*',
        DecorKind::Flash => '⚡',
    }
}

/// One line of decoration; each node lands at its horizontal offset.
fn strip(background: &Background) -> String {
    let fill = match background.theme {
        BackgroundTheme::Fog => '░',
        _ => ' ',
    };
    let mut cells = vec![fill; STRIP_WIDTH];

    for node in &background.nodes {
        let col = usize::from(node.left_percent) * (STRIP_WIDTH - 1) / 100;
        cells[col] = glyph(node.kind);
    }

    let line: String = cells.into_iter().collect();
    let styled = line.with(theme_color(background.theme));

    let flash = background.nodes.iter().any(|n| n.kind == DecorKind::Flash);
    if flash {
        styled.reverse().to_string()
    } else {
        styled.to_string()
    }
}
