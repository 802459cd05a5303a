//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! The screen is a 3×3 grid picked by each widget's configured alignment,
//! with a one-line status bar underneath.  Widgets that share a cell are
//! stacked in a fixed order.

use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Padding, Paragraph},
    Frame,
};

use crate::app::App;
use crate::config::{HorizontalAlignment, Margin, VerticalAlignment};
use crate::display::WidgetKind;
use crate::news::{TickerPhase, FADE_DURATION};
use crate::weather::tables::glyph;

/// Stacking order within a grid cell.
const DRAW_ORDER: [WidgetKind; 4] = [
    WidgetKind::Clock,
    WidgetKind::Weather,
    WidgetKind::News,
    WidgetKind::Radio,
];

const ROWS: [VerticalAlignment; 3] = [
    VerticalAlignment::Top,
    VerticalAlignment::Center,
    VerticalAlignment::Bottom,
];

const COLUMNS: [HorizontalAlignment; 3] = [
    HorizontalAlignment::Left,
    HorizontalAlignment::Center,
    HorizontalAlignment::Right,
];

/// Draw the complete UI for one frame.
pub fn draw(app: &App, frame: &mut Frame, now: Instant) {
    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    let rows = Layout::vertical([Constraint::Ratio(1, 3); 3]).split(main_area);
    for (row_area, vertical) in rows.iter().zip(ROWS) {
        let cells = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(*row_area);
        for (cell_area, horizontal) in cells.iter().zip(COLUMNS) {
            draw_cell(app, frame, *cell_area, vertical, horizontal, now);
        }
    }

    draw_status_bar(app, frame, status_area);
}

/// Grid cell for a configured alignment.  Stretch is centred.
fn cell_of(
    vertical: VerticalAlignment,
    horizontal: HorizontalAlignment,
) -> (VerticalAlignment, HorizontalAlignment) {
    let vertical = match vertical {
        VerticalAlignment::Stretch => VerticalAlignment::Center,
        other => other,
    };
    let horizontal = match horizontal {
        HorizontalAlignment::Stretch => HorizontalAlignment::Center,
        other => other,
    };
    (vertical, horizontal)
}

fn draw_cell(
    app: &App,
    frame: &mut Frame,
    area: Rect,
    vertical: VerticalAlignment,
    horizontal: HorizontalAlignment,
    now: Instant,
) {
    let blocks: Vec<(Vec<Line>, Padding)> = DRAW_ORDER
        .iter()
        .filter_map(|&widget| {
            let position = app.placement(widget);
            let cell = cell_of(position.vertical_alignment, position.horizontal_alignment);
            if cell != (vertical, horizontal) {
                return None;
            }
            let lines = widget_lines(app, widget, now);
            (!lines.is_empty()).then(|| (lines, padding(&position.margin)))
        })
        .collect();

    if blocks.is_empty() {
        return;
    }

    let flex = match vertical {
        VerticalAlignment::Top => Flex::Start,
        VerticalAlignment::Bottom => Flex::End,
        VerticalAlignment::Center | VerticalAlignment::Stretch => Flex::Center,
    };
    let alignment = match horizontal {
        HorizontalAlignment::Left => Alignment::Left,
        HorizontalAlignment::Right => Alignment::Right,
        HorizontalAlignment::Center | HorizontalAlignment::Stretch => Alignment::Center,
    };

    let heights = blocks.iter().map(|(lines, pad)| {
        let rows = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        Constraint::Length(rows.saturating_add(pad.top).saturating_add(pad.bottom))
    });
    let areas = Layout::vertical(heights).flex(flex).split(area);

    for ((lines, pad), rect) in blocks.into_iter().zip(areas.iter()) {
        let paragraph = Paragraph::new(lines)
            .alignment(alignment)
            .block(Block::default().padding(pad));
        frame.render_widget(paragraph, *rect);
    }
}

/// Configured margins are in cells; negative values are ignored.
fn padding(margin: &Margin) -> Padding {
    let cells = |v: f64| v.max(0.0).round() as u16;
    Padding::new(
        cells(margin.left),
        cells(margin.right),
        cells(margin.top),
        cells(margin.bottom),
    )
}

fn widget_lines(app: &App, widget: WidgetKind, now: Instant) -> Vec<Line<'static>> {
    match widget {
        WidgetKind::Clock => clock_lines(app),
        WidgetKind::Weather => weather_lines(app),
        WidgetKind::News => news_lines(app, now),
        WidgetKind::Radio => radio_lines(app),
    }
}

fn clock_lines(app: &App) -> Vec<Line<'static>> {
    let Some(clock) = &app.clock else {
        return Vec::new();
    };
    vec![
        Line::from(vec![
            Span::styled(
                clock.time.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(clock.seconds.clone(), Style::default().fg(Color::DarkGray)),
        ]),
        Line::styled(clock.date.clone(), Style::default().fg(Color::Gray)),
    ]
}

fn weather_lines(app: &App) -> Vec<Line<'static>> {
    let Some(view) = &app.weather else {
        return Vec::new();
    };
    let Some(weather) = &view.weather else {
        return vec![Line::styled(
            "loading weather ...",
            Style::default().fg(Color::DarkGray),
        )];
    };

    let mut sky = format!(
        "{} {}  {} {}",
        glyph::SUNRISE,
        weather.sunrise,
        glyph::SUNSET,
        weather.sunset
    );
    if let Some(clouds) = &weather.cloudiness {
        sky.push_str(&format!("  {} {clouds}%", glyph::CLOUDY));
    }

    let dim = Style::default().fg(Color::Gray);
    vec![
        Line::from(vec![
            Span::raw(format!("{} ", weather.icon)),
            Span::styled(
                format!("{}{}", weather.temperature, view.unit_glyph),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", weather.location), dim),
        ]),
        Line::styled(weather.summary.clone(), dim),
        Line::styled(
            format!("{} {}", wind_arrow(weather.wind_rotation), weather.wind_notes),
            dim,
        ),
        Line::styled(
            format!(
                "{} {}  {} {}  {} {}%  {} {} hPa",
                glyph::MIN_TEMP,
                weather.temp_min,
                glyph::MAX_TEMP,
                weather.temp_max,
                glyph::HUMIDITY,
                weather.humidity,
                glyph::BAROMETER,
                weather.pressure
            ),
            dim,
        ),
        Line::styled(sky, dim),
    ]
}

fn news_lines(app: &App, now: Instant) -> Vec<Line<'static>> {
    let news = &app.news;
    if !news.visible {
        return Vec::new();
    }

    let level = fade_level(news.phase, now.saturating_duration_since(app.news_phase_since));
    let shade = |max: u8| {
        let v = (f32::from(max) * level).round() as u8;
        Color::Rgb(v, v, v)
    };

    // The channel title only adds information when it differs from the
    // configured feed name.
    let source = if news.channel.is_empty() || news.channel == news.source {
        news.source.clone()
    } else {
        format!("{} · {}", news.source, news.channel)
    };

    vec![
        Line::styled(source, Style::default().fg(Color::Cyan)),
        Line::styled(news.headline.clone(), Style::default().fg(shade(255))),
        Line::styled(news.age.clone(), Style::default().fg(shade(140))),
    ]
}

fn radio_lines(app: &App) -> Vec<Line<'static>> {
    match app.radio.as_ref().and_then(|r| r.station.as_ref()) {
        Some(station) => vec![Line::styled(
            format!("♪ {}", station.name),
            Style::default().fg(Color::Magenta),
        )],
        None => Vec::new(),
    }
}

/// Brightness in `0.0..=1.0` for the headline during a fade.
pub fn fade_level(phase: TickerPhase, elapsed: std::time::Duration) -> f32 {
    let t = (elapsed.as_secs_f32() / FADE_DURATION.as_secs_f32()).clamp(0.0, 1.0);
    match phase {
        TickerPhase::FadingOut => 1.0 - t,
        TickerPhase::FadingIn => t,
        TickerPhase::Idle | TickerPhase::Fetching => 1.0,
    }
}

/// Arrow pointing the way the wind blows, from a heading in degrees.
fn wind_arrow(heading: u16) -> char {
    const ARROWS: [char; 8] = ['↑', '↗', '→', '↘', '↓', '↙', '←', '↖'];
    let index = ((u32::from(heading) * 2 + 45) / 90) % 8;
    ARROWS[index as usize]
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(app.status.clone(), Style::default().fg(Color::Yellow)),
        Span::raw("  q: quit"),
    ]));
    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ClockView;
    use crate::config::Position;
    use crate::display::DisplayUpdate;
    use crate::news::NewsView;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::time::Duration;

    fn screen_text(app: &App, now: Instant) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f, now)).unwrap();
        let buf = terminal.backend().buffer().clone();
        buf.content()
            .iter()
            .map(|c| c.symbol().chars().next().unwrap_or(' '))
            .collect()
    }

    #[test]
    fn fade_ramps_out_and_in() {
        let half = FADE_DURATION / 2;
        assert_eq!(fade_level(TickerPhase::FadingOut, Duration::ZERO), 1.0);
        assert!((fade_level(TickerPhase::FadingOut, half) - 0.5).abs() < 1e-3);
        assert_eq!(fade_level(TickerPhase::FadingOut, FADE_DURATION * 2), 0.0);
        assert_eq!(fade_level(TickerPhase::FadingIn, Duration::ZERO), 0.0);
        assert_eq!(fade_level(TickerPhase::FadingIn, FADE_DURATION), 1.0);
        assert_eq!(fade_level(TickerPhase::Idle, Duration::ZERO), 1.0);
    }

    #[test]
    fn wind_arrow_points_downwind() {
        assert_eq!(wind_arrow(0), '↑');
        assert_eq!(wind_arrow(20), '↑');
        assert_eq!(wind_arrow(90), '→');
        assert_eq!(wind_arrow(260), '←');
        assert_eq!(wind_arrow(350), '↑');
    }

    #[test]
    fn stretch_is_centred() {
        assert_eq!(
            cell_of(VerticalAlignment::Stretch, HorizontalAlignment::Stretch),
            (VerticalAlignment::Center, HorizontalAlignment::Center)
        );
    }

    #[test]
    fn draw_does_not_panic_on_fresh_app() {
        let app = App::new();
        let text = screen_text(&app, Instant::now());
        assert!(text.contains("loading news feed"));
        assert!(text.contains("q: quit"));
    }

    #[test]
    fn draw_shows_clock_and_news() {
        let mut app = App::new();
        let now = Instant::now();
        app.apply(
            DisplayUpdate::Clock(ClockView {
                time: "07:30".into(),
                seconds: "05".into(),
                date: "Monday".into(),
            }),
            now,
        );
        app.apply(
            DisplayUpdate::News(NewsView {
                source: "World".into(),
                headline: "Headline text".into(),
                age: "1 hour ago".into(),
                channel: "BBC News".into(),
                ..NewsView::default()
            }),
            now,
        );
        app.apply(
            DisplayUpdate::Placement {
                widget: WidgetKind::News,
                position: Position {
                    vertical_alignment: VerticalAlignment::Bottom,
                    horizontal_alignment: HorizontalAlignment::Center,
                    ..Position::default()
                },
            },
            now,
        );

        let text = screen_text(&app, now);
        assert!(text.contains("07:30"));
        assert!(text.contains("Headline text"));
        assert!(text.contains("1 hour ago"));
        assert!(text.contains("World · BBC News"));
    }

    #[test]
    fn hidden_news_is_not_drawn() {
        let mut app = App::new();
        app.news.visible = false;
        let text = screen_text(&app, Instant::now());
        assert!(!text.contains("loading news feed"));
    }
}
