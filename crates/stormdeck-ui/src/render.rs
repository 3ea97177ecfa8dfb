//! Card rendering.
//!
//! Renderers only ever see a [`DashboardSnapshot`]; they never reach back
//! into dashboard state.

use std::io::{self, Write};

use stormdeck_weather::{CardView, WeatherIcon};

use crate::models::dashboard_model::DashboardSnapshot;

pub trait CardRenderer {
    fn render(&mut self, snapshot: &DashboardSnapshot) -> io::Result<()>;
}

/// Plain-text cards for a terminal
#[derive(Debug)]
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_card(&mut self, card: &CardView) -> io::Result<()> {
        let current = &card.current;
        let icon = icon_label(current.icon);

        writeln!(self.out, "{}  {}", card.location, icon)?;
        writeln!(self.out, "  {} · {}", current.description, current.date)?;
        writeln!(
            self.out,
            "  {}°  humidity {}  wind {} @ {}°",
            current.temperature, current.humidity, current.wind_speed, current.wind_direction
        )?;

        let strip: Vec<String> = card
            .days
            .iter()
            .map(|d| format!("{} {} {}/{}", d.weekday, icon_glyph(d.icon), d.high, d.low))
            .collect();
        if !strip.is_empty() {
            writeln!(self.out, "  {}", strip.join(" | "))?;
        }

        writeln!(
            self.out,
            "  updated {}",
            card.created.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}

impl<W: Write> CardRenderer for TextRenderer<W> {
    fn render(&mut self, snapshot: &DashboardSnapshot) -> io::Result<()> {
        if snapshot.cards.is_empty() {
            if snapshot.loading {
                writeln!(self.out, "Loading forecasts…")?;
            } else {
                writeln!(self.out, "No cities selected.")?;
            }
            return self.out.flush();
        }

        for (i, card) in snapshot.cards.iter().enumerate() {
            if i > 0 {
                writeln!(self.out)?;
            }
            self.write_card(card)?;
        }
        self.out.flush()
    }
}

fn icon_label(icon: Option<WeatherIcon>) -> String {
    match icon {
        Some(i) => format!("{} {}", i.glyph(), i.css_class()),
        None => String::new(),
    }
}

fn icon_glyph(icon: Option<WeatherIcon>) -> &'static str {
    icon.map(|i| i.glyph()).unwrap_or("·")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use stormdeck_weather::initial_forecast;

    fn render(snapshot: &DashboardSnapshot) -> String {
        let mut renderer = TextRenderer::new(Vec::new());
        renderer.render(snapshot).unwrap();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_loading_placeholder() {
        let text = render(&DashboardSnapshot {
            loading: true,
            cards: Vec::new(),
        });
        assert_eq!(text, "Loading forecasts…\n");
    }

    #[test]
    fn test_sample_card_text() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 10, 5, 0).unwrap();
        let card = CardView::build(&initial_forecast().unwrap(), &now).unwrap();
        let text = render(&DashboardSnapshot {
            loading: false,
            cards: vec![card],
        });

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "New York  ☀ clear-day");
        assert_eq!(lines[1], "  Clear · 20 Jan 2017 10:5");
        assert_eq!(lines[2], "  40°  humidity 74%  wind 4 @ 129°");
        assert!(lines[3].starts_with("  Mon ⛅ 34/34 | Tue ☀ 40/29"));
        assert_eq!(lines[4], "  updated 2017-01-20 10:00:00 UTC");
    }

    #[test]
    fn test_cards_are_separated_by_blank_line() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 10, 5, 0).unwrap();
        let card = CardView::build(&initial_forecast().unwrap(), &now).unwrap();
        let text = render(&DashboardSnapshot {
            loading: false,
            cards: vec![card.clone(), card],
        });
        assert_eq!(text.matches("\n\n").count(), 1);
    }
}
