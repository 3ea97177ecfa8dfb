//! Forecast payload to card view-model.
//!
//! Everything here is pure: the caller passes the current time, so the
//! output depends only on the payload and the clock it is given.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc, Weekday};
use serde::Serialize;

use crate::types::{DailyRecord, StampedForecast, WeatherError, WeatherIcon};

/// Number of days shown in the weekly strip
pub const OUTLOOK_DAYS: usize = 7;

// The provider's first record is yesterday's slot; the second is today.
const CURRENT_INDEX: usize = 1;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Which daily temperature the current conditions show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPhase {
    Day,
    Night,
}

impl DayPhase {
    /// Night runs from 19:00 through 04:59.
    pub fn at_hour(hour: u32) -> Self {
        if hour > 18 || hour < 5 {
            Self::Night
        } else {
            Self::Day
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub description: String,
    pub date: String,
    pub phase: DayPhase,
    pub icon: Option<WeatherIcon>,
    pub temperature: i64,
    /// Already formatted, e.g. `"74%"`
    pub humidity: String,
    pub wind_speed: i64,
    pub wind_direction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayOutlook {
    pub weekday: String,
    pub icon: Option<WeatherIcon>,
    pub high: i64,
    pub low: i64,
}

/// Everything a renderer needs to draw one forecast card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub city_id: u64,
    pub location: String,
    pub key: String,
    pub label: String,
    pub created: DateTime<Utc>,
    pub current: CurrentConditions,
    pub days: Vec<DayOutlook>,
}

impl CardView {
    /// Build the card for `forecast` as seen at `now`.
    ///
    /// `now` supplies the viewer's time zone, the displayed hour and minute,
    /// the day/night phase and the weekday labels.
    pub fn build<Tz: TimeZone>(
        forecast: &StampedForecast,
        now: &DateTime<Tz>,
    ) -> Result<Self, WeatherError> {
        let list = &forecast.response.list;
        let today = list.get(CURRENT_INDEX).ok_or_else(|| {
            WeatherError::Parse(format!(
                "forecast for {} has {} daily records, need at least {}",
                forecast.response.city.name,
                list.len(),
                CURRENT_INDEX + 1
            ))
        })?;

        let (date, phase) = format_card_date(today.dt, now)?;
        let temperature = match phase {
            DayPhase::Day => today.temp.day,
            DayPhase::Night => today.temp.night,
        };
        let condition = today.condition();

        let current = CurrentConditions {
            description: condition.map(|c| c.main.clone()).unwrap_or_default(),
            date,
            phase,
            icon: icon_for(today),
            temperature: round_half_up(temperature),
            humidity: format!("{}%", round_half_up(today.humidity)),
            wind_speed: round_half_up(today.speed),
            wind_direction: today.deg,
        };

        let days = list
            .iter()
            .take(OUTLOOK_DAYS)
            .enumerate()
            .map(|(offset, record)| DayOutlook {
                weekday: weekday_after(now.weekday(), offset).to_string(),
                icon: icon_for(record),
                high: round_half_up(record.temp.max),
                low: round_half_up(record.temp.min),
            })
            .collect();

        Ok(Self {
            city_id: forecast.city_id(),
            location: forecast.response.city.name.clone(),
            key: forecast.key.clone(),
            label: forecast.label.clone(),
            created: forecast.created,
            current,
            days,
        })
    }

    pub fn icon_class(&self) -> Option<&'static str> {
        self.current.icon.map(|i| i.css_class())
    }
}

fn icon_for(record: &DailyRecord) -> Option<WeatherIcon> {
    record.condition().and_then(|c| WeatherIcon::from_code(c.id))
}

/// Date of the forecast slot combined with the viewer's current hour and minute.
///
/// The provider pins every daily slot to a fixed hour, so the slot's own time
/// is discarded. The minute is not zero-padded.
pub fn format_card_date<Tz: TimeZone>(
    dt: i64,
    now: &DateTime<Tz>,
) -> Result<(String, DayPhase), WeatherError> {
    let slot = DateTime::from_timestamp(dt, 0)
        .ok_or_else(|| WeatherError::Parse(format!("timestamp {} out of range", dt)))?
        .with_timezone(&now.timezone());

    let month = MONTHS[slot.month0() as usize];
    let text = format!(
        "{} {} {} {}:{}",
        slot.day(),
        month,
        slot.year(),
        now.hour(),
        now.minute()
    );

    Ok((text, DayPhase::at_hour(now.hour())))
}

/// Weekday `offset` days after `start`.
///
/// Labels start at today's real weekday. Older web builds of this dashboard
/// showed every label one day late.
fn weekday_after(start: Weekday, offset: usize) -> Weekday {
    (0..offset % 7).fold(start, |day, _| day.succ())
}

/// Round to the nearest integer, ties toward positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::initial_forecast;
    use chrono::FixedOffset;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.51), -3);
        assert_eq!(round_half_up(40.23), 40);
    }

    #[test]
    fn test_day_phase_boundaries() {
        assert_eq!(DayPhase::at_hour(4), DayPhase::Night);
        assert_eq!(DayPhase::at_hour(5), DayPhase::Day);
        assert_eq!(DayPhase::at_hour(18), DayPhase::Day);
        assert_eq!(DayPhase::at_hour(19), DayPhase::Night);
        assert_eq!(DayPhase::at_hour(0), DayPhase::Night);
    }

    #[test]
    fn test_card_date_uses_slot_date_and_current_clock() {
        // 2017-01-20 17:00 UTC, viewed at 08:07 on another day
        let (text, phase) = format_card_date(1484931600, &at(2026, 10, 19, 8, 7)).unwrap();
        assert_eq!(text, "20 Jan 2017 8:7");
        assert_eq!(phase, DayPhase::Day);
    }

    #[test]
    fn test_card_date_follows_viewer_time_zone() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let now = at(2026, 10, 19, 13, 30).with_timezone(&tokyo);
        // 2017-01-20 17:00 UTC is already the 21st in Tokyo
        let (text, phase) = format_card_date(1484931600, &now).unwrap();
        assert_eq!(text, "21 Jan 2017 22:30");
        assert_eq!(phase, DayPhase::Night);
    }

    #[test]
    fn test_build_from_sample_daytime() {
        let sample = initial_forecast().unwrap();
        // A Monday
        let card = CardView::build(&sample, &at(2026, 10, 19, 10, 0)).unwrap();

        assert_eq!(card.city_id, 5128638);
        assert_eq!(card.location, "New York");
        assert_eq!(card.current.description, "Clear");
        assert_eq!(card.current.temperature, 40);
        assert_eq!(card.current.humidity, "74%");
        assert_eq!(card.current.wind_speed, 4);
        assert_eq!(card.current.wind_direction, 129.0);
        assert_eq!(card.icon_class(), Some("clear-day"));
        assert_eq!(card.created, sample.created);
    }

    #[test]
    fn test_build_uses_night_temperature_after_dark() {
        let sample = initial_forecast().unwrap();
        let card = CardView::build(&sample, &at(2026, 10, 19, 22, 0)).unwrap();
        assert_eq!(card.current.phase, DayPhase::Night);
        assert_eq!(card.current.temperature, 36);
    }

    #[test]
    fn test_outlook_has_seven_days_starting_today() {
        let sample = initial_forecast().unwrap();
        let card = CardView::build(&sample, &at(2026, 10, 19, 10, 0)).unwrap();

        let weekdays: Vec<&str> = card.days.iter().map(|d| d.weekday.as_str()).collect();
        assert_eq!(weekdays, ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);

        assert_eq!(card.days[0].icon, Some(WeatherIcon::PartlyCloudyDay));
        assert_eq!(card.days[2].icon, Some(WeatherIcon::Rain));
        assert_eq!(card.days[4].icon, Some(WeatherIcon::Snow));
        assert_eq!((card.days[6].high, card.days[6].low), (39, 28));
    }

    #[test]
    fn test_short_forecast_renders_available_days() {
        let mut sample = initial_forecast().unwrap();
        sample.response.list.truncate(3);
        let card = CardView::build(&sample, &at(2026, 10, 19, 10, 0)).unwrap();
        assert_eq!(card.days.len(), 3);
    }

    #[test]
    fn test_forecast_without_today_is_rejected() {
        let mut sample = initial_forecast().unwrap();
        sample.response.list.truncate(1);
        let err = CardView::build(&sample, &at(2026, 10, 19, 10, 0)).unwrap_err();
        assert!(matches!(err, WeatherError::Parse(_)));
    }

    #[test]
    fn test_missing_condition_leaves_icon_empty() {
        let mut sample = initial_forecast().unwrap();
        sample.response.list[1].weather.clear();
        let card = CardView::build(&sample, &at(2026, 10, 19, 10, 0)).unwrap();
        assert_eq!(card.current.description, "");
        assert_eq!(card.icon_class(), None);
    }
}
