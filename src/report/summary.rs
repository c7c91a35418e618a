//! Headline statistics printed on the figure.

use crate::report::merge::ReportRow;
use chrono::NaiveDate;
use serde::Serialize;

/// Temperatures from 26 °C to 28 °C count as room temperature.
pub const ROOM_TEMPERATURE_C: std::ops::RangeInclusive<i64> = 26..=28;

/// Wind speeds up to this value are reported as normal.
pub const NORMAL_WIND_KMH: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub cities: usize,
}

/// Headline statistics for a run.
///
/// The most common status is counted over every row, `"Undetermined"` states
/// included. The temperature, wind and average figures only use rows that carry
/// city weather, so a state that had no data is never counted as 0 °C or 0%
/// humidity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSummary {
    pub date: NaiveDate,
    pub cities: usize,
    pub most_common: Option<StatusCount>,
    pub warmer_than_room: usize,
    pub cooler_than_room: usize,
    pub normal_wind: usize,
    pub average_humidity: f64,
    pub average_precipitation: f64,
}

fn mean(values: impl Iterator<Item = u32>, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    values.map(f64::from).sum::<f64>() / count as f64
}

/// The most frequent status; on a tie the one seen first wins.
fn most_common<'a>(statuses: impl Iterator<Item = &'a str>) -> Option<StatusCount> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for status in statuses {
        match counts.iter_mut().find(|(s, _)| *s == status) {
            Some((_, n)) => *n += 1,
            None => counts.push((status, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (status, n) in counts {
        if best.map_or(true, |(_, top)| n > top) {
            best = Some((status, n));
        }
    }
    best.map(|(status, cities)| StatusCount {
        status: status.to_string(),
        cities,
    })
}

impl WeatherSummary {
    pub fn from_rows(rows: &[ReportRow], date: NaiveDate) -> Self {
        let observed: Vec<&ReportRow> = rows.iter().filter(|r| r.has_weather()).collect();
        let cities = observed.len();

        Self {
            date,
            cities,
            most_common: most_common(rows.iter().map(|r| r.status.as_str())),
            warmer_than_room: observed
                .iter()
                .filter(|r| r.temperature_c > *ROOM_TEMPERATURE_C.end())
                .count(),
            cooler_than_room: observed
                .iter()
                .filter(|r| r.temperature_c < *ROOM_TEMPERATURE_C.start())
                .count(),
            normal_wind: observed
                .iter()
                .filter(|r| r.wind_speed_kmh <= NORMAL_WIND_KMH)
                .count(),
            average_humidity: mean(observed.iter().map(|r| r.humidity_pct), cities),
            average_precipitation: mean(observed.iter().map(|r| r.precipitation_pct), cities),
        }
    }

    pub fn title(&self) -> String {
        format!(
            "Weather report in various cities in Nigeria as of {}",
            self.date.format("%Y-%m-%d")
        )
    }

    /// Insight lines shown under the title.
    pub fn lines(&self) -> Vec<String> {
        let mut lines =
            vec!["The data is scraped from google and these insights are made:".to_string()];
        if let Some(top) = &self.most_common {
            lines.push(format!(
                "{} has most occurrences with {} cities in total.",
                top.status, top.cities
            ));
        } else {
            lines.push("No city weather could be collected.".to_string());
        }
        lines.push(format!(
            "{} cities have a temperature higher than room temperature and {} have lower.",
            self.warmer_than_room, self.cooler_than_room
        ));
        lines.push(format!(
            "{} cities experience a normal wind speed of {}km/h or less.",
            self.normal_wind, NORMAL_WIND_KMH
        ));
        lines.push(format!(
            "The average humidity is {:.2}%.",
            self.average_humidity
        ));
        lines.push(format!(
            "The average precipitation is {:.2}%.",
            self.average_precipitation
        ));
        lines
    }
}
