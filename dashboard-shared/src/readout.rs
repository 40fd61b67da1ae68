//! Human-facing readouts derived from the dashboard state.

use crate::series::StatsView;
use crate::types::Channel;

/// Raw ADC value corresponding to full-scale light.
pub const LIGHT_FULL_SCALE: f64 = 1023.0;

const COLD_BELOW_C: f64 = 18.0;
const HOT_ABOVE_C: f64 = 26.0;

/// Qualitative temperature classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comfort {
    Cold,
    Comfortable,
    Hot,
}

impl Comfort {
    pub fn classify(temperature_c: f64) -> Self {
        if temperature_c < COLD_BELOW_C {
            Comfort::Cold
        } else if temperature_c > HOT_ABOVE_C {
            Comfort::Hot
        } else {
            Comfort::Comfortable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Comfort::Cold => "cold",
            Comfort::Comfortable => "comfortable",
            Comfort::Hot => "hot",
        }
    }
}

impl std::fmt::Display for Comfort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Light reading as a whole percentage of full scale, rounded to nearest.
pub fn light_percent(raw: f64) -> i64 {
    (raw / LIGHT_FULL_SCALE * 100.0).round() as i64
}

/// Format a channel value the way the stats table shows it.
pub fn format_value(channel: Channel, value: f64) -> String {
    match channel {
        Channel::Temperature => format!("{value:.1} °C"),
        Channel::Humidity => format!("{value:.1} %"),
        Channel::Light => format!("{value:.0}"),
    }
}

pub fn format_light_percent(raw: f64) -> String {
    format!("{} %", light_percent(raw))
}

pub fn mode_label(is_auto: Option<bool>) -> &'static str {
    match is_auto {
        None => "--",
        Some(true) => "Auto",
        Some(false) => "Manual",
    }
}

pub fn relay_label(relay_on: Option<bool>) -> &'static str {
    match relay_on {
        None => "--",
        Some(true) => "On",
        Some(false) => "Off",
    }
}

/// Short relay readout next to the live values.
pub fn relay_readout(relay_on: Option<bool>) -> &'static str {
    match relay_on {
        None => "--",
        Some(true) => "ON",
        Some(false) => "OFF",
    }
}

/// One stats-table row. Cells are `None` until the channel has data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatsRow {
    pub now: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
    pub avg: Option<String>,
}

impl StatsRow {
    pub fn from_view(channel: Channel, view: &StatsView) -> Self {
        let fmt = |v: Option<f64>| v.map(|v| format_value(channel, v));
        Self {
            now: fmt(view.current),
            min: fmt(view.min),
            max: fmt(view.max),
            avg: fmt(view.avg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comfort_boundaries() {
        assert_eq!(Comfort::classify(17.9), Comfort::Cold);
        assert_eq!(Comfort::classify(18.0), Comfort::Comfortable);
        assert_eq!(Comfort::classify(26.0), Comfort::Comfortable);
        assert_eq!(Comfort::classify(26.1), Comfort::Hot);
        assert_eq!(Comfort::classify(21.5).as_str(), "comfortable");
    }

    #[test]
    fn test_light_percent_rounding() {
        assert_eq!(light_percent(1023.0), 100);
        assert_eq!(light_percent(0.0), 0);
        assert_eq!(light_percent(512.0), 50);
        assert_eq!(format_light_percent(1023.0), "100 %");
    }

    #[test]
    fn test_value_formatting() {
        assert_eq!(format_value(Channel::Temperature, 21.54), "21.5 °C");
        assert_eq!(format_value(Channel::Humidity, 45.0), "45.0 %");
        assert_eq!(format_value(Channel::Light, 812.4), "812");
    }

    #[test]
    fn test_state_labels() {
        assert_eq!(mode_label(None), "--");
        assert_eq!(mode_label(Some(true)), "Auto");
        assert_eq!(relay_label(Some(false)), "Off");
        assert_eq!(relay_readout(Some(true)), "ON");
    }

    #[test]
    fn test_stats_row_empty_until_data() {
        let row = StatsRow::from_view(Channel::Light, &StatsView::default());
        assert_eq!(row, StatsRow::default());

        let row = StatsRow::from_view(
            Channel::Light,
            &StatsView {
                current: Some(100.0),
                min: Some(50.0),
                max: Some(100.0),
                avg: Some(75.6),
            },
        );
        assert_eq!(row.avg.as_deref(), Some("76"));
        assert_eq!(row.now.as_deref(), Some("100"));
    }
}
