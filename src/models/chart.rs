//! Chart-ready series and the declarative chart configuration

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

/// A `[date, value]` pair on the time axis
pub type SeriesPoint = (NaiveDate, f64);

/// Confidence interval for one date, serialized as `[date, lower, upper]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalRow {
    pub date: NaiveDate,
    pub lower: f64,
    pub upper: f64,
}

impl IntervalRow {
    pub fn midpoint(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }
}

impl Serialize for IntervalRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.date, self.lower, self.upper).serialize(serializer)
    }
}

/// Every series the chart draws, all anchored on the last observation
///
/// Built by `services::series_builder::build_series`; the interval rows are
/// the one normalized copy of the bounds and every other forecast series is
/// derived from them.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub(crate) anchor: SeriesPoint,
    pub(crate) historical: Vec<SeriesPoint>,
    pub(crate) central: Vec<SeriesPoint>,
    pub(crate) band_polygon: Vec<SeriesPoint>,
    pub(crate) intervals: Vec<IntervalRow>,
}

impl ChartSeries {
    pub fn anchor(&self) -> SeriesPoint {
        self.anchor
    }

    pub fn historical(&self) -> &[SeriesPoint] {
        &self.historical
    }

    /// Midpoint line, starting at the anchor
    pub fn central(&self) -> &[SeriesPoint] {
        &self.central
    }

    /// Closed band outline: anchor, upper bounds forward, lower bounds back
    pub fn band_polygon(&self) -> &[SeriesPoint] {
        &self.band_polygon
    }

    /// Interval lookup rows, anchor row first
    pub fn intervals(&self) -> &[IntervalRow] {
        &self.intervals
    }

    /// False when the trajectory was empty and only the anchor remains
    pub fn has_forecast(&self) -> bool {
        self.intervals.len() > 1
    }

    pub fn historical_at(&self, date: NaiveDate) -> Option<f64> {
        lookup(&self.historical, date)
    }

    pub fn central_at(&self, date: NaiveDate) -> Option<f64> {
        lookup(&self.central, date)
    }

    pub fn interval_at(&self, date: NaiveDate) -> Option<&IntervalRow> {
        self.intervals
            .binary_search_by_key(&date, |row| row.date)
            .ok()
            .map(|idx| &self.intervals[idx])
    }

    /// First and last date across history and forecast
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        let start = self
            .historical
            .first()
            .map(|p| p.0)
            .unwrap_or(self.anchor.0);
        let end = self.central.last().map(|p| p.0).unwrap_or(self.anchor.0);
        (start, end)
    }
}

fn lookup(series: &[SeriesPoint], date: NaiveDate) -> Option<f64> {
    series
        .binary_search_by_key(&date, |p| p.0)
        .ok()
        .map(|idx| series[idx].1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    Time,
    Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    #[serde(rename = "type")]
    pub kind: AxisKind,
    /// When true the axis is fitted to the data instead of starting at zero
    pub scale: bool,
    pub color: &'static str,
}

/// Initial viewport; the full range stays reachable by zooming
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomWindow {
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Percent of the full range
    pub start: f64,
    pub end: f64,
    pub start_value: NaiveDate,
    pub end_value: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    #[serde(rename = "type")]
    pub kind: LineKind,
    pub color: &'static str,
    pub width: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorStop {
    pub offset: f64,
    pub color: &'static str,
}

/// Linear gradient in the unit square of the shape's bounding box
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearGradient {
    pub x: f64,
    pub y: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(rename = "colorStops")]
    pub color_stops: Vec<ColorStop>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaStyle {
    pub color: LinearGradient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Line,
    Polygon,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesConfig {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: SeriesKind,
    pub data: Vec<SeriesPoint>,
    pub show_symbol: bool,
    pub smooth: bool,
    pub line_style: LineStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_style: Option<AreaStyle>,
}

/// Tooltip markup precomputed per hovered date
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipConfig {
    pub trigger: &'static str,
    pub background_color: &'static str,
    pub border_color: &'static str,
    pub entries: BTreeMap<NaiveDate, String>,
}

/// Complete declarative description of the forecast chart
///
/// The JSON follows ECharts naming (`xAxis`, `dataZoom`, `lineStyle`,
/// `areaStyle`) but is this crate's own schema: the band is a `"polygon"`
/// series whose `data` is the closed outline, and `tooltip.entries` maps each
/// date to ready-made markup in place of a formatter callback. A browser
/// adapter maps the polygon onto a custom series and looks tooltips up by
/// the hovered date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    pub background_color: &'static str,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub data_zoom: ZoomWindow,
    pub tooltip: TooltipConfig,
    pub series: Vec<SeriesConfig>,
}

impl ChartConfig {
    pub fn series_named(&self, name: &str) -> Option<&SeriesConfig> {
        self.series.iter().find(|s| s.name == name)
    }
}
