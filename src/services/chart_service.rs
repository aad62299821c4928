//! Chart configuration, tooltip composition and static rendering

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use plotters::prelude::*;
use thiserror::Error;
use tracing::{debug, error};

use super::page_service::LOAD_ERROR_MESSAGE;
use super::series_builder::{build_series, BuilderError};
use crate::models::chart::{
    AreaStyle, Axis, AxisKind, ColorStop, LineKind, LineStyle, LinearGradient, SeriesConfig,
    SeriesKind, TooltipConfig, ZoomWindow,
};
use crate::models::{ChartConfig, ChartSeries, ForecastDataset, SeriesPoint};
use crate::utils::dates::midnight_utc;
use crate::utils::DisplayLocale;

pub const HISTORICAL_SERIES: &str = "Histórico";
pub const CENTRAL_SERIES: &str = "Predicción Central";
pub const BAND_SERIES: &str = "Intervalo de Confianza";

/// Quote currency of every value on the chart
pub const CURRENCY: &str = "ARS";

/// Days of history shown left of the anchor in the initial viewport
const ZOOM_LOOKBACK_DAYS: i64 = 15;

mod tokens {
    pub const SURFACE: &str = "#161B22";
    pub const PRIMARY: &str = "#2F81F7";
    pub const SECONDARY: &str = "#FF7F0E";
    pub const TEXT_SECONDARY: &str = "#8B949E";
    pub const BAND_TOP: &str = "rgba(255, 127, 14, 0.5)";
    pub const BAND_BOTTOM: &str = "rgba(255, 127, 14, 0.05)";
}

const BASE_RGB: RGBColor = RGBColor(0x0D, 0x11, 0x17);
const PRIMARY_RGB: RGBColor = RGBColor(0x2F, 0x81, 0xF7);
const SECONDARY_RGB: RGBColor = RGBColor(0xFF, 0x7F, 0x0E);
const TEXT_SECONDARY_RGB: RGBColor = RGBColor(0x8B, 0x94, 0x9E);

/// Build the full chart configuration for one dataset
pub fn build_chart_config(
    dataset: &ForecastDataset,
    locale: DisplayLocale,
) -> Result<ChartConfig, BuilderError> {
    let series = build_series(&dataset.historical, &dataset.prediction)?;

    let mut configs = vec![SeriesConfig {
        name: HISTORICAL_SERIES,
        kind: SeriesKind::Line,
        data: series.historical().to_vec(),
        show_symbol: false,
        smooth: true,
        line_style: line(LineKind::Solid),
        area_style: None,
    }];

    if series.has_forecast() {
        configs.push(SeriesConfig {
            name: CENTRAL_SERIES,
            kind: SeriesKind::Line,
            data: series.central().to_vec(),
            show_symbol: false,
            smooth: true,
            line_style: line(LineKind::Dashed),
            area_style: None,
        });
        configs.push(SeriesConfig {
            name: BAND_SERIES,
            kind: SeriesKind::Polygon,
            data: series.band_polygon().to_vec(),
            show_symbol: false,
            smooth: false,
            line_style: LineStyle {
                kind: LineKind::Solid,
                color: tokens::SECONDARY,
                width: 0.0,
                opacity: 0.0,
            },
            area_style: Some(AreaStyle {
                color: LinearGradient {
                    x: 0.0,
                    y: 0.0,
                    x2: 0.0,
                    y2: 1.0,
                    color_stops: vec![
                        ColorStop { offset: 0.0, color: tokens::BAND_TOP },
                        ColorStop { offset: 1.0, color: tokens::BAND_BOTTOM },
                    ],
                },
            }),
        });
    } else {
        debug!("Trajectory is empty, rendering history only");
    }

    let tooltip = Tooltip::new(&series, locale);

    Ok(ChartConfig {
        background_color: "transparent",
        x_axis: Axis {
            kind: AxisKind::Time,
            scale: false,
            color: tokens::TEXT_SECONDARY,
        },
        y_axis: Axis {
            kind: AxisKind::Value,
            scale: true,
            color: tokens::TEXT_SECONDARY,
        },
        data_zoom: default_zoom(&series),
        tooltip: TooltipConfig {
            trigger: "axis",
            background_color: tokens::SURFACE,
            border_color: tokens::TEXT_SECONDARY,
            entries: tooltip.entries(),
        },
        series: configs,
    })
}

fn line(kind: LineKind) -> LineStyle {
    LineStyle {
        kind,
        color: tokens::PRIMARY,
        width: 2.5,
        opacity: 1.0,
    }
}

/// From a couple of weeks before the anchor to the end of the horizon
fn default_zoom(series: &ChartSeries) -> ZoomWindow {
    let (first, last) = series.date_range();
    let start_value = (series.anchor().0 - Duration::days(ZOOM_LOOKBACK_DAYS)).max(first);

    let total_days = (last - first).num_days();
    let start = if total_days > 0 {
        (start_value - first).num_days() as f64 / total_days as f64 * 100.0
    } else {
        0.0
    };

    ZoomWindow {
        kind: "inside",
        start,
        end: 100.0,
        start_value,
        end_value: last,
    }
}

/// One line of the tooltip
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TooltipRow {
    Historical(f64),
    Central(f64),
    Interval { lower: f64, upper: f64 },
}

impl TooltipRow {
    pub fn label(&self) -> &'static str {
        match self {
            TooltipRow::Historical(_) => HISTORICAL_SERIES,
            TooltipRow::Central(_) => CENTRAL_SERIES,
            TooltipRow::Interval { .. } => "Intervalo",
        }
    }

    fn marker_color(&self) -> &'static str {
        match self {
            TooltipRow::Historical(_) | TooltipRow::Central(_) => tokens::PRIMARY,
            TooltipRow::Interval { .. } => tokens::BAND_TOP,
        }
    }

    pub fn value_text(&self, locale: DisplayLocale) -> String {
        match self {
            TooltipRow::Historical(v) | TooltipRow::Central(v) => locale.format_currency(*v, CURRENCY),
            TooltipRow::Interval { lower, upper } => format!(
                "{} - {}",
                locale.format_number(*lower, 2),
                locale.format_currency(*upper, CURRENCY)
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub date_label: String,
    pub rows: Vec<TooltipRow>,
    locale: DisplayLocale,
}

impl TooltipContent {
    pub fn to_html(&self) -> String {
        let mut html = format!("{}<br />", self.date_label);
        for row in &self.rows {
            html.push_str(&format!(
                "<span style=\"display:inline-block;margin-right:4px;border-radius:10px;width:10px;height:10px;background-color:{};\"></span> {}: <strong>{}</strong><br />",
                row.marker_color(),
                row.label(),
                row.value_text(self.locale)
            ));
        }
        html
    }
}

/// Composes tooltips by looking the hovered date up in each series
pub struct Tooltip<'a> {
    series: &'a ChartSeries,
    locale: DisplayLocale,
}

impl<'a> Tooltip<'a> {
    pub fn new(series: &'a ChartSeries, locale: DisplayLocale) -> Self {
        Self { series, locale }
    }

    /// Tooltip for a hovered date, or `None` when no series has a value there
    ///
    /// The anchor date shows only the historical value: its forecast and
    /// interval rows are copies of it.
    pub fn describe(&self, date: NaiveDate) -> Option<TooltipContent> {
        let mut rows = Vec::new();

        if let Some(value) = self.series.historical_at(date) {
            rows.push(TooltipRow::Historical(value));
        }
        if date != self.series.anchor().0 {
            if let Some(value) = self.series.central_at(date) {
                rows.push(TooltipRow::Central(value));
            }
            if let Some(row) = self.series.interval_at(date) {
                rows.push(TooltipRow::Interval {
                    lower: row.lower,
                    upper: row.upper,
                });
            }
        }

        if rows.is_empty() {
            return None;
        }

        Some(TooltipContent {
            date_label: self.locale.format_short_date(date),
            rows,
            locale: self.locale,
        })
    }

    /// Rendered markup for every date on the chart
    pub fn entries(&self) -> BTreeMap<NaiveDate, String> {
        let dates: BTreeSet<NaiveDate> = self
            .series
            .historical()
            .iter()
            .chain(self.series.central())
            .map(|p| p.0)
            .collect();

        dates
            .into_iter()
            .filter_map(|date| self.describe(date).map(|content| (date, content.to_html())))
            .collect()
    }
}

/// What the chart region shows
#[derive(Debug, Clone, PartialEq)]
pub enum ChartView {
    Loading,
    Error(String),
    Chart(Arc<ChartConfig>),
}

/// Holds the configuration for the current dataset
///
/// A different dataset (by identity) always rebuilds the whole configuration;
/// nothing from a previous render is merged in.
pub struct ChartRenderer {
    locale: DisplayLocale,
    current: Option<(Arc<ForecastDataset>, Arc<ChartConfig>)>,
}

impl ChartRenderer {
    pub fn new(locale: DisplayLocale) -> Self {
        Self {
            locale,
            current: None,
        }
    }

    pub fn render(&mut self, dataset: &Arc<ForecastDataset>) -> Result<Arc<ChartConfig>, BuilderError> {
        if let Some((data, config)) = &self.current {
            if Arc::ptr_eq(data, dataset) {
                return Ok(Arc::clone(config));
            }
        }

        self.current = None;
        let config = Arc::new(build_chart_config(dataset, self.locale)?);
        self.current = Some((Arc::clone(dataset), Arc::clone(&config)));
        Ok(config)
    }

    /// Chart region for possibly-missing data; never panics
    pub fn view(&mut self, dataset: Option<&Arc<ForecastDataset>>) -> ChartView {
        let Some(dataset) = dataset else {
            return ChartView::Loading;
        };

        match self.render(dataset) {
            Ok(config) => ChartView::Chart(config),
            Err(e) => {
                error!("Chart construction refused: {}", e);
                ChartView::Error(LOAD_ERROR_MESSAGE.to_string())
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Nothing to draw in the chart window")]
    EmptyWindow,
    #[error("Failed to {stage}: {message}")]
    Draw { stage: &'static str, message: String },
}

fn draw_err<E: std::fmt::Display>(stage: &'static str) -> impl Fn(E) -> RenderError {
    move |e| RenderError::Draw {
        stage,
        message: e.to_string(),
    }
}

/// Render the initial viewport of a chart configuration as SVG
///
/// The band is filled with a flat translucent color; the gradient is left to
/// interactive renderers.
pub fn render_svg(config: &ChartConfig, width: u32, height: u32) -> Result<String, RenderError> {
    let window = &config.data_zoom;
    let visible = |p: &&SeriesPoint| p.0 >= window.start_value && p.0 <= window.end_value;
    let to_time = |p: &SeriesPoint| (midnight_utc(p.0), p.1);

    let (min_price, max_price) = config
        .series
        .iter()
        .flat_map(|s| s.data.iter())
        .filter(visible)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.1), hi.max(p.1))
        });
    if !min_price.is_finite() || !max_price.is_finite() {
        return Err(RenderError::EmptyWindow);
    }

    // Pad the fitted range so lines don't touch the frame
    let price_range = (max_price - min_price).max(1e-8);
    let padding = price_range * 0.1;
    let y_min = (min_price - padding).max(0.0);
    let y_max = max_price + padding;

    let x_min: DateTime<Utc> = midnight_utc(window.start_value);
    let mut x_max: DateTime<Utc> = midnight_utc(window.end_value);
    if x_max <= x_min {
        x_max = x_min + Duration::days(1);
    }

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        root.fill(&BASE_RGB).map_err(draw_err("fill canvas"))?;

        let mut chart = ChartBuilder::on(&root)
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(draw_err("build chart"))?;

        chart
            .configure_mesh()
            .axis_style(&TEXT_SECONDARY_RGB)
            .bold_line_style(&TEXT_SECONDARY_RGB.mix(0.15))
            .light_line_style(&TRANSPARENT)
            .label_style(("sans-serif", 14).into_font().color(&TEXT_SECONDARY_RGB))
            .x_label_formatter(&|ts: &DateTime<Utc>| ts.format("%d/%m").to_string())
            .y_label_formatter(&|v: &f64| format!("{:.0}", v))
            .draw()
            .map_err(draw_err("draw mesh"))?;

        // Band first so both lines stay on top of it
        for series in config.series.iter().filter(|s| s.kind == SeriesKind::Polygon) {
            let points: Vec<_> = series.data.iter().map(to_time).collect();
            chart
                .draw_series(std::iter::once(Polygon::new(
                    points,
                    SECONDARY_RGB.mix(0.25).filled(),
                )))
                .map_err(draw_err("draw confidence band"))?;
        }

        for series in config.series.iter().filter(|s| s.kind == SeriesKind::Line) {
            let points: Vec<_> = series.data.iter().filter(visible).map(to_time).collect();
            let style = PRIMARY_RGB.stroke_width(2);
            match series.line_style.kind {
                LineKind::Solid => chart
                    .draw_series(LineSeries::new(points, style))
                    .map_err(draw_err("draw line"))?,
                LineKind::Dashed => chart
                    .draw_series(DashedLineSeries::new(points, 10, 6, style))
                    .map_err(draw_err("draw dashed line"))?,
            };
        }

        root.present().map_err(draw_err("render chart"))?;
    }

    Ok(svg)
}
