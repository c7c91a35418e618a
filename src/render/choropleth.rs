//! Draws the state map colored by weather status, with legend and summary text.

use crate::geography::boundaries::StateBoundary;
use crate::render::error::RenderError;
use crate::report::merge::ReportRow;
use crate::report::palette::{Rgb, StatusPalette};
use geo::{Coord, LineString, Rect};
use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use std::path::Path;
use std::sync::OnceLock;

const MARGIN: i32 = 20;
const LEGEND_WIDTH: i32 = 300;
const CREDIT_BAND: i32 = 50;
const TITLE_SIZE: i32 = 30;
const LINE_SIZE: i32 = 20;
const LINE_SPACING: i32 = 28;
const SWATCH: i32 = 20;

const FONT_FAMILY: &str = "sans-serif";
static FONT_DATA: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");
static FONT_REGISTERED: OnceLock<bool> = OnceLock::new();

const EDGE: RGBColor = RGBColor(204, 204, 204);
const MISSING: RGBColor = RGBColor(255, 255, 255);

impl From<Rgb> for RGBColor {
    fn from(color: Rgb) -> Self {
        RGBColor(color.0, color.1, color.2)
    }
}

fn draw_error(e: impl std::fmt::Display) -> RenderError {
    RenderError::Draw(e.to_string())
}

/// Makes the bundled font available to every text element, once per process.
pub fn register_bundled_font() -> Result<(), RenderError> {
    let registered = *FONT_REGISTERED
        .get_or_init(|| register_font(FONT_FAMILY, FontStyle::Normal, FONT_DATA).is_ok());
    if registered {
        Ok(())
    } else {
        Err(RenderError::Font(FONT_FAMILY))
    }
}

/// Pixel box `(left, top, width, height)` left for the map once the text band,
/// the legend column and the credit band are taken out.
pub fn map_area(size: (u32, u32), line_count: usize) -> Result<(i32, i32, i32, i32), RenderError> {
    let (width, height) = (size.0 as i32, size.1 as i32);
    let text_band = MARGIN + TITLE_SIZE + 12 + LINE_SPACING * line_count as i32;
    let area = (
        MARGIN,
        text_band + MARGIN,
        width - LEGEND_WIDTH - 2 * MARGIN,
        height - text_band - CREDIT_BAND - 2 * MARGIN,
    );
    if area.2 <= 0 || area.3 <= 0 {
        return Err(RenderError::FigureTooSmall {
            width: size.0,
            height: size.1,
        });
    }
    Ok(area)
}

/// Maps lon/lat onto pixels, keeping the aspect ratio and centering the map in
/// its box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    min_x: f64,
    max_y: f64,
    scale: f64,
    offset: (f64, f64),
}

impl Projection {
    /// Fits `extent` into the pixel box `(left, top, width, height)`.
    pub fn fit(extent: Rect<f64>, area: (i32, i32, i32, i32)) -> Result<Self, RenderError> {
        let (left, top, width, height) = area;
        let (ext_w, ext_h) = (extent.width(), extent.height());
        if !(ext_w > 0.0 || ext_h > 0.0) || width <= 0 || height <= 0 {
            return Err(RenderError::EmptyExtent);
        }

        let scale_x = if ext_w > 0.0 { width as f64 / ext_w } else { f64::INFINITY };
        let scale_y = if ext_h > 0.0 { height as f64 / ext_h } else { f64::INFINITY };
        let scale = scale_x.min(scale_y);

        Ok(Self {
            min_x: extent.min().x,
            max_y: extent.max().y,
            scale,
            offset: (
                left as f64 + (width as f64 - ext_w * scale) / 2.0,
                top as f64 + (height as f64 - ext_h * scale) / 2.0,
            ),
        })
    }

    pub fn project(&self, c: Coord<f64>) -> (i32, i32) {
        (
            (self.offset.0 + (c.x - self.min_x) * self.scale).round() as i32,
            (self.offset.1 + (self.max_y - c.y) * self.scale).round() as i32,
        )
    }

    fn ring(&self, ring: &LineString<f64>) -> Vec<(i32, i32)> {
        ring.coords().map(|c| self.project(*c)).collect()
    }
}

/// Bounding box around every boundary.
pub fn extent(boundaries: &[StateBoundary]) -> Option<Rect<f64>> {
    boundaries
        .iter()
        .filter_map(StateBoundary::bounds)
        .reduce(|a, b| {
            Rect::new(
                Coord {
                    x: a.min().x.min(b.min().x),
                    y: a.min().y.min(b.min().y),
                },
                Coord {
                    x: a.max().x.max(b.max().x),
                    y: a.max().y.max(b.max().y),
                },
            )
        })
}

/// Fills each row's state with its status color and outlines it.
///
/// Rows are drawn in order, so when a state has several cities the last one
/// decides the fill.
pub fn draw_regions<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    projection: &Projection,
    boundaries: &[StateBoundary],
    rows: &[ReportRow],
    palette: &StatusPalette,
) -> Result<(), RenderError> {
    for row in rows {
        let boundary = boundaries
            .get(row.boundary_idx as usize)
            .ok_or(RenderError::BoundaryIndex(row.boundary_idx, boundaries.len()))?;
        let fill: RGBColor = palette
            .color(&row.status)
            .map(RGBColor::from)
            .unwrap_or(MISSING);

        for polygon in &boundary.geometry {
            let exterior = projection.ring(polygon.exterior());
            area.draw(&Polygon::new(exterior.clone(), fill.filled()))
                .map_err(draw_error)?;
            area.draw(&PathElement::new(exterior, EDGE.stroke_width(1)))
                .map_err(draw_error)?;
            for interior in polygon.interiors() {
                area.draw(&PathElement::new(projection.ring(interior), EDGE.stroke_width(1)))
                    .map_err(draw_error)?;
            }
        }
    }
    Ok(())
}

fn draw_text<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    text: &str,
    at: (i32, i32),
    size: i32,
) -> Result<(), RenderError> {
    area.draw(&Text::new(
        text.to_string(),
        at,
        (FONT_FAMILY, size).into_font().color(&BLACK),
    ))
    .map_err(draw_error)
}

fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    origin: (i32, i32),
    legend: &[String],
    palette: &StatusPalette,
) -> Result<(), RenderError> {
    let (x, mut y) = origin;
    draw_text(area, "Weather Status", (x, y), LINE_SIZE)?;
    y += LINE_SPACING + 4;

    for status in legend {
        let color: RGBColor = palette
            .color(status)
            .map(RGBColor::from)
            .unwrap_or(MISSING);
        area.draw(&Rectangle::new([(x, y), (x + SWATCH, y + SWATCH)], color.filled()))
            .map_err(draw_error)?;
        area.draw(&Rectangle::new([(x, y), (x + SWATCH, y + SWATCH)], EDGE.stroke_width(1)))
            .map_err(draw_error)?;
        draw_text(area, status, (x + SWATCH + 10, y + 2), LINE_SIZE - 2)?;
        y += LINE_SPACING;
    }
    Ok(())
}

/// Renders the full figure to a PNG.
#[bon::builder]
pub fn render_choropleth(
    path: &Path,
    boundaries: &[StateBoundary],
    rows: &[ReportRow],
    palette: &StatusPalette,
    legend: &[String],
    title: &str,
    lines: &[String],
    credit: &str,
    size: (u32, u32),
) -> Result<(), RenderError> {
    let (width, height) = (size.0 as i32, size.1 as i32);
    let area = map_area(size, lines.len())?;
    let projection = Projection::fit(extent(boundaries).ok_or(RenderError::EmptyExtent)?, area)?;
    register_bundled_font()?;

    let dwg = BitMapBackend::new(path, size).into_drawing_area();
    dwg.fill(&WHITE).map_err(draw_error)?;

    draw_text(&dwg, title, (MARGIN, MARGIN), TITLE_SIZE)?;
    for (i, line) in lines.iter().enumerate() {
        draw_text(
            &dwg,
            line,
            (MARGIN, MARGIN + TITLE_SIZE + 12 + LINE_SPACING * i as i32),
            LINE_SIZE,
        )?;
    }

    draw_regions(&dwg, &projection, boundaries, rows, palette)?;
    draw_legend(&dwg, (width - LEGEND_WIDTH, area.1), legend, palette)?;
    draw_text(
        &dwg,
        credit,
        (width - LEGEND_WIDTH, height - CREDIT_BAND),
        LINE_SIZE + 4,
    )?;

    dwg.present()
        .map_err(|e| RenderError::Write(path.to_path_buf(), e.to_string()))?;
    info!("Figure saved to {}", path.display());
    Ok(())
}
