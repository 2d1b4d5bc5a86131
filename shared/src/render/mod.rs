//! SVG rendering of day counts as a calendar heatmap.
//!
//! Rendering is a pure function of the counts, the range and a
//! [`HeatmapStyle`]. Canvas size depends only on the style, so it is the
//! same for every request using the same configuration.

pub mod fallback;
pub mod layout;
pub mod palette;

use chrono::Weekday;
use std::fmt::Write;

use crate::aggregate::DayCounts;
use crate::calendar::{day_key, CalendarRange};

pub use fallback::fallback_document;
pub use layout::{CalendarGrid, CellKind, GridCell, Layout};
pub use palette::{Band, ColorBand};

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const FONT_FAMILY: &str = "-apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif";

/// Cell and margin sizes in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub cell_size: u32,
    pub spacing: u32,
    pub corner_radius: u32,
    /// Left reservation for weekday labels
    pub weekday_label_width: u32,
    /// Top reservation for month labels
    pub month_label_height: u32,
    /// Bottom reservation for the summary line
    pub summary_height: u32,
}

impl Geometry {
    /// Default sizes for a layout.
    pub fn for_layout(layout: Layout) -> Self {
        match layout {
            Layout::WeekColumn => Self {
                cell_size: 16,
                spacing: 2,
                corner_radius: 0,
                weekday_label_width: 36,
                month_label_height: 20,
                summary_height: 20,
            },
            Layout::MonthBlock => Self {
                cell_size: 14,
                spacing: 4,
                corner_radius: 2,
                weekday_label_width: 36,
                month_label_height: 20,
                summary_height: 20,
            },
        }
    }

    fn pitch(&self) -> u32 {
        self.cell_size + self.spacing
    }
}

/// Independently toggleable decorations around the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decorations {
    pub weekday_labels: bool,
    pub month_labels: bool,
    pub summary: bool,
}

impl Default for Decorations {
    fn default() -> Self {
        Self {
            weekday_labels: true,
            month_labels: true,
            summary: true,
        }
    }
}

/// Everything that shapes the document apart from the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeatmapStyle {
    pub layout: Layout,
    pub geometry: Geometry,
    pub decorations: Decorations,
    pub palette: ColorBand,
}

impl HeatmapStyle {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            geometry: Geometry::for_layout(layout),
            decorations: Decorations::default(),
            palette: ColorBand::default(),
        }
    }

    pub fn with_decorations(mut self, decorations: Decorations) -> Self {
        self.decorations = decorations;
        self
    }

    pub fn with_palette(mut self, palette: ColorBand) -> Self {
        self.palette = palette;
        self
    }

    fn grid_left(&self) -> u32 {
        let labels = if self.decorations.weekday_labels {
            self.geometry.weekday_label_width
        } else {
            0
        };
        labels + self.geometry.spacing
    }

    fn grid_top(&self) -> u32 {
        let labels = if self.decorations.month_labels {
            self.geometry.month_label_height
        } else {
            0
        };
        labels + self.geometry.spacing
    }

    /// Canvas `(width, height)` in pixels.
    pub fn canvas_size(&self) -> (u32, u32) {
        let pitch = self.geometry.pitch();
        let width = self.grid_left() + self.layout.columns() as u32 * pitch;
        let summary = if self.decorations.summary {
            self.geometry.summary_height
        } else {
            0
        };
        let height = self.grid_top() + 7 * pitch + summary;
        (width, height)
    }

    fn cell_origin(&self, column: usize, row: usize) -> (u32, u32) {
        let pitch = self.geometry.pitch();
        (
            self.grid_left() + column as u32 * pitch,
            self.grid_top() + row as u32 * pitch,
        )
    }
}

impl Default for HeatmapStyle {
    fn default() -> Self {
        Self::new(Layout::default())
    }
}

/// Render `counts` over `range` as an SVG document.
///
/// Days missing from `counts` render as zero. The output is byte-identical
/// for identical inputs.
pub fn render(counts: &DayCounts, range: &CalendarRange, style: &HeatmapStyle) -> String {
    let grid = CalendarGrid::build(range, style.layout);
    let (width, height) = style.canvas_size();
    let geometry = &style.geometry;
    let mut svg = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(
        svg,
        r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg" font-family="{font}">"#,
        w = width,
        h = height,
        font = FONT_FAMILY,
    );

    if style.decorations.weekday_labels {
        for (row, weekday) in grid.row_weekdays.iter().enumerate() {
            let (_, y) = style.cell_origin(0, row);
            let _ = writeln!(
                svg,
                r##"  <text x="{}" y="{}" font-size="9" fill="#999">{}</text>"##,
                geometry.spacing,
                y + geometry.cell_size / 2 + 3,
                weekday_label(*weekday),
            );
        }
    }

    if style.decorations.month_labels {
        let y = style.grid_top().saturating_sub(6);
        for start in &grid.month_starts {
            let (x, _) = style.cell_origin(start.column, 0);
            let _ = writeln!(
                svg,
                r##"  <text x="{}" y="{}" font-size="10" fill="#586069">{}</text>"##,
                x,
                y,
                MONTH_LABELS[start.month as usize - 1],
            );
        }
    }

    let mut total: u64 = 0;
    for cell in &grid.cells {
        let (x, y) = style.cell_origin(cell.column, cell.row);
        match cell.kind {
            CellKind::Day(day) => {
                let count = counts.get(day);
                total += u64::from(count);
                let _ = writeln!(
                    svg,
                    r#"  <rect x="{x}" y="{y}" width="{s}" height="{s}" rx="{r}" ry="{r}" fill="{fill}"><title>{key}: {count} entries</title></rect>"#,
                    s = geometry.cell_size,
                    r = geometry.corner_radius,
                    fill = style.palette.color_for(count),
                    key = day_key(day),
                );
            }
            CellKind::Padding => {
                let _ = writeln!(
                    svg,
                    r#"  <rect x="{x}" y="{y}" width="{s}" height="{s}" fill="none"/>"#,
                    s = geometry.cell_size,
                );
            }
        }
    }

    if style.decorations.summary {
        let _ = writeln!(
            svg,
            r##"  <text x="{}" y="{}" font-size="12" fill="#333">Total: {} entries in {}</text>"##,
            style.grid_left(),
            height.saturating_sub(5),
            total,
            range.year(),
        );
    }

    svg.push_str("</svg>");
    svg
}

fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sun",
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
    }
}

/// Escape text for use in SVG content or attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
