use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::path::Path;

use crate::session::{BossRecord, Session};

pub const TIMELINE_WIDTH: u32 = 1600;
pub const TIMELINE_HEIGHT: u32 = 800;

const MARGIN_LEFT: f64 = 120.0;
const MARGIN_RIGHT: f64 = 230.0;
const MARGIN_TOP: f64 = 90.0;
const MARGIN_BOTTOM: f64 = 80.0;
const BAR_PADDING_RATIO: f64 = 0.18;
const TIME_TICK_COUNT: usize = 5;
const FONT_FAMILY: &str = "Segoe UI, Helvetica, sans-serif";

/// One fill per wing, cycled in order of first appearance.
const WING_PALETTE: [&str; 7] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#17becf",
];

/// Renders the session as a Gantt-style timeline: one bar row per boss
/// spanning its total pull window, colored by wing, with the boss name
/// inside the bar and the pull count on the axis.
pub fn render_timeline_svg(session: &Session) -> String {
    let bosses: Vec<&BossRecord> = session
        .wings
        .iter()
        .flat_map(|wing| wing.bosses.iter())
        .collect();

    let wing_labels: Vec<&str> = {
        let mut labels: Vec<&str> = Vec::new();
        for wing in &session.wings {
            if !labels.contains(&wing.wing_label.as_str()) {
                labels.push(wing.wing_label.as_str());
            }
        }
        labels
    };

    let time_min = bosses
        .iter()
        .map(|boss| boss.total_start_time)
        .min()
        .unwrap_or(session.start_time);
    let time_max = bosses
        .iter()
        .map(|boss| boss.total_end_time)
        .max()
        .unwrap_or(session.end_time);
    let span_seconds = ((time_max - time_min).num_seconds().max(1)) as f64;

    let width = f64::from(TIMELINE_WIDTH);
    let height = f64::from(TIMELINE_HEIGHT);
    let plot_width = width - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = height - MARGIN_TOP - MARGIN_BOTTOM;
    let row_height = plot_height / bosses.len().max(1) as f64;

    let scale_x = |time: DateTime<Utc>| -> f64 {
        MARGIN_LEFT + (time - time_min).num_seconds() as f64 / span_seconds * plot_width
    };

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns='http://www.w3.org/2000/svg' width='{TIMELINE_WIDTH}' height='{TIMELINE_HEIGHT}' viewBox='0 0 {TIMELINE_WIDTH} {TIMELINE_HEIGHT}' role='img'>"
    );
    let _ = writeln!(svg, "  <rect width='{width:.0}' height='{height:.0}' fill='#ffffff'/>");
    let _ = writeln!(
        svg,
        "  <text x='{:.0}' y='48' fill='#111111' font-family='{FONT_FAMILY}' font-size='30' font-weight='700'>Weekly Clear Timeline</text>",
        MARGIN_LEFT
    );

    // Plot frame and time ticks.
    let _ = writeln!(
        svg,
        "  <rect x='{MARGIN_LEFT:.0}' y='{MARGIN_TOP:.0}' width='{plot_width:.0}' height='{plot_height:.0}' fill='none' stroke='#cccccc'/>"
    );
    for tick_index in 0..=TIME_TICK_COUNT {
        let fraction = tick_index as f64 / TIME_TICK_COUNT as f64;
        let tick_x = MARGIN_LEFT + fraction * plot_width;
        let tick_time =
            time_min + chrono::Duration::seconds((fraction * span_seconds).round() as i64);
        let _ = writeln!(
            svg,
            "  <line x1='{tick_x:.1}' y1='{MARGIN_TOP:.0}' x2='{tick_x:.1}' y2='{:.0}' stroke='#eeeeee'/>",
            MARGIN_TOP + plot_height
        );
        let _ = writeln!(
            svg,
            "  <text x='{tick_x:.1}' y='{:.0}' fill='#444444' font-family='{FONT_FAMILY}' font-size='18' text-anchor='middle'>{}</text>",
            MARGIN_TOP + plot_height + 28.0,
            tick_time.format("%H:%M")
        );
    }
    let _ = writeln!(
        svg,
        "  <text x='{:.0}' y='{:.0}' fill='#111111' font-family='{FONT_FAMILY}' font-size='22' text-anchor='middle'>Time</text>",
        MARGIN_LEFT + plot_width / 2.0,
        height - 16.0
    );
    let _ = writeln!(
        svg,
        "  <text x='28' y='{:.0}' fill='#111111' font-family='{FONT_FAMILY}' font-size='22' transform='rotate(-90 28 {:.0})' text-anchor='middle'>Num Pulls</text>",
        MARGIN_TOP + plot_height / 2.0,
        MARGIN_TOP + plot_height / 2.0
    );

    // One bar row per boss, in session order.
    for (row_index, boss) in bosses.iter().enumerate() {
        let bar_color = wing_labels
            .iter()
            .position(|label| *label == boss.wing_label.as_str())
            .map(|index| WING_PALETTE[index % WING_PALETTE.len()])
            .unwrap_or(WING_PALETTE[0]);

        let row_top = MARGIN_TOP + row_index as f64 * row_height;
        let bar_top = row_top + row_height * BAR_PADDING_RATIO;
        let bar_height = row_height * (1.0 - 2.0 * BAR_PADDING_RATIO);
        let bar_start = scale_x(boss.total_start_time);
        let bar_width = (scale_x(boss.total_end_time) - bar_start).max(2.0);

        let _ = writeln!(
            svg,
            "  <rect x='{bar_start:.1}' y='{bar_top:.1}' width='{bar_width:.1}' height='{bar_height:.1}' fill='{bar_color}'/>"
        );
        let _ = writeln!(
            svg,
            "  <text x='{:.1}' y='{:.1}' fill='#ffffff' font-family='{FONT_FAMILY}' font-size='20' text-anchor='middle' dominant-baseline='middle'>{}</text>",
            bar_start + bar_width / 2.0,
            bar_top + bar_height / 2.0,
            escape_text(&boss.name)
        );
        let _ = writeln!(
            svg,
            "  <text x='{:.0}' y='{:.1}' fill='#444444' font-family='{FONT_FAMILY}' font-size='18' text-anchor='end' dominant-baseline='middle'>{}</text>",
            MARGIN_LEFT - 12.0,
            bar_top + bar_height / 2.0,
            boss.num_pulls
        );
    }

    // Wing legend.
    let legend_x = width - MARGIN_RIGHT + 30.0;
    let _ = writeln!(
        svg,
        "  <text x='{legend_x:.0}' y='{:.0}' fill='#111111' font-family='{FONT_FAMILY}' font-size='22' font-weight='600'>Wings</text>",
        MARGIN_TOP + 8.0
    );
    for (index, label) in wing_labels.iter().enumerate() {
        let entry_y = MARGIN_TOP + 36.0 + index as f64 * 32.0;
        let _ = writeln!(
            svg,
            "  <rect x='{legend_x:.0}' y='{:.1}' width='18' height='18' fill='{}'/>",
            entry_y - 14.0,
            WING_PALETTE[index % WING_PALETTE.len()]
        );
        let _ = writeln!(
            svg,
            "  <text x='{:.0}' y='{entry_y:.1}' fill='#444444' font-family='{FONT_FAMILY}' font-size='18'>{}</text>",
            legend_x + 26.0,
            escape_text(label)
        );
    }

    let _ = writeln!(svg, "</svg>");
    svg
}

/// Renders the timeline and writes the PNG artifact to `path`.
pub fn write_timeline_png(session: &Session, path: &Path) -> Result<()> {
    let svg_markup = render_timeline_svg(session);
    let png_bytes = svg_to_png(&svg_markup, TIMELINE_WIDTH, TIMELINE_HEIGHT)?;
    std::fs::write(path, png_bytes)
        .with_context(|| format!("Failed to write timeline chart '{}'", path.display()))
}

fn svg_to_png(svg: &str, width: u32, height: u32) -> Result<Vec<u8>> {
    use png::{BitDepth, ColorType, Encoder};
    use tiny_skia::{Pixmap, Transform};
    use usvg::{Options, Tree};

    let mut options = Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = Tree::from_data(svg.as_bytes(), &options)
        .map_err(|error| anyhow::anyhow!("Failed to parse timeline SVG markup: {error}"))?;

    let mut pixmap =
        Pixmap::new(width, height).context("Failed to allocate the timeline pixmap")?;
    let mut pixmap_ref = pixmap.as_mut();
    resvg::render(&tree, Transform::default(), &mut pixmap_ref);

    let mut out = Vec::new();
    let mut encoder = Encoder::new(&mut out, width, height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder
        .write_header()
        .context("Failed to write the timeline PNG header")?
        .write_image_data(pixmap.data())
        .context("Failed to encode the timeline PNG")?;

    Ok(out)
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&apos;")
        .replace('"', "&quot;")
}
