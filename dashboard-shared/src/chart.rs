//! Rolling bar chart rendering onto an abstract 2D surface.
//!
//! The renderer holds no state between calls: every call clears the surface
//! and redraws background, axes, labels and bars from scratch. Bars keep a
//! fixed width sized for a full window, so a partially filled series is drawn
//! left-aligned with empty space on the right.

use crate::series::SERIES_CAPACITY;

pub const BACKGROUND_COLOR: &str = "#0b1a0b";
pub const AXIS_COLOR: &str = "#9fbf9f";
pub const LABEL_FONT: &str = "12px system-ui";

/// Distance of the vertical axis from the left edge.
pub const AXIS_LEFT: f64 = 40.0;
/// Top of the vertical axis.
pub const AXIS_TOP: f64 = 10.0;
/// Distance of the horizontal axis from the bottom edge.
pub const AXIS_BOTTOM: f64 = 30.0;
/// Gap between the end of the horizontal axis and the right edge.
pub const AXIS_RIGHT: f64 = 10.0;
/// X position of the first bar.
pub const BARS_LEFT: f64 = 50.0;
/// Horizontal space not available to bars.
pub const PLOT_WIDTH_INSET: f64 = 60.0;
/// Vertical space not available to bars.
pub const PLOT_HEIGHT_INSET: f64 = 50.0;

/// Drawing primitives the renderer needs. Implemented by the browser canvas
/// in the frontend and by recording fakes in tests.
pub trait ChartSurface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn clear(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str);
    fn stroke_path(&mut self, points: &[(f64, f64)], color: &str, line_width: f64);
    fn fill_text(&mut self, text: &str, x: f64, y: f64, color: &str, font: &str);
}

/// Plot-area geometry for a surface of a given size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub plot_width: f64,
    pub plot_height: f64,
    pub bar_width: f64,
    pub baseline: f64,
}

impl ChartLayout {
    pub fn new(width: f64, height: f64) -> Self {
        let plot_width = width - PLOT_WIDTH_INSET;
        let plot_height = height - PLOT_HEIGHT_INSET;
        let bar_width = ((plot_width / SERIES_CAPACITY as f64).floor() - 1.0).max(1.0);
        Self {
            width,
            height,
            plot_width,
            plot_height,
            bar_width,
            baseline: height - AXIS_BOTTOM,
        }
    }

    /// Left edge of the bar in slot `index`.
    pub fn bar_x(&self, index: usize) -> f64 {
        BARS_LEFT + index as f64 * (self.bar_width + 1.0)
    }

    /// Height of a bar for `value`. Values above `max_scale` are not clamped.
    pub fn bar_height(&self, value: f64, max_scale: f64) -> f64 {
        (value / max_scale) * self.plot_height
    }
}

/// Draw a bar chart of the most recent `SERIES_CAPACITY` samples.
pub fn render_bar_chart<S: ChartSurface + ?Sized>(
    surface: &mut S,
    samples: &[f64],
    max_scale: f64,
    color: &str,
) {
    let layout = ChartLayout::new(surface.width(), surface.height());
    let (w, h) = (layout.width, layout.height);

    surface.clear();
    surface.fill_rect(0.0, 0.0, w, h, BACKGROUND_COLOR);

    surface.stroke_path(
        &[
            (AXIS_LEFT, AXIS_TOP),
            (AXIS_LEFT, layout.baseline),
            (w - AXIS_RIGHT, layout.baseline),
        ],
        AXIS_COLOR,
        1.0,
    );

    surface.fill_text("0", 10.0, layout.baseline, AXIS_COLOR, LABEL_FONT);
    surface.fill_text(
        &format_scale(max_scale),
        6.0,
        16.0,
        AXIS_COLOR,
        LABEL_FONT,
    );

    let shown = samples.len().min(SERIES_CAPACITY);
    let window = &samples[samples.len() - shown..];
    for (i, &v) in window.iter().enumerate() {
        let bar_h = layout.bar_height(v, max_scale);
        surface.fill_rect(
            layout.bar_x(i),
            layout.baseline - bar_h,
            layout.bar_width,
            bar_h,
            color,
        );
    }
}

fn format_scale(max_scale: f64) -> String {
    if max_scale.fract() == 0.0 {
        format!("{max_scale:.0}")
    } else {
        max_scale.to_string()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum DrawOp {
        Clear,
        Rect {
            x: f64,
            y: f64,
            w: f64,
            h: f64,
            color: String,
        },
        Path(Vec<(f64, f64)>),
        Text {
            text: String,
            x: f64,
            y: f64,
        },
    }

    pub(crate) struct RecordingSurface {
        pub width: f64,
        pub height: f64,
        pub ops: Vec<DrawOp>,
    }

    impl RecordingSurface {
        pub fn new(width: f64, height: f64) -> Self {
            Self {
                width,
                height,
                ops: Vec::new(),
            }
        }

        pub fn bars(&self, color: &str) -> Vec<(f64, f64, f64, f64)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Rect { x, y, w, h, color: c } if c == color => Some((*x, *y, *w, *h)),
                    _ => None,
                })
                .collect()
        }
    }

    impl ChartSurface for RecordingSurface {
        fn width(&self) -> f64 {
            self.width
        }
        fn height(&self) -> f64 {
            self.height
        }
        fn clear(&mut self) {
            self.ops.clear();
            self.ops.push(DrawOp::Clear);
        }
        fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
            self.ops.push(DrawOp::Rect {
                x,
                y,
                w,
                h,
                color: color.to_string(),
            });
        }
        fn stroke_path(&mut self, points: &[(f64, f64)], _color: &str, _line_width: f64) {
            self.ops.push(DrawOp::Path(points.to_vec()));
        }
        fn fill_text(&mut self, text: &str, x: f64, y: f64, _color: &str, _font: &str) {
            self.ops.push(DrawOp::Text {
                text: text.to_string(),
                x,
                y,
            });
        }
    }

    const BAR: &str = "#ff7043";

    #[test]
    fn test_layout_matches_canvas_geometry() {
        let layout = ChartLayout::new(400.0, 200.0);
        assert_eq!(layout.plot_width, 340.0);
        assert_eq!(layout.plot_height, 150.0);
        // floor(340 / 60) - 1
        assert_eq!(layout.bar_width, 4.0);
        assert_eq!(layout.baseline, 170.0);
        assert_eq!(layout.bar_x(0), 50.0);
        assert_eq!(layout.bar_x(2), 60.0);
    }

    #[test]
    fn test_bar_width_has_one_pixel_floor() {
        let layout = ChartLayout::new(100.0, 100.0);
        assert_eq!(layout.bar_width, 1.0);
    }

    #[test]
    fn test_empty_series_draws_frame_only() {
        let mut surface = RecordingSurface::new(400.0, 200.0);
        render_bar_chart(&mut surface, &[], 60.0, BAR);

        assert_eq!(surface.ops[0], DrawOp::Clear);
        assert_eq!(
            surface.ops[1],
            DrawOp::Rect {
                x: 0.0,
                y: 0.0,
                w: 400.0,
                h: 200.0,
                color: BACKGROUND_COLOR.to_string()
            }
        );
        assert_eq!(
            surface.ops[2],
            DrawOp::Path(vec![(40.0, 10.0), (40.0, 170.0), (390.0, 170.0)])
        );
        assert!(surface.bars(BAR).is_empty());
        let labels: Vec<_> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["0", "60"]);
    }

    #[test]
    fn test_partial_series_is_left_aligned_with_full_width_bars() {
        let mut surface = RecordingSurface::new(400.0, 200.0);
        render_bar_chart(&mut surface, &[30.0, 60.0], 60.0, BAR);

        let bars = surface.bars(BAR);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0], (50.0, 170.0 - 75.0, 4.0, 75.0));
        assert_eq!(bars[1], (55.0, 20.0, 4.0, 150.0));
    }

    #[test]
    fn test_only_last_window_is_drawn_oldest_left() {
        let samples: Vec<f64> = (0..75).map(|n| n as f64).collect();
        let mut surface = RecordingSurface::new(400.0, 200.0);
        render_bar_chart(&mut surface, &samples, 100.0, BAR);

        let bars = surface.bars(BAR);
        assert_eq!(bars.len(), SERIES_CAPACITY);
        // First bar is sample 15, last bar sample 74.
        assert_eq!(bars[0].3, 15.0 / 100.0 * 150.0);
        assert_eq!(bars[59].3, 74.0 / 100.0 * 150.0);
        assert!(bars.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_values_above_scale_overflow() {
        let mut surface = RecordingSurface::new(400.0, 200.0);
        render_bar_chart(&mut surface, &[120.0], 60.0, BAR);
        let bars = surface.bars(BAR);
        assert_eq!(bars[0].3, 300.0);
        assert!(bars[0].1 < 0.0);
    }

    #[test]
    fn test_redraw_does_not_accumulate() {
        let mut surface = RecordingSurface::new(400.0, 200.0);
        render_bar_chart(&mut surface, &[1.0, 2.0, 3.0], 60.0, BAR);
        let first = surface.ops.clone();
        render_bar_chart(&mut surface, &[1.0, 2.0, 3.0], 60.0, BAR);
        assert_eq!(surface.ops, first);
    }

    #[test]
    fn test_scale_label_formatting() {
        assert_eq!(format_scale(3300.0), "3300");
        assert_eq!(format_scale(2.5), "2.5");
    }
}
