use super::{
    MapStatRecord,
    WinRateBand,
};
use anyhow::Context;
use std::{
    sync::Arc,
    time::Instant,
};
use tiny_skia::{
    Color,
    FillRule,
    Paint,
    Path,
    PathBuilder,
    Pixmap,
    Rect,
    Stroke,
    StrokeDash,
    Transform,
};
use tokio::sync::Semaphore;
use tracing::info;
use ttf_parser::{
    Face,
    OutlineBuilder,
};

const FONT_BYTES: &[u8] = include_bytes!("../../assets/DejaVuSans/DejaVuSans.ttf");

const MIN_WIDTH: f32 = 640.0;
const HEIGHT: f32 = 480.0;
const SLOT_WIDTH: f32 = 90.0;
const BAR_RATIO: f32 = 0.6;

const MARGIN_LEFT: f32 = 40.0;
const MARGIN_RIGHT: f32 = 40.0;
const MARGIN_TOP: f32 = 70.0;
const MARGIN_BOTTOM: f32 = 70.0;

const TITLE_SIZE: f32 = 20.0;
const LABEL_SIZE: f32 = 14.0;
const AXIS_LABEL_SIZE: f32 = 12.0;

const MAX_PARALLEL_RENDER_LIMIT: usize = 4;

/// An rgb color
type Rgb = (u8, u8, u8);

const TEXT_COLOR: Rgb = (33, 33, 33);
const AXIS_COLOR: Rgb = (97, 97, 97);
const MATCHES_COLOR: Rgb = (198, 219, 239);
const WINNING_COLOR: Rgb = (49, 163, 84);
const EVEN_COLOR: Rgb = (150, 150, 150);
const LOSING_COLOR: Rgb = (222, 45, 38);

/// What to draw
#[derive(Debug, Clone)]
pub struct Chart {
    /// The title, drawn above the bars
    pub title: String,

    /// One bar per record, drawn in order
    pub records: Vec<MapStatRecord>,
}

/// Render map stat charts
#[derive(Debug, Clone)]
pub struct Renderer {
    render_semaphore: Arc<Semaphore>,
}

impl Renderer {
    /// Make a new [`Renderer`].
    pub fn new() -> anyhow::Result<Self> {
        // Fail early on a broken font instead of on the first render.
        Face::parse(FONT_BYTES, 0).context("invalid font")?;

        Ok(Self {
            render_semaphore: Arc::new(Semaphore::new(MAX_PARALLEL_RENDER_LIMIT)),
        })
    }

    /// Render a chart to a png with `tiny_skia`.
    pub fn render(&self, chart: &Chart) -> anyhow::Result<Vec<u8>> {
        let draw_start = Instant::now();

        let face = Face::parse(FONT_BYTES, 0).context("invalid font")?;
        let text = TextDrawer { face: &face };

        let bar_count = chart.records.len().max(1) as f32;
        let width = (MARGIN_LEFT + MARGIN_RIGHT + SLOT_WIDTH * bar_count).max(MIN_WIDTH);
        let mut pixmap =
            Pixmap::new(width as u32, HEIGHT as u32).context("failed to create pixmap")?;
        pixmap.fill(Color::WHITE);

        let plot_left = MARGIN_LEFT;
        let plot_width = width - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_bottom = HEIGHT - MARGIN_BOTTOM;
        let plot_height = plot_bottom - MARGIN_TOP;
        let slot_width = plot_width / bar_count;
        let bar_width = slot_width * BAR_RATIO;

        let max_matches = chart
            .records
            .iter()
            .map(|record| record.matches_played)
            .max()
            .unwrap_or(0)
            .max(1);
        let bar_height = |value: u32| value as f32 / max_matches as f32 * plot_height;

        text.draw_centered(
            &mut pixmap,
            &chart.title,
            TITLE_SIZE,
            width / 2.0,
            MARGIN_TOP / 2.0,
            width,
            TEXT_COLOR,
        );

        let mut paint = Paint::default();
        paint.anti_alias = true;

        let mut itoa_buffer = itoa::Buffer::new();
        for (i, record) in chart.records.iter().enumerate() {
            let center = plot_left + slot_width * (i as f32 + 0.5);
            let left = center - bar_width / 2.0;

            // Matches played
            let matches_height = bar_height(record.matches_played);
            let matches_top = plot_bottom - matches_height;
            fill_rect(
                &mut pixmap,
                &mut paint,
                Rect::from_xywh(left, matches_top, bar_width, matches_height),
                MATCHES_COLOR,
            );

            // Matches won, over the matches played
            let won_color = match record.band() {
                WinRateBand::Winning => WINNING_COLOR,
                WinRateBand::Even => EVEN_COLOR,
                WinRateBand::Losing => LOSING_COLOR,
            };
            let won_height = bar_height(record.matches_won);
            let won_top = plot_bottom - won_height;
            let won_left = left + bar_width * 0.15;
            let won_width = bar_width * 0.7;
            if record.matches_won > 0 {
                fill_rect(
                    &mut pixmap,
                    &mut paint,
                    Rect::from_xywh(won_left, won_top, won_width, won_height),
                    won_color,
                );
            }

            let labels = layout_labels(matches_top, won_top, won_height);
            text.draw_centered(
                &mut pixmap,
                itoa_buffer.format(record.matches_played),
                LABEL_SIZE,
                center,
                labels.matches_y,
                slot_width,
                TEXT_COLOR,
            );
            let won_label_color = if labels.won_inside {
                (255, 255, 255)
            } else {
                won_color
            };
            text.draw_centered(
                &mut pixmap,
                itoa_buffer.format(record.matches_won),
                LABEL_SIZE,
                center,
                labels.won_y,
                won_width,
                won_label_color,
            );

            // Where the won bar needs to reach for 50%
            let half_y = plot_bottom - matches_height / 2.0;
            stroke_line(
                &mut pixmap,
                &mut paint,
                (left, half_y),
                (left + bar_width, half_y),
                true,
            )?;

            text.draw_centered(
                &mut pixmap,
                &record.map_name,
                AXIS_LABEL_SIZE,
                center,
                plot_bottom + AXIS_LABEL_SIZE + 6.0,
                slot_width - 4.0,
                TEXT_COLOR,
            );
            text.draw_centered(
                &mut pixmap,
                &format!("{:.1}%", record.win_percentage),
                AXIS_LABEL_SIZE,
                center,
                plot_bottom + AXIS_LABEL_SIZE * 2.0 + 12.0,
                slot_width - 4.0,
                won_color,
            );
        }

        // X axis
        stroke_line(
            &mut pixmap,
            &mut paint,
            (plot_left, plot_bottom),
            (plot_left + plot_width, plot_bottom),
            false,
        )?;

        info!("chart draw time: {:?}", draw_start.elapsed());

        let encode_start = Instant::now();
        let img = pixmap.encode_png().context("failed to encode chart")?;
        info!("chart png encode time: {:?}", encode_start.elapsed());

        Ok(img)
    }

    /// Render a chart on a threadpool
    pub async fn render_async(&self, chart: Chart) -> anyhow::Result<Vec<u8>> {
        let _permit = self.render_semaphore.acquire().await?;
        let self_clone = self.clone();
        tokio::task::spawn_blocking(move || self_clone.render(&chart)).await?
    }
}

/// Baselines of the two labels of one bar
#[derive(Debug, Clone, Copy, PartialEq)]
struct LabelLayout {
    matches_y: f32,
    won_y: f32,
    won_inside: bool,
}

/// Place the won label inside its bar when it fits, otherwise just above it.
///
/// The matches label sits above the matches bar, and moves up further when it would hit the won label.
fn layout_labels(matches_top: f32, won_top: f32, won_height: f32) -> LabelLayout {
    let matches_y = matches_top - 6.0;
    if won_height >= LABEL_SIZE + 8.0 {
        return LabelLayout {
            matches_y,
            won_y: won_top + LABEL_SIZE + 2.0,
            won_inside: true,
        };
    }

    let won_y = won_top - 2.0;
    LabelLayout {
        matches_y: matches_y.min(won_y - LABEL_SIZE - 2.0),
        won_y,
        won_inside: false,
    }
}

/// Fill a rect, skipping empty ones
fn fill_rect(pixmap: &mut Pixmap, paint: &mut Paint<'_>, rect: Option<Rect>, color: Rgb) {
    let rect = match rect {
        Some(rect) => rect,
        None => return,
    };

    paint.set_color_rgba8(color.0, color.1, color.2, 255);
    pixmap.fill_rect(rect, paint, Transform::identity(), None);
}

/// Draw a straight axis-colored line
fn stroke_line(
    pixmap: &mut Pixmap,
    paint: &mut Paint<'_>,
    start: (f32, f32),
    end: (f32, f32),
    dashed: bool,
) -> anyhow::Result<()> {
    let mut path_builder = PathBuilder::new();
    path_builder.move_to(start.0, start.1);
    path_builder.line_to(end.0, end.1);
    let path = path_builder.finish().context("failed to build line")?;

    let mut stroke = Stroke {
        width: 1.5,
        ..Default::default()
    };
    if dashed {
        stroke.dash = StrokeDash::new(vec![4.0, 3.0], 0.0);
    }

    paint.set_color_rgba8(AXIS_COLOR.0, AXIS_COLOR.1, AXIS_COLOR.2, 255);
    pixmap.stroke_path(&path, paint, &stroke, Transform::identity(), None);

    Ok(())
}

/// Lays out and fills text with a font face
struct TextDrawer<'a> {
    face: &'a Face<'a>,
}

impl TextDrawer<'_> {
    /// Build the outline of a line of text at `size` pixels.
    ///
    /// The origin is the start of the baseline. Returns the path and its advance width.
    /// The path is `None` if nothing in the text has an outline.
    fn layout(&self, text: &str, size: f32) -> (Option<Path>, f32) {
        let scale = size / f32::from(self.face.units_per_em());
        let mut builder = GlyphBuilder {
            builder: PathBuilder::new(),
            x: 0.0,
            scale,
        };

        for c in text.chars() {
            let glyph_id = match self
                .face
                .glyph_index(c)
                .or_else(|| self.face.glyph_index('?'))
            {
                Some(glyph_id) => glyph_id,
                None => continue,
            };

            // Spaces have no outline, only an advance.
            let _bounds = self.face.outline_glyph(glyph_id, &mut builder);
            let advance = self.face.glyph_hor_advance(glyph_id).unwrap_or(0);
            builder.x += f32::from(advance) * scale;
        }

        let width = builder.x;
        (builder.builder.finish(), width)
    }

    /// Fill `text` centered on `center_x` with its baseline on `baseline_y`.
    ///
    /// Text wider than `max_width` is shrunk to fit.
    #[allow(clippy::too_many_arguments)]
    fn draw_centered(
        &self,
        pixmap: &mut Pixmap,
        text: &str,
        size: f32,
        center_x: f32,
        baseline_y: f32,
        max_width: f32,
        color: Rgb,
    ) {
        let (path, width) = self.layout(text, size);
        let path = match path {
            Some(path) => path,
            None => return,
        };

        let ratio = if width > max_width && width > 0.0 {
            max_width / width
        } else {
            1.0
        };
        let transform = Transform::from_scale(ratio, ratio)
            .post_translate(center_x - (width * ratio) / 2.0, baseline_y);

        let mut paint = Paint::default();
        paint.anti_alias = true;
        paint.set_color_rgba8(color.0, color.1, color.2, 255);
        pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
    }
}

/// Utility to draw font glyphs to a path.
///
/// ttf coordinates point up, so they are flipped to agree with tiny-skia's.
struct GlyphBuilder {
    builder: PathBuilder,
    x: f32,
    scale: f32,
}

impl GlyphBuilder {
    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (self.x + x * self.scale, -y * self.scale)
    }
}

impl OutlineBuilder for GlyphBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn records() -> Vec<MapStatRecord> {
        vec![
            MapStatRecord::new("OREGON", 5, 5),
            MapStatRecord::new("BANK", 10, 6),
            MapStatRecord::new("CHALET", 8, 4),
            MapStatRecord::new("KAFE DOSTOYEVSKY", 3, 0),
        ]
    }

    #[test]
    fn render_chart() {
        let renderer = Renderer::new().expect("failed to make renderer");
        let chart = Chart {
            title: "player (20220614 - 20220823)".into(),
            records: records(),
        };

        let img = renderer.render(&chart).expect("failed to render");
        assert!(img.starts_with(b"\x89PNG"));

        let pixmap = Pixmap::decode_png(&img).expect("failed to decode");
        assert_eq!(pixmap.width(), MIN_WIDTH as u32);
        assert_eq!(pixmap.height(), HEIGHT as u32);
    }

    #[test]
    fn wide_charts_grow() {
        let renderer = Renderer::new().expect("failed to make renderer");
        let records: Vec<_> = (0..12)
            .map(|i| MapStatRecord::new(format!("MAP {i}"), 12 - i, i))
            .collect();
        let chart = Chart {
            title: "many maps".into(),
            records,
        };

        let img = renderer.render(&chart).expect("failed to render");
        let pixmap = Pixmap::decode_png(&img).expect("failed to decode");
        assert!(pixmap.width() > MIN_WIDTH as u32);
    }

    #[test]
    fn layout_measures_text() {
        let face = Face::parse(FONT_BYTES, 0).expect("invalid font");
        let text = TextDrawer { face: &face };

        let (path, width) = text.layout("100", LABEL_SIZE);
        assert!(path.is_some());
        assert!(width > 0.0);

        let (path, width) = text.layout(" ", LABEL_SIZE);
        assert!(path.is_none());
        assert!(width > 0.0);
    }

    #[test]
    fn short_bar_labels_stack() {
        // A 1/1 map next to a 100 match map
        let labels = layout_labels(397.0, 397.0, 3.0);
        assert!(!labels.won_inside);
        assert!(labels.won_y - labels.matches_y >= LABEL_SIZE);

        // Far apart labels stay above their bars
        let labels = layout_labels(100.0, 390.0, 10.0);
        assert!(!labels.won_inside);
        assert_eq!(labels.matches_y, 94.0);
        assert_eq!(labels.won_y, 388.0);

        let labels = layout_labels(100.0, 300.0, 110.0);
        assert!(labels.won_inside);
        assert_eq!(labels.matches_y, 94.0);
    }

    #[tokio::test]
    async fn render_async() {
        let renderer = Renderer::new().expect("failed to make renderer");
        let chart = Chart {
            title: "async".into(),
            records: records(),
        };

        let img = renderer.render_async(chart).await.expect("failed to render");
        assert!(!img.is_empty());
    }
}
