//! CPU rasterisation onto an RGB image, with a log of every draw call.

use glam::DVec2;
use image::{Rgb, RgbImage};
use serde::Serialize;

/// One recorded drawing operation, in image pixel coordinates.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    /// Whole-image background fill.
    Fill { color: [u8; 3] },
    /// Axis-aligned rectangle covering `x0..x1 × y0..y1`.
    Rect {
        x0: u32,
        y0: u32,
        x1: u32,
        y1: u32,
        color: [u8; 3],
    },
    /// Per-pixel sky samples written into the upper half.
    SkySamples { count: usize },
    /// Filled polygon; points are `[column, row]`.
    Polygon {
        points: Vec<[f64; 2]>,
        color: [u8; 3],
    },
    /// Open polyline; points are `[column, row]`.
    Polyline {
        points: Vec<[f64; 2]>,
        color: [u8; 3],
    },
}

/// A finished render: the pixels and the operations that produced them.
#[derive(Clone, Debug)]
pub struct Frame {
    pub image: RgbImage,
    pub ops: Vec<DrawOp>,
}

impl Frame {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Colour at `(x, y)` as a plain triple.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.image.get_pixel(x, y).0
    }
}

/// Drawing surface. Every primitive is clipped to the image, so shapes may
/// extend past any edge.
pub struct Canvas {
    image: RgbImage,
    ops: Vec<DrawOp>,
}

impl Canvas {
    /// A `width × height` canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: [u8; 3]) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, Rgb(background)),
            ops: vec![DrawOp::Fill { color: background }],
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Set one pixel; out-of-range coordinates are ignored. Not logged.
    pub fn put_pixel(&mut self, x: i64, y: i64, color: [u8; 3]) {
        if x < 0 || y < 0 || x >= i64::from(self.width()) || y >= i64::from(self.height()) {
            return;
        }
        self.image.put_pixel(x as u32, y as u32, Rgb(color));
    }

    /// Record an operation drawn through [`Canvas::put_pixel`].
    pub fn log(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    pub fn fill_rect(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, color: [u8; 3]) {
        let x1 = x1.min(self.width());
        let y1 = y1.min(self.height());
        for y in y0..y1 {
            for x in x0..x1 {
                self.image.put_pixel(x, y, Rgb(color));
            }
        }
        self.ops.push(DrawOp::Rect {
            x0,
            y0,
            x1,
            y1,
            color,
        });
    }

    /// Fill a simple polygon with the even-odd rule, then stroke its outline
    /// so slivers thinner than a pixel still show up.
    ///
    /// A pixel is inside when its centre is. Fewer than three points draw
    /// nothing.
    pub fn fill_polygon(&mut self, points: &[DVec2], color: [u8; 3]) {
        if points.len() < 3 {
            return;
        }

        let (min_y, max_y) = points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            });
        let height = i64::from(self.height());
        let width = f64::from(self.width());
        let first_row = (min_y.floor() as i64).max(0);
        let last_row = (max_y.ceil() as i64).min(height - 1);

        let mut crossings = Vec::with_capacity(points.len());
        for row in first_row..=last_row {
            let yc = row as f64 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                // Half-open so shared vertices are counted once.
                if (a.y <= yc) != (b.y <= yc) {
                    let t = (yc - a.y) / (b.y - a.y);
                    crossings.push(a.x + t * (b.x - a.x));
                }
            }
            crossings.sort_by(f64::total_cmp);
            for span in crossings.chunks_exact(2) {
                let start = (span[0] - 0.5).ceil().max(0.0);
                let end = (span[1] - 0.5).ceil().min(width);
                let mut x = start;
                while x < end {
                    self.image.put_pixel(x as u32, row as u32, Rgb(color));
                    x += 1.0;
                }
            }
        }

        for (i, a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            self.line(*a, b, color);
        }

        self.ops.push(DrawOp::Polygon {
            points: points.iter().map(|p| p.to_array()).collect(),
            color,
        });
    }

    /// Connect consecutive points with one-pixel lines.
    pub fn draw_polyline(&mut self, points: &[DVec2], color: [u8; 3]) {
        match points {
            [] => return,
            [only] => self.put_pixel(only.x.floor() as i64, only.y.floor() as i64, color),
            _ => {
                for pair in points.windows(2) {
                    self.line(pair[0], pair[1], color);
                }
            }
        }
        self.ops.push(DrawOp::Polyline {
            points: points.iter().map(|p| p.to_array()).collect(),
            color,
        });
    }

    /// Bresenham between the pixels containing `from` and `to`.
    fn line(&mut self, from: DVec2, to: DVec2, color: [u8; 3]) {
        let (mut x0, mut y0) = (from.x.floor() as i64, from.y.floor() as i64);
        let (x1, y1) = (to.x.floor() as i64, to.y.floor() as i64);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.put_pixel(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn finish(self) -> Frame {
        Frame {
            image: self.image,
            ops: self.ops,
        }
    }
}
