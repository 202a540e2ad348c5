#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn midpoint(self, other: Point) -> Point {
        Point {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

pub fn normalize_point(point: Point) -> Option<Point> {
    if !point.x.is_finite() || !point.y.is_finite() {
        return None;
    }
    Some(point)
}

/// Region touched by strokes since the last clear or resize.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// An inverted box spanning the viewport, so the first point collapses it.
    pub fn seeded(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            min_x: viewport_width,
            min_y: viewport_height,
            max_x: 0.0,
            max_y: 0.0,
        }
    }

    pub fn include(&mut self, point: Point) {
        self.min_x = self.min_x.min(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_x = self.max_x.max(point.x);
        self.max_y = self.max_y.max(point.y);
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Area of the backing raster that goes into a snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Part of a crop that actually lies on the raster, and where it lands in
/// the snapshot image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CopyWindow {
    pub source_x: f64,
    pub source_y: f64,
    pub width: f64,
    pub height: f64,
    pub dest_x: f64,
    pub dest_y: f64,
}

pub fn padded_crop(bounds: &Bounds, padding: f64) -> CropRect {
    CropRect {
        x: bounds.min_x - padding,
        y: bounds.min_y - padding,
        width: bounds.width() + padding * 2.0,
        height: bounds.height() + padding * 2.0,
    }
}

impl CropRect {
    /// Clips the crop to a `raster_width` x `raster_height` raster.
    /// Returns `None` when nothing of the crop is on the raster.
    pub fn source_window(&self, raster_width: f64, raster_height: f64) -> Option<CopyWindow> {
        let left = self.x.max(0.0);
        let top = self.y.max(0.0);
        let right = (self.x + self.width).min(raster_width);
        let bottom = (self.y + self.height).min(raster_height);
        if right <= left || bottom <= top {
            return None;
        }
        Some(CopyWindow {
            source_x: left,
            source_y: top,
            width: right - left,
            height: bottom - top,
            dest_x: left - self.x,
            dest_y: top - self.y,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    QuadTo { control: Point, end: Point },
}

/// Turns sampled stroke points into quadratic segments.
///
/// Each inner point becomes the control point of a curve ending halfway to
/// the next sample; the last curve ends on the final sample. A single point
/// yields an empty path, callers draw a dot for that case.
pub fn smooth_path(points: &[Point]) -> Vec<PathSegment> {
    if points.len() < 2 {
        return Vec::new();
    }
    let mut path = Vec::with_capacity(points.len());
    path.push(PathSegment::MoveTo(points[0]));
    if points.len() == 2 {
        path.push(PathSegment::QuadTo {
            control: points[1],
            end: points[1],
        });
        return path;
    }
    let last = points.len() - 1;
    for index in 1..last - 1 {
        path.push(PathSegment::QuadTo {
            control: points[index],
            end: points[index].midpoint(points[index + 1]),
        });
    }
    path.push(PathSegment::QuadTo {
        control: points[last - 1],
        end: points[last],
    });
    path
}
