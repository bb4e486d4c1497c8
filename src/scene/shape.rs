//! Containment shapes used for hit areas and masks.

use peniko::kurbo::{BezPath, Circle, Ellipse, Point, Rect, RoundedRect, Shape, Size};

/// A shape that can answer "is this point inside?".
///
/// As a hit area the shape lives in the node's local space. As a mask it lives
/// in world space.
#[derive(Debug, Clone, PartialEq)]
pub enum HitShape {
    Rect(Rect),
    Circle(Circle),
    Ellipse(Ellipse),
    RoundedRect(RoundedRect),
    /// An arbitrary closed outline, filled with the non-zero winding rule.
    Polygon(BezPath),
}

impl HitShape {
    /// A rectangle from an origin and a size, `[x, y, width, height]`.
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        HitShape::Rect(Rect::from_origin_size((x, y), Size::new(width, height)))
    }

    pub fn circle(center: impl Into<Point>, radius: f64) -> Self {
        HitShape::Circle(Circle::new(center, radius))
    }

    /// A closed polygon through `points`.
    pub fn polygon(points: impl IntoIterator<Item = Point>) -> Self {
        let mut path = BezPath::new();
        let mut points = points.into_iter();
        if let Some(first) = points.next() {
            path.move_to(first);
            for point in points {
                path.line_to(point);
            }
            path.close_path();
        }
        HitShape::Polygon(path)
    }

    pub fn contains(&self, point: Point) -> bool {
        match self {
            // Half-open on the far edges, so adjacent rects never both claim a point.
            HitShape::Rect(rect) => rect.contains(point),
            HitShape::Circle(circle) => circle.contains(point),
            HitShape::Ellipse(ellipse) => ellipse.contains(point),
            HitShape::RoundedRect(rounded) => rounded.contains(point),
            HitShape::Polygon(path) => path.contains(point),
        }
    }

    pub fn bounding_box(&self) -> Rect {
        match self {
            HitShape::Rect(rect) => *rect,
            HitShape::Circle(circle) => circle.bounding_box(),
            HitShape::Ellipse(ellipse) => ellipse.bounding_box(),
            HitShape::RoundedRect(rounded) => rounded.bounding_box(),
            HitShape::Polygon(path) => path.bounding_box(),
        }
    }
}

impl From<Rect> for HitShape {
    fn from(rect: Rect) -> Self {
        HitShape::Rect(rect)
    }
}

impl From<Circle> for HitShape {
    fn from(circle: Circle) -> Self {
        HitShape::Circle(circle)
    }
}
