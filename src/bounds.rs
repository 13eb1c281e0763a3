use geo::Point;

/// Square window of half-width `radius` degrees around a centre point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    center: Point,
    max: Point,
    min: Point,
    radius: f64,
}

impl Bounds {
    pub fn new(center: Point, radius: f64) -> Self {
        let (x, y) = center.x_y();
        let max = Point::new(x + radius, y + radius);
        let min = Point::new(x - radius, y - radius);
        Self {
            center,
            max,
            min,
            radius,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Edges are open: a point lying exactly on one is outside.
    pub fn contains(&self, p: Point) -> bool {
        p.x() > self.min.x() && p.x() < self.max.x() && p.y() > self.min.y() && p.y() < self.max.y()
    }

    /// Same centre, `step` degrees wider on every side
    pub fn expand(self, step: f64) -> Self {
        Self::new(self.center, self.radius + step)
    }
}
