use glam::Vec2;

/// Axis-aligned rectangle stored as origin + size.
///
/// Corner accessors follow the `x{1,2}y{1,2}` naming: `x1`/`y1` are the origin
/// edges, `x2`/`y2` the far edges. No axis orientation is implied.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Builds the rectangle spanned by two opposite corners.
    #[inline]
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self::from_origin_size(a, b - a)
    }

    #[inline]
    pub fn x1(self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn y1(self) -> f32 {
        self.origin.y
    }

    #[inline]
    pub fn x2(self) -> f32 {
        self.origin.x + self.size.x
    }

    #[inline]
    pub fn y2(self) -> f32 {
        self.origin.y + self.size.y
    }

    #[inline]
    pub fn x1y1(self) -> Vec2 {
        Vec2::new(self.x1(), self.y1())
    }

    #[inline]
    pub fn x1y2(self) -> Vec2 {
        Vec2::new(self.x1(), self.y2())
    }

    #[inline]
    pub fn x2y2(self) -> Vec2 {
        Vec2::new(self.x2(), self.y2())
    }

    #[inline]
    pub fn x2y1(self) -> Vec2 {
        Vec2::new(self.x2(), self.y1())
    }
}
