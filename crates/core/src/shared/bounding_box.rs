use std::fmt;

/// Axis-aligned face box in pixel coordinates of the transformed frame.
///
/// Always non-empty: `x1 < x2` and `y1 < y2`. The right and bottom edges are
/// exclusive, matching slice semantics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    x1: u32,
    y1: u32,
    x2: u32,
    y2: u32,
}

impl BoundingBox {
    /// Returns `None` for empty or inverted boxes.
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Option<Self> {
        if x1 < x2 && y1 < y2 {
            Some(Self { x1, y1, x2, y2 })
        } else {
            None
        }
    }

    /// Builds a box from raw detector output by truncating to integers and
    /// clamping into a `width × height` frame.
    ///
    /// Non-finite coordinates and boxes that collapse after clamping yield `None`.
    pub fn clamped(coords: [f64; 4], width: u32, height: u32) -> Option<Self> {
        if coords.iter().any(|c| !c.is_finite()) {
            return None;
        }
        let clamp = |v: f64, max: u32| (v.trunc() as i64).clamp(0, max as i64) as u32;
        Self::new(
            clamp(coords[0], width),
            clamp(coords[1], height),
            clamp(coords[2], width),
            clamp(coords[3], height),
        )
    }

    pub fn x1(&self) -> u32 {
        self.x1
    }

    pub fn y1(&self) -> u32 {
        self.y1
    }

    pub fn x2(&self) -> u32 {
        self.x2
    }

    pub fn y2(&self) -> u32 {
        self.y2
    }

    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x2 <= width && self.y2 <= height
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x1, self.y1, self.x2, self.y2)
    }
}
