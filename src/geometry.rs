/// A pixel position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned pixel rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at the origin.
    pub const fn from_size(width: usize, height: usize) -> Self {
        Self::new(0, 0, width, height)
    }

    #[inline]
    pub const fn right(&self) -> usize {
        self.x.saturating_add(self.width)
    }

    #[inline]
    pub const fn bottom(&self) -> usize {
        self.y.saturating_add(self.height)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub const fn location(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Overlap of two rectangles; empty (at `self`'s origin) when disjoint.
    pub fn intersect(&self, other: Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return Rect::new(self.x, self.y, 0, 0);
        }
        Rect::new(x, y, right - x, bottom - y)
    }

    pub const fn contains(&self, other: Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection() {
        let a = Rect::new(0, 0, 10, 10);
        assert_eq!(a.intersect(Rect::new(5, 5, 10, 10)), Rect::new(5, 5, 5, 5));
        assert!(a.intersect(Rect::new(10, 0, 5, 5)).is_empty());
        assert!(a.contains(Rect::new(2, 3, 8, 7)));
        assert!(!a.contains(Rect::new(2, 3, 9, 7)));
    }
}
