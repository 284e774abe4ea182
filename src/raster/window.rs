//! Pixel windows over a raster grid

use std::fmt;

/// Rectangular pixel window; offsets may lie outside the raster
///
/// Both sides are at least one pixel, the end row and column fit in `i64`
/// and the pixel count fits in `usize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelWindow {
    col_off: i64,
    row_off: i64,
    width: usize,
    height: usize,
}

impl PixelWindow {
    /// Window at (`col_off`, `row_off`), or None for an empty or unaddressable size
    pub fn new(col_off: i64, row_off: i64, width: usize, height: usize) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        col_off.checked_add(i64::try_from(width).ok()?)?;
        row_off.checked_add(i64::try_from(height).ok()?)?;
        width.checked_mul(height)?;
        Some(PixelWindow { col_off, row_off, width, height })
    }

    pub fn col_off(&self) -> i64 {
        self.col_off
    }

    pub fn row_off(&self) -> i64 {
        self.row_off
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Exclusive end column
    pub fn end_col(&self) -> i64 {
        self.col_off + self.width as i64
    }

    /// Exclusive end row
    pub fn end_row(&self) -> i64 {
        self.row_off + self.height as i64
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// True when the window lies entirely inside a raster of the given size
    pub fn is_within(&self, raster_width: usize, raster_height: usize) -> bool {
        self.col_off >= 0
            && self.row_off >= 0
            && self.end_col() <= raster_width as i64
            && self.end_row() <= raster_height as i64
    }

    /// The part of the window covered by the raster, in raster coordinates
    ///
    /// Returns `(col_start, row_start, col_end, row_end)` with exclusive ends,
    /// or None when the window misses the raster entirely.
    pub fn clip(&self, raster_width: usize, raster_height: usize) -> Option<(usize, usize, usize, usize)> {
        let col_start = self.col_off.max(0);
        let row_start = self.row_off.max(0);
        let col_end = self.end_col().min(raster_width as i64);
        let row_end = self.end_row().min(raster_height as i64);

        if col_start >= col_end || row_start >= row_end {
            return None;
        }

        Some((col_start as usize, row_start as usize, col_end as usize, row_end as usize))
    }
}

impl fmt::Display for PixelWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} at col {}, row {}", self.width, self.height, self.col_off, self.row_off)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_rejects_unusable_sizes() {
        assert_eq!(PixelWindow::new(0, 0, 0, 10), None);
        assert_eq!(PixelWindow::new(0, 0, 10, 0), None);
        assert_eq!(PixelWindow::new(i64::MAX - 5, 0, 10, 10), None);
        assert_eq!(PixelWindow::new(0, 0, usize::MAX, 1), None);
        assert_eq!(PixelWindow::new(0, 0, 1 << 40, 1 << 40), None);
        assert_eq!(PixelWindow::new(-3, 4, 2, 5).map(|w| w.pixel_count()), Some(10));
    }

    #[test]
    fn inside_window_is_within() {
        let window = PixelWindow::new(54, 79, 200, 200).unwrap();
        assert!(window.is_within(300, 300));
        assert_eq!(window.clip(300, 300), Some((54, 79, 254, 279)));
    }

    #[test]
    fn overhanging_window_is_clipped() {
        let window = PixelWindow::new(-5, 290, 20, 20).unwrap();
        assert!(!window.is_within(300, 300));
        assert_eq!(window.clip(300, 300), Some((0, 290, 15, 300)));
    }

    #[test]
    fn disjoint_window_has_no_clip() {
        assert_eq!(PixelWindow::new(400, 0, 10, 10).unwrap().clip(300, 300), None);
        assert_eq!(PixelWindow::new(-10, 0, 10, 10).unwrap().clip(300, 300), None);
    }
}
