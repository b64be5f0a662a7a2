//! Per-pixel collision masks and axis-aligned rects
//!
//! A mask marks the opaque pixels of a sprite. Collision is a two-step test:
//! reject by rect, then look for one shared opaque pixel at the integer
//! offset between the two rect corners.

use glam::Vec2;

use crate::rotate_screen;

/// Alpha at or above which a pixel counts as opaque
pub const ALPHA_THRESHOLD: u8 = 127;

/// Axis-aligned rectangle in viewport space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub center: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.size.x / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.size.x / 2.0
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y - self.size.y / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y + self.size.y / 2.0
    }

    /// Center of the top edge
    #[inline]
    pub fn mid_top(&self) -> Vec2 {
        Vec2::new(self.center.x, self.top())
    }

    /// Integer top-left corner, used to align masks on the pixel grid
    #[inline]
    pub fn origin(&self) -> (i32, i32) {
        (self.left().round() as i32, self.top().round() as i32)
    }

    /// Strict overlap: touching edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Move the rect the minimum amount needed to sit inside `[0,w]×[0,h]`
    pub fn clamp_center(&self, w: f32, h: f32) -> Vec2 {
        let half = self.size / 2.0;
        let x = if self.size.x >= w {
            w / 2.0
        } else {
            self.center.x.clamp(half.x, w - half.x)
        };
        let y = if self.size.y >= h {
            h / 2.0
        } else {
            self.center.y.clamp(half.y, h - half.y)
        };
        Vec2::new(x, y)
    }
}

/// Opaque-pixel bitmap of a sprite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl CollisionMask {
    /// Fully transparent mask
    pub fn empty(width: u32, height: u32) -> Self {
        debug_assert!(width > 0 && height > 0, "mask must have a non-zero size");
        Self {
            width,
            height,
            bits: vec![false; (width * height) as usize],
        }
    }

    /// Fully opaque mask
    pub fn filled(width: u32, height: u32) -> Self {
        let mut mask = Self::empty(width, height);
        mask.bits.fill(true);
        mask
    }

    /// Build from an alpha channel (row-major, one byte per pixel)
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8]) -> Self {
        debug_assert_eq!(alpha.len(), (width * height) as usize);
        Self {
            width,
            height,
            bits: alpha.iter().map(|&a| a >= ALPHA_THRESHOLD).collect(),
        }
    }

    /// Build by evaluating `opaque(x, y)` at each pixel
    pub fn from_fn(width: u32, height: u32, mut opaque: impl FnMut(u32, u32) -> bool) -> Self {
        let mut mask = Self::empty(width, height);
        for y in 0..height {
            for x in 0..width {
                if opaque(x, y) {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// Ellipse inscribed in the mask bounds
    pub fn ellipse(width: u32, height: u32) -> Self {
        let (rx, ry) = (width as f32 / 2.0, height as f32 / 2.0);
        Self::from_fn(width, height, |x, y| {
            let dx = (x as f32 + 0.5 - rx) / rx;
            let dy = (y as f32 + 0.5 - ry) / ry;
            dx * dx + dy * dy <= 1.0
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Opaque pixel at (x, y); out of range reads as transparent
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, opaque: bool) {
        let idx = (y * self.width + x) as usize;
        self.bits[idx] = opaque;
    }

    /// Number of opaque pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Whether `other`, placed at `offset` relative to this mask's top-left,
    /// shares at least one opaque pixel with this mask
    pub fn overlaps(&self, other: &CollisionMask, offset: (i32, i32)) -> bool {
        let (ox, oy) = offset;
        let x_start = ox.max(0);
        let y_start = oy.max(0);
        let x_end = (ox + other.width as i32).min(self.width as i32);
        let y_end = (oy + other.height as i32).min(self.height as i32);
        if x_start >= x_end || y_start >= y_end {
            return false;
        }

        for y in y_start..y_end {
            for x in x_start..x_end {
                if self.get(x, y) && other.get(x - ox, y - oy) {
                    return true;
                }
            }
        }
        false
    }

    /// Rotate counter-clockwise by `degrees` (nearest-neighbour sampling).
    /// The result grows to the rotated bounding box, matching how a rotated
    /// sprite image is re-centred.
    pub fn rotated(&self, degrees: f32) -> CollisionMask {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let (w, h) = (self.width as f32, self.height as f32);
        // Trim float noise so exact quarter turns keep their dimensions
        let new_w = (((w * cos.abs() + h * sin.abs()) - 1e-3).ceil() as u32).max(1);
        let new_h = (((w * sin.abs() + h * cos.abs()) - 1e-3).ceil() as u32).max(1);

        let src_center = Vec2::new(w / 2.0, h / 2.0);
        let dst_center = Vec2::new(new_w as f32 / 2.0, new_h as f32 / 2.0);

        CollisionMask::from_fn(new_w, new_h, |x, y| {
            let dst = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - dst_center;
            // Inverse rotation maps the destination pixel back onto the source
            let src = rotate_screen(dst, -degrees) + src_center;
            self.get(src.x.floor() as i32, src.y.floor() as i32)
        })
    }
}

/// Rect-then-mask overlap between two placed sprites
pub fn sprites_overlap(a_rect: &Rect, a_mask: &CollisionMask, b_rect: &Rect, b_mask: &CollisionMask) -> bool {
    if !a_rect.overlaps(b_rect) {
        return false;
    }
    let (ax, ay) = a_rect.origin();
    let (bx, by) = b_rect.origin();
    a_mask.overlaps(b_mask, (bx - ax, by - ay))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_from_alpha_threshold() {
        let mask = CollisionMask::from_alpha(3, 1, &[0, 127, 255]);
        assert!(!mask.get(0, 0));
        assert!(mask.get(1, 0));
        assert!(mask.get(2, 0));
        assert_eq!(mask.count(), 2);
    }

    #[test]
    fn test_transparent_margins_do_not_collide() {
        // Two discs whose bounding boxes overlap only at the corners
        let disc = CollisionMask::ellipse(40, 40);
        let a = Rect::new(Vec2::new(100.0, 100.0), disc.size());
        let b = Rect::new(Vec2::new(134.0, 134.0), disc.size());
        assert!(a.overlaps(&b));
        assert!(!sprites_overlap(&a, &disc, &b, &disc));
    }

    #[test]
    fn test_opaque_regions_collide() {
        let disc = CollisionMask::ellipse(40, 40);
        let a = Rect::new(Vec2::new(100.0, 100.0), disc.size());
        let b = Rect::new(Vec2::new(130.0, 100.0), disc.size());
        assert!(sprites_overlap(&a, &disc, &b, &disc));
    }

    #[test]
    fn test_touching_rects_do_not_overlap() {
        let a = Rect::new(Vec2::new(10.0, 10.0), Vec2::new(20.0, 20.0));
        let b = Rect::new(Vec2::new(30.0, 10.0), Vec2::new(20.0, 20.0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_rotation_quarter_turn_swaps_dimensions() {
        let bar = CollisionMask::filled(40, 10);
        let rotated = bar.rotated(90.0);
        assert_eq!((rotated.width(), rotated.height()), (10, 40));
        assert_eq!(rotated.count(), 400);
    }

    #[test]
    fn test_rotation_grows_bounding_box() {
        let square = CollisionMask::filled(20, 20);
        let rotated = square.rotated(45.0);
        assert!(rotated.width() >= 28 && rotated.width() <= 29);
        // Corners of the grown box are transparent
        assert!(!rotated.get(0, 0));
    }

    #[test]
    fn test_clamp_center_keeps_rect_inside() {
        let rect = Rect::new(Vec2::new(-50.0, 900.0), Vec2::new(98.0, 76.0));
        let center = rect.clamp_center(1280.0, 720.0);
        assert_eq!(center, Vec2::new(49.0, 682.0));
    }

    proptest! {
        #[test]
        fn prop_rotation_roughly_preserves_area(w in 8u32..64, h in 8u32..64, angle in 0.0f32..360.0) {
            let mask = CollisionMask::ellipse(w, h);
            let rotated = mask.rotated(angle);
            let before = mask.count() as f32;
            let after = rotated.count() as f32;
            // Nearest-neighbour resampling loses or duplicates edge pixels only
            let perimeter = 2.0 * (w + h) as f32;
            prop_assert!((before - after).abs() <= perimeter);
        }

        #[test]
        fn prop_overlap_is_symmetric(ax in 0i32..60, ay in 0i32..60, bx in 0i32..60, by in 0i32..60) {
            let a_mask = CollisionMask::ellipse(30, 20);
            let b_mask = CollisionMask::ellipse(16, 24);
            let a = Rect::new(Vec2::new(ax as f32 + 15.0, ay as f32 + 10.0), a_mask.size());
            let b = Rect::new(Vec2::new(bx as f32 + 8.0, by as f32 + 12.0), b_mask.size());
            prop_assert_eq!(
                sprites_overlap(&a, &a_mask, &b, &b_mask),
                sprites_overlap(&b, &b_mask, &a, &a_mask)
            );
        }
    }
}
