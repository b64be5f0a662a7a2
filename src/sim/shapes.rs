//! Sprite footprints for collision
//!
//! Masks are generated procedurally from the sprite sizes so the simulation
//! runs without loading image assets. A presentation layer with real art can
//! swap any of them for `CollisionMask::from_alpha` on the decoded image.

use std::f32::consts::TAU;
use std::sync::Arc;

use super::mask::CollisionMask;
use crate::consts::{HAZARD_SIZE, PICKUP_SIZE, PROJECTILE_SIZE, SHIP_SIZE};

/// Shared base masks, one per sprite kind
#[derive(Debug, Clone)]
pub struct ShapeLibrary {
    pub ship: Arc<CollisionMask>,
    pub projectile: Arc<CollisionMask>,
    pub hazard: Arc<CollisionMask>,
    pub pickup: Arc<CollisionMask>,
}

impl Default for ShapeLibrary {
    fn default() -> Self {
        Self {
            ship: Arc::new(ship_mask(SHIP_SIZE.0, SHIP_SIZE.1)),
            projectile: Arc::new(CollisionMask::filled(PROJECTILE_SIZE.0, PROJECTILE_SIZE.1)),
            hazard: Arc::new(meteor_mask(HAZARD_SIZE.0, HAZARD_SIZE.1)),
            pickup: Arc::new(CollisionMask::ellipse(PICKUP_SIZE.0, PICKUP_SIZE.1)),
        }
    }
}

/// Arrowhead hull: a triangle pointing up with a notched tail
pub fn ship_mask(width: u32, height: u32) -> CollisionMask {
    let (w, h) = (width as f32, height as f32);
    CollisionMask::from_fn(width, height, |x, y| {
        let px = x as f32 + 0.5;
        let py = y as f32 + 0.5;
        // Half-width of the hull grows linearly from the nose
        let half = (py / h) * (w / 2.0);
        let inside_hull = (px - w / 2.0).abs() <= half;
        // Tail notch: the central bottom fifth is open
        let in_notch = py > h * 0.8 && (px - w / 2.0).abs() < w * 0.12;
        inside_hull && !in_notch
    })
}

/// Lumpy rock: an ellipse whose radius wobbles with the angle
pub fn meteor_mask(width: u32, height: u32) -> CollisionMask {
    let (rx, ry) = (width as f32 / 2.0, height as f32 / 2.0);
    CollisionMask::from_fn(width, height, |x, y| {
        let dx = (x as f32 + 0.5 - rx) / rx;
        let dy = (y as f32 + 0.5 - ry) / ry;
        let angle = dy.atan2(dx);
        let wobble = 0.86 + 0.08 * (angle * 5.0).sin() + 0.05 * (angle * 3.0 + TAU / 7.0).cos();
        (dx * dx + dy * dy).sqrt() <= wobble
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ship_mask_has_transparent_corners() {
        let mask = ship_mask(98, 76);
        assert!(!mask.get(0, 0));
        assert!(!mask.get(97, 0));
        // Nose column near the top is opaque
        assert!(mask.get(49, 2));
        // Notch in the tail
        assert!(!mask.get(49, 74));
    }

    #[test]
    fn test_meteor_mask_is_irregular_but_solid() {
        let mask = meteor_mask(101, 84);
        let area = mask.count() as f32;
        let ellipse = std::f32::consts::PI * 50.5 * 42.0;
        assert!(area > ellipse * 0.55 && area < ellipse);
        assert!(mask.get(50, 42));
        assert!(!mask.get(0, 0));
    }
}
