//! Danger ring overlay: one arrow glyph per active threat sector, placed on a
//! ring around a screen-space anchor and rotated to match its sector.

use glam::Vec2;
use renderer::OverlayBuilder;

use crate::threat::{SectorVector, SECTOR_COUNT};

/// Vertical anchor position as a fraction of viewport height. Slightly below
/// true center so the ring sits around the torso rather than the head.
pub const ANCHOR_HEIGHT_FRAC: f32 = 0.58;

/// Visual parameters for the danger ring.
#[derive(Debug, Clone)]
pub struct IndicatorStyle {
    /// Arrow glyph edge length in pixels.
    pub arrow_size: f32,
    /// Distance in pixels from the anchor to each arrow center.
    pub ring_radius: f32,
    /// Arrow opacity, clamped to 0..1 at use.
    pub opacity: f32,
    /// Arrow tint (rgb); multiplies the glyph texture.
    pub color: [f32; 3],
}

impl Default for IndicatorStyle {
    fn default() -> Self {
        Self {
            arrow_size: 18.0,
            ring_radius: 110.0,
            opacity: 0.95,
            color: [1.0, 0.0, 0.0],
        }
    }
}

/// One arrow draw: center position in pixels, edge length, clockwise rotation
/// in degrees, RGBA tint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowDraw {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub rotation_deg: f32,
    pub color: [f32; 4],
}

/// Turns a sector vector into arrow draws around the anchor point.
pub struct DangerIndicator {
    pub style: IndicatorStyle,
}

impl DangerIndicator {
    pub fn new(style: IndicatorStyle) -> Self {
        Self { style }
    }

    /// Screen-space anchor the arrows radiate from: horizontal center,
    /// biased below vertical center.
    pub fn anchor(screen_w: f32, screen_h: f32) -> Vec2 {
        Vec2::new(screen_w * 0.5, screen_h * ANCHOR_HEIGHT_FRAC)
    }

    /// Compute the arrow draws for the given sector vector: exactly one per
    /// active sector, none for an all-false vector. Each draw is independent;
    /// ordering between arrows carries no meaning.
    pub fn layout(&self, sectors: &SectorVector, screen_w: f32, screen_h: f32) -> Vec<ArrowDraw> {
        let anchor = Self::anchor(screen_w, screen_h);
        let opacity = self.style.opacity.clamp(0.0, 1.0);
        let color = [
            self.style.color[0],
            self.style.color[1],
            self.style.color[2],
            opacity,
        ];

        let mut draws = Vec::new();
        for index in 0..SECTOR_COUNT {
            if !sectors.is_active(index) {
                continue;
            }
            let angle_deg = index as f32 * 45.0;
            let rad = angle_deg.to_radians();
            // Ring direction in screen space: zero degrees points up, angles
            // grow clockwise.
            let dir = Vec2::new(rad.sin(), -rad.cos());
            let pos = anchor + dir * self.style.ring_radius;
            draws.push(ArrowDraw {
                x: pos.x,
                y: pos.y,
                size: self.style.arrow_size,
                rotation_deg: angle_deg,
                color,
            });
        }
        draws
    }

    /// Append the arrows to the overlay geometry.
    pub fn build(&self, tb: &mut OverlayBuilder, sectors: &SectorVector) {
        for arrow in self.layout(sectors, tb.screen_width(), tb.screen_height()) {
            tb.add_sprite(arrow.x, arrow.y, arrow.size, arrow.rotation_deg, arrow.color);
        }
    }
}
