//! Rendering: clear pass plus the screen-space overlay (tactical minimap
//! markers and the danger ring).

use anyhow::Result;
use engine_core::{AIComponent, Creature, Health, Transform};
use glam::{Vec2, Vec3};
use renderer::OverlayBuilder;

use crate::indicator::DangerIndicator;
use crate::raider::Raider;
use crate::GameState;

/// Fraction of screen height between the anchor and the scan-radius ring.
const MINIMAP_EXTENT_FRAC: f32 = 0.42;
/// Dots drawn to suggest the scan-radius circle.
const RANGE_RING_DOTS: usize = 64;

const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.045,
    g: 0.05,
    b: 0.065,
    a: 1.0,
};

/// Run all render passes. Called from `GameState::render()`.
pub fn run(state: &mut GameState) -> Result<()> {
    let (output, mut encoder) = state.renderer.begin_frame()?;
    let view = output
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());

    state.renderer.clear(&mut encoder, &view, BACKGROUND);

    let (sw, sh) = state.renderer.dimensions();
    let tb = build_overlay(state, sw as f32, sh as f32);
    state
        .renderer
        .render_overlay(&mut encoder, &view, &tb.vertices, &tb.indices);
    state.renderer.end_frame(output, encoder);
    Ok(())
}

/// Build the frame's overlay geometry: range ring, creature markers, player
/// marker, and the danger ring. The view is facing-relative (up on screen is
/// always where the player is looking) so markers line up with the arrows.
fn build_overlay(state: &GameState, sw: f32, sh: f32) -> OverlayBuilder {
    let mut tb = OverlayBuilder::new(sw, sh);
    let anchor = DangerIndicator::anchor(sw, sh);

    let (player_pos, facing) = match state.world.get::<&Transform>(state.player) {
        Ok(t) => (t.position, t.forward()),
        Err(_) => return tb,
    };

    let fwd = Vec3::new(facing.x, 0.0, facing.z).normalize_or_zero();
    // Player's right on the horizontal plane (90 degrees clockwise of facing).
    let right = Vec3::new(fwd.z, 0.0, -fwd.x);
    let scale = sh * MINIMAP_EXTENT_FRAC / state.config.scan_radius.max(1.0);

    // Scan-radius circle, dotted.
    let ring_px = state.config.scan_radius * scale;
    for i in 0..RANGE_RING_DOTS {
        let a = i as f32 / RANGE_RING_DOTS as f32 * std::f32::consts::TAU;
        let x = anchor.x + a.sin() * ring_px;
        let y = anchor.y - a.cos() * ring_px;
        tb.add_rect(x - 1.0, y - 1.0, 2.0, 2.0, [0.22, 0.28, 0.32, 0.6]);
    }

    // Creature markers, rotated into the facing frame.
    for (_, (transform, health, creature, ai)) in state
        .world
        .query::<(&Transform, &Health, &Creature, &AIComponent)>()
        .with::<&Raider>()
        .iter()
    {
        let delta = transform.position - player_pos;
        let planar = Vec3::new(delta.x, 0.0, delta.z);
        let offset = Vec2::new(planar.dot(right), planar.dot(fwd)) * scale;
        let pos = Vec2::new(anchor.x + offset.x, anchor.y - offset.y);
        if pos.x < 0.0 || pos.x > sw || pos.y < 0.0 || pos.y > sh {
            continue;
        }

        let color = if health.is_dead() {
            [0.3, 0.3, 0.3, 0.7]
        } else if creature.tamed {
            [0.3, 0.9, 0.4, 0.9]
        } else if ai.target == Some(state.player) {
            [1.0, 0.25, 0.2, 1.0]
        } else {
            [0.7, 0.7, 0.6, 0.9]
        };
        tb.add_rect(pos.x - 3.0, pos.y - 3.0, 6.0, 6.0, color);
    }

    // Player marker at the anchor; nose points up (= facing, by construction).
    tb.add_rect(anchor.x - 4.0, anchor.y - 4.0, 8.0, 8.0, [0.9, 0.9, 0.95, 1.0]);
    tb.add_rect(anchor.x - 1.0, anchor.y - 11.0, 2.0, 7.0, [0.9, 0.9, 0.95, 1.0]);

    if state.config.enabled && state.scanner.sectors().any_active() {
        state.indicator.build(&mut tb, state.scanner.sectors());
    }

    tb
}
