//! Danger Ring: an eight-sector threat direction indicator. Red arrows
//! appear on a ring around the player whenever a nearby hostile has them
//! targeted, one arrow per compass sector. A small top-down demo scene
//! (wandering raiders plus one tamed companion) drives the scanner.

mod config;
mod indicator;
mod raider;
mod render;
mod threat;

use std::sync::Arc;

use anyhow::Result;
use engine_core::{Health, Player, Time, Transform};
use glam::{Quat, Vec3};
use hecs::{Entity, World};
use rand::{rngs::StdRng, SeedableRng};
use renderer::Renderer;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::KeyCode,
    window::{Window, WindowId},
};

use config::GameConfig;
use indicator::{DangerIndicator, IndicatorStyle};
use threat::{ScanConfig, ThreatScanner};

/// Player turn rate in radians per second.
const TURN_SPEED: f32 = 2.2;
/// Player walk speed in meters per second.
const MOVE_SPEED: f32 = 7.0;
/// Raiders in the demo scene at startup.
const DEMO_RAIDER_COUNT: usize = 12;

/// Pressed-key state for the demo controls.
#[derive(Debug, Default)]
struct InputState {
    forward: bool,
    backward: bool,
    turn_left: bool,
    turn_right: bool,
}

/// Main game state: scene world, scanner, indicator and renderer.
pub struct GameState {
    world: World,
    time: Time,
    input: InputState,
    rng: StdRng,

    renderer: Renderer,
    config: GameConfig,

    player: Entity,
    scanner: ThreatScanner,
    indicator: DangerIndicator,

    running: bool,
}

impl GameState {
    async fn new(window: Arc<Window>, config: GameConfig) -> Result<Self> {
        let renderer = Renderer::new(window, config.vsync).await?;

        let mut world = World::new();
        // Spawned facing +Z so the demo scene opens looking "north".
        let player = world.spawn((
            Transform::from_position_rotation(Vec3::ZERO, Quat::from_rotation_y(std::f32::consts::PI)),
            Player,
            Health::new(100.0),
        ));

        let mut rng = StdRng::from_entropy();
        raider::spawn_demo_scene(&mut world, &mut rng, DEMO_RAIDER_COUNT);

        let indicator = DangerIndicator::new(IndicatorStyle {
            arrow_size: config.arrow_size,
            ring_radius: config.ring_radius_px,
            opacity: config.opacity,
            ..Default::default()
        });

        Ok(Self {
            world,
            time: Time::new(),
            input: InputState::default(),
            rng,
            renderer,
            config,
            player,
            scanner: ThreatScanner::new(),
            indicator,
            running: true,
        })
    }

    fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            radius: self.config.scan_radius,
            refresh_seconds: self.config.refresh_seconds,
        }
    }

    fn update(&mut self) {
        self.time.update();
        // Cap delta to avoid huge steps from hitches.
        let dt = self.time.delta_seconds().min(0.05);

        // Player turn / walk. Positive yaw swings the facing to the right.
        let turn = (self.input.turn_right as i32 - self.input.turn_left as i32) as f32;
        let advance = (self.input.forward as i32 - self.input.backward as i32) as f32;
        if let Ok(mut transform) = self.world.get::<&mut Transform>(self.player) {
            if turn != 0.0 {
                transform.rotate_y(turn * TURN_SPEED * dt);
            }
            if advance != 0.0 {
                let fwd = transform.forward();
                let planar = Vec3::new(fwd.x, 0.0, fwd.z).normalize_or_zero();
                let step = planar * advance * MOVE_SPEED * dt;
                transform.translate(step);
            }
        }

        raider::update_raiders(&mut self.world, self.player, dt, &mut self.rng);

        if self.config.enabled {
            let scan_config = self.scan_config();
            self.scanner
                .update(&self.world, self.player, &scan_config, dt);
        }
    }

    fn render(&mut self) -> Result<()> {
        render::run(self)
    }

    /// Handle a window event. Returns true if the app should exit.
    fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.running = false;
                true
            }
            WindowEvent::Resized(size) => {
                self.renderer.resize(size);
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let winit::keyboard::PhysicalKey::Code(key) = event.physical_key {
                    let pressed = event.state.is_pressed();
                    match key {
                        KeyCode::KeyW | KeyCode::ArrowUp => self.input.forward = pressed,
                        KeyCode::KeyS | KeyCode::ArrowDown => self.input.backward = pressed,
                        KeyCode::KeyA | KeyCode::ArrowLeft => self.input.turn_left = pressed,
                        KeyCode::KeyD | KeyCode::ArrowRight => self.input.turn_right = pressed,
                        KeyCode::Escape if pressed => {
                            self.running = false;
                            return true;
                        }
                        KeyCode::F1 if pressed => {
                            raider::spawn_random_raider(&mut self.world, &mut self.rng);
                            log::info!("Spawned debug raider");
                        }
                        KeyCode::F4 if pressed => {
                            let mut killed = 0u32;
                            for (_, (health, _)) in
                                self.world.query_mut::<(&mut Health, &raider::Raider)>()
                            {
                                health.take_damage(10000.0);
                                killed += 1;
                            }
                            log::info!("Killed {} raiders", killed);
                        }
                        _ => {}
                    }
                }
                false
            }
            WindowEvent::RedrawRequested => {
                self.update();
                if let Err(e) = self.render() {
                    log::error!("Render error: {}", e);
                }
                self.renderer.window.request_redraw();
                false
            }
            _ => false,
        }
    }
}

/// Application handler for winit.
struct App {
    state: Option<GameState>,
}

impl App {
    fn new() -> Self {
        Self { state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let config = GameConfig::load();
            // Write the config back so a first run leaves an editable file.
            config.save();
            let window_attrs = Window::default_attributes()
                .with_title("Danger Ring")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    config.window_width,
                    config.window_height,
                ));

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            match pollster::block_on(GameState::new(window.clone(), config)) {
                Ok(s) => {
                    self.state = Some(s);
                    window.request_redraw();
                }
                Err(e) => {
                    log::error!("Failed to initialize: {}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) || !state.running {
                event_loop.exit();
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Danger Ring: sector threat indicator demo");
    println!("  WASD / arrows - turn and walk");
    println!("  F1            - spawn raider   F4 - kill all raiders");
    println!("  Escape        - quit");

    log::info!("Starting Danger Ring");

    let event_loop = EventLoop::new()?;
    // Poll continuously: the demo redraws every frame and the scan timer
    // rides on the redraw cadence.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}
