//! Threat scanning: which compass sectors around the player currently contain
//! a hostile that is actively targeting them.
//!
//! The scan is a pure function of the scene snapshot: every cycle the sector
//! vector is cleared and rebuilt from scratch, so stale activations can never
//! linger. A countdown timer keeps rescans at the configured cadence while
//! the renderer reads the latest vector every frame.

use engine_core::{AIComponent, Creature, Health, Transform};
use glam::Vec3;
use hecs::{Entity, World};

/// Number of 45-degree compass sectors around the observer.
pub const SECTOR_COUNT: usize = 8;
/// Hard floor for the rescan interval so a zero or negative configured
/// refresh can't degenerate into scanning every tick.
pub const MIN_REFRESH_SECONDS: f32 = 0.02;
/// Squared planar displacement below which a candidate has no usable
/// direction (e.g. it sits directly above or below the observer).
const MIN_PLANAR_DIST_SQ: f32 = 0.01;

/// Compass sector, index 0 = directly ahead of the observer, clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sector {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Sector {
    pub fn from_index(index: usize) -> Option<Sector> {
        match index {
            0 => Some(Sector::North),
            1 => Some(Sector::NorthEast),
            2 => Some(Sector::East),
            3 => Some(Sector::SouthEast),
            4 => Some(Sector::South),
            5 => Some(Sector::SouthWest),
            6 => Some(Sector::West),
            7 => Some(Sector::NorthWest),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Sector::North => "N",
            Sector::NorthEast => "NE",
            Sector::East => "E",
            Sector::SouthEast => "SE",
            Sector::South => "S",
            Sector::SouthWest => "SW",
            Sector::West => "W",
            Sector::NorthWest => "NW",
        }
    }
}

/// Which sectors currently contain a qualifying threat. Allocated once,
/// cleared and rewritten in place by every scan; read-only everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SectorVector {
    active: [bool; SECTOR_COUNT],
}

impl SectorVector {
    pub fn clear(&mut self) {
        self.active = [false; SECTOR_COUNT];
    }

    pub fn set(&mut self, sector: usize) {
        if sector < SECTOR_COUNT {
            self.active[sector] = true;
        }
    }

    pub fn is_active(&self, sector: usize) -> bool {
        self.active.get(sector).copied().unwrap_or(false)
    }

    pub fn any_active(&self) -> bool {
        self.active.iter().any(|a| *a)
    }

    pub fn as_array(&self) -> &[bool; SECTOR_COUNT] {
        &self.active
    }
}

/// Scan parameters, read-only for the duration of one scan.
#[derive(Debug, Clone, Copy)]
pub struct ScanConfig {
    /// Scan radius in meters (planar distance).
    pub radius: f32,
    /// Seconds between rescans, floored at [`MIN_REFRESH_SECONDS`].
    pub refresh_seconds: f32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            radius: 50.0,
            refresh_seconds: 0.2,
        }
    }
}

/// Periodically classifies hostiles into the eight sectors around the player.
pub struct ThreatScanner {
    sectors: SectorVector,
    scan_timer: f32,
}

impl Default for ThreatScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreatScanner {
    pub fn new() -> Self {
        Self {
            sectors: SectorVector::default(),
            scan_timer: 0.0,
        }
    }

    /// The sector vector as of the most recent completed scan.
    pub fn sectors(&self) -> &SectorVector {
        &self.sectors
    }

    /// Tick the scan timer and rescan when it expires. The first call after
    /// construction scans immediately.
    pub fn update(&mut self, world: &World, observer: Entity, config: &ScanConfig, dt: f32) {
        self.scan_timer -= dt;
        if self.scan_timer > 0.0 {
            return;
        }
        self.scan_timer = config.refresh_seconds.max(MIN_REFRESH_SECONDS);
        self.scan(world, observer, config);
    }

    /// Rebuild the sector vector from the current scene snapshot.
    ///
    /// A candidate is any entity carrying `Transform`, `Health`, `Creature`
    /// and `AIComponent`; entities missing a component are never considered.
    /// Qualifying candidates are alive, untamed, currently targeting the
    /// observer (same entity, not an equal-looking one), within the scan
    /// radius on the horizontal plane, and not directly above or below the
    /// observer.
    pub fn scan(&mut self, world: &World, observer: Entity, config: &ScanConfig) {
        let previous = self.sectors;
        self.sectors.clear();

        // Without a live observer there is nothing to classify; the vector
        // stays all-false until one reappears.
        let (observer_pos, facing) = match world.get::<&Transform>(observer) {
            Ok(t) => (t.position, t.forward()),
            Err(_) => return,
        };

        let radius_sq = config.radius * config.radius;

        for (_, (transform, health, creature, ai)) in world
            .query::<(&Transform, &Health, &Creature, &AIComponent)>()
            .iter()
        {
            if health.is_dead() {
                continue;
            }
            if creature.tamed {
                continue;
            }
            if ai.target != Some(observer) {
                continue;
            }

            let delta = transform.position - observer_pos;
            let planar = Vec3::new(delta.x, 0.0, delta.z);
            if planar.length_squared() > radius_sq {
                continue;
            }
            if planar.length_squared() < MIN_PLANAR_DIST_SQ {
                continue;
            }

            let angle = signed_angle_deg(facing, planar.normalize());
            self.sectors.set(sector_for_angle(angle));
        }

        let changed = self
            .sectors
            .as_array()
            .iter()
            .zip(previous.as_array().iter())
            .enumerate();
        for (index, (now, before)) in changed {
            if *now && !*before {
                if let Some(sector) = Sector::from_index(index) {
                    log::debug!("threat entered {} sector", sector.name());
                }
            }
        }
    }
}

/// Signed angle in degrees between `facing` and `dir`, measured around the
/// vertical axis on the horizontal plane. Range (-180, 180]; zero is directly
/// ahead and positive angles are clockwise (to the observer's right).
fn signed_angle_deg(facing: Vec3, dir: Vec3) -> f32 {
    let dot = facing.x * dir.x + facing.z * dir.z;
    let cross_y = facing.z * dir.x - facing.x * dir.z;
    cross_y.atan2(dot).to_degrees()
}

/// Map a clockwise angle from straight ahead to a sector index. The 22.5
/// degree shift puts sector boundaries half-way between sector centers, so
/// sector 0 spans (-22.5, 22.5] and a boundary angle lands in the higher
/// sector.
fn sector_for_angle(angle_deg: f32) -> usize {
    let mut shifted = angle_deg + 22.5;
    if shifted < 0.0 {
        shifted += 360.0;
    }
    ((shifted % 360.0) / 45.0) as usize % SECTOR_COUNT
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{AIState, Player};
    use glam::Quat;

    // Observer at the origin facing +Z (world "north" for these tests).
    fn observer_world() -> (World, Entity) {
        let mut world = World::new();
        let rotation = Quat::from_rotation_y(std::f32::consts::PI);
        let player = world.spawn((
            Transform::from_position_rotation(Vec3::ZERO, rotation),
            Player,
            Health::new(100.0),
        ));
        (world, player)
    }

    fn spawn_hostile(world: &mut World, position: Vec3, target: Option<Entity>) -> Entity {
        let mut ai = AIComponent::new(60.0, 80.0, 2.0);
        ai.state = AIState::Chasing;
        ai.target = target;
        world.spawn((
            Transform::from_position(position),
            Health::new(40.0),
            Creature {
                tamed: false,
                move_speed: 4.0,
            },
            ai,
        ))
    }

    fn scanned(world: &World, player: Entity, radius: f32) -> SectorVector {
        let mut scanner = ThreatScanner::new();
        scanner.scan(
            world,
            player,
            &ScanConfig {
                radius,
                refresh_seconds: 0.2,
            },
        );
        *scanner.sectors()
    }

    #[test]
    fn observer_faces_north() {
        let (world, player) = observer_world();
        let t = world.get::<&Transform>(player).unwrap();
        assert!((t.forward() - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn empty_scene_yields_all_false() {
        let (world, player) = observer_world();
        let sectors = scanned(&world, player, 50.0);
        assert_eq!(sectors.as_array(), &[false; SECTOR_COUNT]);
    }

    #[test]
    fn hostile_ahead_activates_front_sector() {
        let (mut world, player) = observer_world();
        spawn_hostile(&mut world, Vec3::new(0.0, 0.0, 10.0), Some(player));
        let sectors = scanned(&world, player, 50.0);
        assert!(sectors.is_active(0));
        assert_eq!(sectors.as_array().iter().filter(|a| **a).count(), 1);
    }

    #[test]
    fn hostile_northeast_activates_sector_one() {
        // End-to-end case: radius 50, live untamed hostile at (10, 0, 10)
        // targeting the observer sits at +45 degrees.
        let (mut world, player) = observer_world();
        spawn_hostile(&mut world, Vec3::new(10.0, 0.0, 10.0), Some(player));
        let sectors = scanned(&world, player, 50.0);
        assert!(sectors.is_active(1));
        assert_eq!(sectors.as_array().iter().filter(|a| **a).count(), 1);
    }

    #[test]
    fn dead_candidate_never_activates() {
        let (mut world, player) = observer_world();
        let hostile = spawn_hostile(&mut world, Vec3::new(0.0, 0.0, 10.0), Some(player));
        world
            .get::<&mut Health>(hostile)
            .unwrap()
            .take_damage(1000.0);
        let sectors = scanned(&world, player, 50.0);
        assert!(!sectors.any_active());
    }

    #[test]
    fn tamed_candidate_never_activates() {
        let (mut world, player) = observer_world();
        let hostile = spawn_hostile(&mut world, Vec3::new(0.0, 0.0, 10.0), Some(player));
        world.get::<&mut Creature>(hostile).unwrap().tamed = true;
        let sectors = scanned(&world, player, 50.0);
        assert!(!sectors.any_active());
    }

    #[test]
    fn candidate_without_target_never_activates() {
        let (mut world, player) = observer_world();
        spawn_hostile(&mut world, Vec3::new(0.0, 0.0, 10.0), None);
        let sectors = scanned(&world, player, 50.0);
        assert!(!sectors.any_active());
    }

    #[test]
    fn candidate_targeting_someone_else_never_activates() {
        let (mut world, player) = observer_world();
        let other = spawn_hostile(&mut world, Vec3::new(5.0, 0.0, 0.0), None);
        spawn_hostile(&mut world, Vec3::new(0.0, 0.0, 10.0), Some(other));
        let sectors = scanned(&world, player, 50.0);
        assert!(!sectors.any_active());
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let (mut world, player) = observer_world();
        spawn_hostile(&mut world, Vec3::new(0.0, 0.0, 50.0), Some(player));
        assert!(scanned(&world, player, 50.0).is_active(0));
    }

    #[test]
    fn beyond_range_is_excluded() {
        let (mut world, player) = observer_world();
        spawn_hostile(&mut world, Vec3::new(0.0, 0.0, 50.1), Some(player));
        assert!(!scanned(&world, player, 50.0).any_active());
    }

    #[test]
    fn range_ignores_height() {
        // 200m overhead but only 30m away on the plane: still in range.
        let (mut world, player) = observer_world();
        spawn_hostile(&mut world, Vec3::new(0.0, 200.0, 30.0), Some(player));
        assert!(scanned(&world, player, 50.0).is_active(0));
    }

    #[test]
    fn candidate_directly_overhead_is_degenerate() {
        let (mut world, player) = observer_world();
        spawn_hostile(&mut world, Vec3::new(0.0, 5.0, 0.0), Some(player));
        assert!(!scanned(&world, player, 50.0).any_active());
    }

    #[test]
    fn sectors_accumulate_across_candidates() {
        let (mut world, player) = observer_world();
        // Two in the NE sector, one due west.
        spawn_hostile(&mut world, Vec3::new(10.0, 0.0, 10.0), Some(player));
        spawn_hostile(&mut world, Vec3::new(8.0, 0.0, 12.0), Some(player));
        spawn_hostile(&mut world, Vec3::new(-20.0, 0.0, 0.0), Some(player));
        let sectors = scanned(&world, player, 50.0);
        assert!(sectors.is_active(1));
        assert!(sectors.is_active(6));
        assert_eq!(sectors.as_array().iter().filter(|a| **a).count(), 2);
    }

    #[test]
    fn scan_is_idempotent_for_unchanged_world() {
        let (mut world, player) = observer_world();
        spawn_hostile(&mut world, Vec3::new(10.0, 0.0, 10.0), Some(player));
        let first = scanned(&world, player, 50.0);
        let second = scanned(&world, player, 50.0);
        assert_eq!(first, second);
    }

    #[test]
    fn stale_activation_is_cleared_on_rescan() {
        let (mut world, player) = observer_world();
        let hostile = spawn_hostile(&mut world, Vec3::new(20.0, 0.0, 0.0), Some(player));
        let mut scanner = ThreatScanner::new();
        let config = ScanConfig::default();
        scanner.scan(&world, player, &config);
        assert!(scanner.sectors().is_active(2));

        world.despawn(hostile).unwrap();
        scanner.scan(&world, player, &config);
        assert!(!scanner.sectors().any_active());
    }

    #[test]
    fn missing_observer_resets_vector() {
        let (mut world, player) = observer_world();
        spawn_hostile(&mut world, Vec3::new(0.0, 0.0, 10.0), Some(player));
        let mut scanner = ThreatScanner::new();
        let config = ScanConfig::default();
        scanner.scan(&world, player, &config);
        assert!(scanner.sectors().any_active());

        world.despawn(player).unwrap();
        scanner.scan(&world, player, &config);
        assert!(!scanner.sectors().any_active());
    }

    #[test]
    fn update_is_gated_by_refresh_interval() {
        let (mut world, player) = observer_world();
        let mut scanner = ThreatScanner::new();
        let config = ScanConfig {
            radius: 50.0,
            refresh_seconds: 0.2,
        };

        // First update scans immediately (empty scene).
        scanner.update(&world, player, &config, 0.016);
        assert!(!scanner.sectors().any_active());

        // A hostile appears, but the timer hasn't expired yet.
        spawn_hostile(&mut world, Vec3::new(0.0, 0.0, 10.0), Some(player));
        scanner.update(&world, player, &config, 0.05);
        scanner.update(&world, player, &config, 0.05);
        assert!(!scanner.sectors().any_active());

        // Once the interval elapses, the rescan picks it up.
        scanner.update(&world, player, &config, 0.15);
        assert!(scanner.sectors().is_active(0));
    }

    #[test]
    fn refresh_interval_is_floored() {
        let (mut world, player) = observer_world();
        let mut scanner = ThreatScanner::new();
        let config = ScanConfig {
            radius: 50.0,
            refresh_seconds: 0.0,
        };

        scanner.update(&world, player, &config, 0.016);
        spawn_hostile(&mut world, Vec3::new(0.0, 0.0, 10.0), Some(player));

        // Even with a zero configured refresh, a rescan can't happen before
        // the floor elapses.
        scanner.update(&world, player, &config, 0.005);
        assert!(!scanner.sectors().any_active());
        scanner.update(&world, player, &config, 0.02);
        assert!(scanner.sectors().is_active(0));
    }

    #[test]
    fn signed_angle_convention_is_clockwise_positive() {
        let facing = Vec3::Z;
        assert!((signed_angle_deg(facing, Vec3::X) - 90.0).abs() < 1e-4);
        assert!((signed_angle_deg(facing, -Vec3::X) + 90.0).abs() < 1e-4);
        assert!(signed_angle_deg(facing, Vec3::Z).abs() < 1e-4);
        assert!((signed_angle_deg(facing, -Vec3::Z).abs() - 180.0).abs() < 1e-4);
    }

    #[test]
    fn sector_mapping_is_boundary_exact() {
        assert_eq!(sector_for_angle(0.0), 0);
        assert_eq!(sector_for_angle(10.0), 0);
        // Boundary angles belong to the higher sector.
        assert_eq!(sector_for_angle(22.5), 1);
        assert_eq!(sector_for_angle(-22.5), 0);
        assert_eq!(sector_for_angle(-22.4), 0);
        assert_eq!(sector_for_angle(45.0), 1);
        assert_eq!(sector_for_angle(67.5), 2);
        assert_eq!(sector_for_angle(90.0), 2);
        assert_eq!(sector_for_angle(180.0), 4);
        assert_eq!(sector_for_angle(-157.5), 5);
        assert_eq!(sector_for_angle(-90.0), 6);
        assert_eq!(sector_for_angle(-30.0), 7);
    }

    #[test]
    fn sector_names_cover_all_indices() {
        let names: Vec<_> = (0..SECTOR_COUNT)
            .map(|i| Sector::from_index(i).unwrap().name())
            .collect();
        assert_eq!(names, ["N", "NE", "E", "SE", "S", "SW", "W", "NW"]);
        assert!(Sector::from_index(8).is_none());
    }
}
