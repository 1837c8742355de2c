//! Demo raiders: wandering hostiles that acquire the player as their target
//! when close enough. They give the scanner a live scene to classify; the
//! scanner itself never touches their behavior.

use engine_core::{AIComponent, AIState, Creature, Health, Transform, Velocity};
use glam::{Quat, Vec3};
use hecs::{Entity, World};
use rand::prelude::*;

/// How close a raider must be to notice the player.
const AGGRO_RANGE: f32 = 40.0;
/// Distance beyond which a chasing raider gives up.
const FORGET_RANGE: f32 = 55.0;
/// Distance at which a raider stops and attacks.
const ATTACK_RANGE: f32 = 2.0;
/// Seconds between wander direction changes.
const WANDER_INTERVAL: f32 = 3.0;
const WANDER_SPEED_FACTOR: f32 = 0.4;
/// How close the tamed companion heels to the player.
const COMPANION_FOLLOW_DISTANCE: f32 = 4.0;

/// Tag + wander state for demo creatures.
#[derive(Debug, Clone, Copy)]
pub struct Raider {
    wander_timer: f32,
    wander_dir: Vec3,
}

impl Raider {
    fn new() -> Self {
        Self {
            wander_timer: 0.0,
            wander_dir: Vec3::ZERO,
        }
    }
}

/// Spawn one hostile raider at the given position.
pub fn spawn_raider(world: &mut World, position: Vec3) -> Entity {
    world.spawn((
        Transform::from_position(position),
        Velocity::default(),
        Health::new(40.0),
        Creature {
            tamed: false,
            move_speed: 4.5,
        },
        AIComponent::new(AGGRO_RANGE, FORGET_RANGE, ATTACK_RANGE),
        Raider::new(),
    ))
}

/// Spawn a random raider somewhere on a ring around the origin.
pub fn spawn_random_raider(world: &mut World, rng: &mut StdRng) -> Entity {
    let angle = rng.gen::<f32>() * std::f32::consts::TAU;
    let dist = 20.0 + rng.gen::<f32>() * 35.0;
    spawn_raider(world, Vec3::new(angle.cos() * dist, 0.0, angle.sin() * dist))
}

/// Populate the demo scene: a ring of raiders plus one tamed companion that
/// heels to the player and never lights up the ring.
pub fn spawn_demo_scene(world: &mut World, rng: &mut StdRng, raider_count: usize) {
    for i in 0..raider_count {
        let angle = (i as f32 / raider_count as f32) * std::f32::consts::TAU
            + rng.gen::<f32>() * 0.4;
        let dist = 20.0 + rng.gen::<f32>() * 35.0;
        spawn_raider(world, Vec3::new(angle.cos() * dist, 0.0, angle.sin() * dist));
    }

    world.spawn((
        Transform::from_position(Vec3::new(2.0, 0.0, -2.0)),
        Velocity::default(),
        Health::new(60.0),
        Creature {
            tamed: true,
            move_speed: 5.0,
        },
        AIComponent::new(AGGRO_RANGE, FORGET_RANGE, ATTACK_RANGE),
        Raider::new(),
    ));
}

/// Drive all raiders for one tick: wander while idle, chase the player while
/// aggroed, stop inside attack range. The tamed companion follows the player
/// instead of hunting it.
pub fn update_raiders(world: &mut World, player: Entity, dt: f32, rng: &mut StdRng) {
    let player_pos = match world.get::<&Transform>(player) {
        Ok(t) => t.position,
        Err(_) => return,
    };

    for (_, (transform, velocity, health, creature, ai, raider)) in world
        .query_mut::<(
            &mut Transform,
            &mut Velocity,
            &Health,
            &Creature,
            &mut AIComponent,
            &mut Raider,
        )>()
    {
        if health.is_dead() {
            velocity.linear = Vec3::ZERO;
            ai.target = None;
            continue;
        }

        let to_player = player_pos - transform.position;
        let planar = Vec3::new(to_player.x, 0.0, to_player.z);
        let distance = planar.length();

        if creature.tamed {
            // Companion: heel to the player, no threat behavior.
            velocity.linear = if distance > COMPANION_FOLLOW_DISTANCE {
                planar.normalize_or_zero() * creature.move_speed
            } else {
                Vec3::ZERO
            };
            ai.target = Some(player);
            ai.state = AIState::Idle;
        } else {
            match ai.state {
                AIState::Idle => {
                    if distance < ai.aggro_range {
                        ai.state = AIState::Chasing;
                        ai.target = Some(player);
                    }
                }
                AIState::Chasing => {
                    if distance < ai.attack_range {
                        ai.state = AIState::Attacking;
                    } else if distance > ai.forget_range {
                        ai.state = AIState::Idle;
                        ai.target = None;
                    }
                }
                AIState::Attacking => {
                    if distance > ai.attack_range * 1.5 {
                        ai.state = AIState::Chasing;
                    }
                }
            }

            match ai.state {
                AIState::Idle => {
                    raider.wander_timer -= dt;
                    if raider.wander_timer <= 0.0 {
                        raider.wander_timer = WANDER_INTERVAL * (0.5 + rng.gen::<f32>());
                        let a = rng.gen::<f32>() * std::f32::consts::TAU;
                        raider.wander_dir = Vec3::new(a.cos(), 0.0, a.sin());
                    }
                    velocity.linear =
                        raider.wander_dir * creature.move_speed * WANDER_SPEED_FACTOR;
                }
                AIState::Chasing => {
                    velocity.linear = planar.normalize_or_zero() * creature.move_speed;
                }
                AIState::Attacking => {
                    velocity.linear = Vec3::ZERO;
                }
            }
        }

        transform.position += velocity.linear * dt;

        // Face movement direction.
        if velocity.linear.length_squared() > 0.01 {
            let forward = velocity.linear.normalize();
            transform.rotation = Quat::from_rotation_arc(-Vec3::Z, forward);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Player;

    fn world_with_player(position: Vec3) -> (World, Entity, StdRng) {
        let mut world = World::new();
        let player = world.spawn((Transform::from_position(position), Player, Health::new(100.0)));
        (world, player, StdRng::seed_from_u64(7))
    }

    #[test]
    fn nearby_raider_acquires_the_player() {
        let (mut world, player, mut rng) = world_with_player(Vec3::ZERO);
        let raider = spawn_raider(&mut world, Vec3::new(10.0, 0.0, 0.0));
        update_raiders(&mut world, player, 0.1, &mut rng);
        let ai = world.get::<&AIComponent>(raider).unwrap();
        assert_eq!(ai.state, AIState::Chasing);
        assert_eq!(ai.target, Some(player));
    }

    #[test]
    fn distant_raider_stays_idle_with_no_target() {
        let (mut world, player, mut rng) = world_with_player(Vec3::ZERO);
        let raider = spawn_raider(&mut world, Vec3::new(100.0, 0.0, 0.0));
        update_raiders(&mut world, player, 0.1, &mut rng);
        let ai = world.get::<&AIComponent>(raider).unwrap();
        assert_eq!(ai.state, AIState::Idle);
        assert_eq!(ai.target, None);
    }

    #[test]
    fn chasing_raider_forgets_when_out_of_range() {
        let (mut world, player, mut rng) = world_with_player(Vec3::ZERO);
        let raider = spawn_raider(&mut world, Vec3::new(10.0, 0.0, 0.0));
        update_raiders(&mut world, player, 0.1, &mut rng);

        world
            .get::<&mut Transform>(raider)
            .unwrap()
            .position = Vec3::new(100.0, 0.0, 0.0);
        update_raiders(&mut world, player, 0.1, &mut rng);
        let ai = world.get::<&AIComponent>(raider).unwrap();
        assert_eq!(ai.state, AIState::Idle);
        assert_eq!(ai.target, None);
    }

    #[test]
    fn chasing_raider_closes_distance() {
        let (mut world, player, mut rng) = world_with_player(Vec3::ZERO);
        let raider = spawn_raider(&mut world, Vec3::new(10.0, 0.0, 0.0));
        update_raiders(&mut world, player, 0.1, &mut rng);
        let before = world.get::<&Transform>(raider).unwrap().position.x;
        update_raiders(&mut world, player, 0.5, &mut rng);
        let after = world.get::<&Transform>(raider).unwrap().position.x;
        assert!(after < before);
    }

    #[test]
    fn dead_raider_stops_and_drops_target() {
        let (mut world, player, mut rng) = world_with_player(Vec3::ZERO);
        let raider = spawn_raider(&mut world, Vec3::new(10.0, 0.0, 0.0));
        update_raiders(&mut world, player, 0.1, &mut rng);
        world
            .get::<&mut Health>(raider)
            .unwrap()
            .take_damage(1000.0);
        update_raiders(&mut world, player, 0.1, &mut rng);
        let ai = world.get::<&AIComponent>(raider).unwrap();
        assert_eq!(ai.target, None);
        assert_eq!(world.get::<&Velocity>(raider).unwrap().linear, Vec3::ZERO);
    }
}
