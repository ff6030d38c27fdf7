//! Steering behaviours.
//!
//! Each function returns a force for the caller to accumulate with
//! [`Fish::apply_force`]; none of them touch position or velocity.

use rand::Rng;

use crate::config::FlockConfig;
use crate::fish::Fish;
use crate::flock::Viewport;
use crate::vector::Vector2D;

/// Velocity the fish would like to have when heading for `target`.
///
/// With `arrive_radius > 0` the desired speed ramps down linearly inside
/// that radius; with `arrive_radius == 0` it is always `max_speed`.
pub fn desired_velocity(fish: &Fish, target: Vector2D, arrive_radius: f64) -> Vector2D {
    let offset = target - fish.position;
    let distance = offset.magnitude();

    let speed = if arrive_radius > 0.0 && distance < arrive_radius {
        fish.max_speed * (distance / arrive_radius)
    } else {
        fish.max_speed
    };

    offset.normalize() * speed
}

pub fn seek(fish: &Fish, target: Vector2D, strength: f64, arrive_radius: f64) -> Vector2D {
    let steering = desired_velocity(fish, target, arrive_radius) - fish.velocity;
    steering.limit(fish.max_force) * strength
}

/// Push away from neighbours inside `perception_radius`, weighted by
/// inverse distance. `neighbors` must not include `fish` itself.
pub fn separate<'a, I>(fish: &Fish, neighbors: I, perception_radius: f64, strength: f64) -> Vector2D
where
    I: IntoIterator<Item = &'a Fish>,
{
    let mut steering = Vector2D::zero();
    let mut count = 0;

    for other in neighbors {
        let distance = fish.position.distance(&other.position);
        if distance < perception_radius {
            let diff = (fish.position - other.position).normalize() / distance;
            steering += diff;
            count += 1;
        }
    }

    if count == 0 {
        return Vector2D::zero();
    }

    steering = steering / count as f64;
    steering = steering.normalize() * fish.max_speed;
    steering = steering - fish.velocity;
    steering.limit(fish.max_force * 2.0) * strength
}

/// Drift toward a point on a circle projected ahead of the fish.
///
/// Nudges `fish.wobble_phase` by a random amount in
/// `±config.wander_jitter`, which is what keeps the path curving.
pub fn wander<R: Rng + ?Sized>(
    fish: &mut Fish,
    strength: f64,
    config: &FlockConfig,
    rng: &mut R,
) -> Vector2D {
    if config.wander_jitter > 0.0 {
        fish.wobble_phase += rng.gen_range(-config.wander_jitter..config.wander_jitter);
    }

    let ahead = fish.position + fish.velocity.normalize() * config.wander_distance;
    let angle = fish.wobble_phase + fish.velocity.heading();
    let target = ahead + Vector2D::from_angle(angle) * config.wander_radius;

    seek(fish, target, strength, 0.0)
}

/// Turn back toward the interior when within `margin` of an edge.
pub fn boundaries(fish: &Fish, viewport: Viewport, margin: f64) -> Vector2D {
    let mut desired = Vector2D::zero();

    if fish.position.x < margin {
        desired.x = fish.max_speed;
    } else if fish.position.x > viewport.width - margin {
        desired.x = -fish.max_speed;
    }

    if fish.position.y < margin {
        desired.y = fish.max_speed;
    } else if fish.position.y > viewport.height - margin {
        desired.y = -fish.max_speed;
    }

    if desired.is_zero() {
        return Vector2D::zero();
    }

    let steering = desired.with_magnitude(fish.max_speed) - fish.velocity;
    steering.limit(fish.max_force)
}
