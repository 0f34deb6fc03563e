//! Collision detection and response
//!
//! Everything here is axis-aligned: the ball, paddles and walls are all
//! rectangles. Overlaps are separated along the axis of least penetration
//! and the ball's velocity is reflected about the resulting normal.

use glam::Vec2;
use rand::Rng;

use super::state::{Ball, GameEvent, GameState};
use crate::audio::SoundEffect;
use crate::normalize;

/// Extra push applied past the exact overlap so resolved shapes no longer touch
pub const SEPARATION_SKIN: f32 = 0.01;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Zero (or negative) area boxes can't be resolved against
    pub fn is_degenerate(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }
}

/// Overlap test; touching edges do not count
#[inline]
pub fn check_collision(a: &Aabb, b: &Aabb) -> bool {
    a.pos.x < b.pos.x + b.size.x
        && a.pos.x + a.size.x > b.pos.x
        && a.pos.y < b.pos.y + b.size.y
        && a.pos.y + a.size.y > b.pos.y
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Separate the ball from `object` and bounce it
///
/// Without a hint the ball is pushed out along the axis of smaller overlap
/// (ties go to the Y axis) and always bounces. With a hint the ball is placed
/// against the face the hint points out of, and only bounces if it was still
/// heading into that face.
///
/// Returns the normal used, or `None` when nothing was resolved (no overlap
/// or degenerate bounds).
pub fn resolve_collision(ball: &mut Ball, object: &Aabb, hint_normal: Option<Vec2>) -> Option<Vec2> {
    if object.is_degenerate() || ball.size <= 0.0 {
        return None;
    }

    let delta = ball.center() - object.center();
    let overlap_x = ball.radius() + object.size.x / 2.0 - delta.x.abs();
    let overlap_y = ball.radius() + object.size.y / 2.0 - delta.y.abs();
    if overlap_x <= 0.0 || overlap_y <= 0.0 {
        return None;
    }

    if let Some(hint) = hint_normal {
        let n = axis_of(hint);
        if n.x > 0.0 {
            ball.pos.x = object.max().x + SEPARATION_SKIN;
        } else if n.x < 0.0 {
            ball.pos.x = object.pos.x - ball.size - SEPARATION_SKIN;
        } else if n.y > 0.0 {
            ball.pos.y = object.max().y + SEPARATION_SKIN;
        } else {
            ball.pos.y = object.pos.y - ball.size - SEPARATION_SKIN;
        }
        if ball.vel.dot(n) < 0.0 {
            ball.bounce(n);
        }
        return Some(n);
    }

    let normal = if overlap_x < overlap_y {
        let sign = if delta.x < 0.0 { -1.0 } else { 1.0 };
        ball.pos.x += sign * (overlap_x + SEPARATION_SKIN);
        Vec2::new(sign, 0.0)
    } else {
        let sign = if delta.y < 0.0 { -1.0 } else { 1.0 };
        ball.pos.y += sign * (overlap_y + SEPARATION_SKIN);
        Vec2::new(0.0, sign)
    };
    ball.bounce(normal);
    Some(normal)
}

/// Snap a hint to its dominant axis
fn axis_of(hint: Vec2) -> Vec2 {
    let n = normalize(hint);
    if n.x.abs() >= n.y.abs() {
        Vec2::new(n.x.signum(), 0.0)
    } else {
        Vec2::new(0.0, n.y.signum())
    }
}

/// Resolve the ball against the arena edges, paddles and walls for one tick
///
/// Order: top/bottom edge, then at most one paddle, then every wall (each
/// wall moves first). Wall hits are resolved one after another in list order.
pub fn handle_collisions(state: &mut GameState) {
    let GameState {
        settings,
        arena,
        time_ticks,
        ball,
        left_paddle,
        right_paddle,
        walls,
        power_ups,
        events,
        rng,
        ..
    } = state;
    let now = *time_ticks;

    // Top/bottom edges
    if ball.pos.y <= 0.0 {
        ball.pos.y = 0.0;
        if ball.vel.y < 0.0 {
            ball.bounce(Vec2::Y);
            events.push(GameEvent::Sound(SoundEffect::WallHit));
        }
    } else if ball.pos.y + ball.size >= arena.height {
        ball.pos.y = arena.height - ball.size;
        if ball.vel.y > 0.0 {
            ball.bounce(Vec2::NEG_Y);
            events.push(GameEvent::Sound(SoundEffect::WallHit));
        }
    }

    // Paddles - only the first hit counts
    let paddle_hit = if check_collision(&ball.bounds(), &left_paddle.bounds()) {
        Some((left_paddle.bounds(), left_paddle.speed, Vec2::X))
    } else if check_collision(&ball.bounds(), &right_paddle.bounds()) {
        Some((right_paddle.bounds(), right_paddle.speed, Vec2::NEG_X))
    } else {
        None
    };

    if let Some((bounds, paddle_speed, normal)) = paddle_hit {
        resolve_collision(ball, &bounds, Some(normal));
        // Transfer paddle momentum into the ball
        ball.accelerate(normal.x * paddle_speed * settings.paddle.english, 0.0);
        ball.limit_speed(settings.ball.max_speed);
        events.push(GameEvent::Sound(SoundEffect::PaddleHit));

        if rng.random::<f64>() < settings.power_ups.paddle_hit_chance {
            power_ups.spawn_random(now, arena, rng, events);
        }
    }

    for wall in walls.iter_mut() {
        wall.step(arena.height);
        if !check_collision(&ball.bounds(), &wall.bounds()) {
            continue;
        }

        resolve_collision(ball, &wall.bounds(), None);
        events.push(GameEvent::Sound(SoundEffect::BallHitWall));

        if rng.random::<f64>() < settings.power_ups.wall_hit_chance {
            let count = rng.random_range(1..=2);
            power_ups.spawn_multiple(count, now, arena, rng, events);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::wall::Wall;
    use proptest::prelude::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Aabb {
        Aabb::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    fn ball_at(x: f32, y: f32, vel: Vec2) -> Ball {
        Ball::new(Vec2::new(x, y), vel, 10.0)
    }

    /// Playing state with no walls and no random spawns
    fn quiet_state() -> GameState {
        let mut settings = Settings::default();
        settings.power_ups.paddle_hit_chance = 0.0;
        settings.power_ups.wall_hit_chance = 0.0;
        let mut state = GameState::new(settings);
        state.walls.clear();
        state.events.clear();
        state
    }

    #[test]
    fn test_check_collision_touching_edges() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        assert!(!check_collision(&a, &rect(10.0, 0.0, 10.0, 10.0)));
        assert!(check_collision(&a, &rect(9.0, 9.0, 10.0, 10.0)));
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let reflected = reflect_velocity(Vec2::new(100.0, 0.0), Vec2::new(-1.0, 0.0));
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_resolve_along_smaller_overlap() {
        // Ball clipping the left face of a tall box: X overlap is smaller
        let mut ball = ball_at(95.0, 150.0, Vec2::new(4.0, 1.0));
        let wall = rect(100.0, 100.0, 10.0, 100.0);
        let normal = resolve_collision(&mut ball, &wall, None);

        assert_eq!(normal, Some(Vec2::new(-1.0, 0.0)));
        assert!(ball.pos.x + ball.size <= 100.0);
        assert_eq!(ball.vel, Vec2::new(-4.0, 1.0));
        assert!(!check_collision(&ball.bounds(), &wall));
    }

    #[test]
    fn test_resolve_tie_prefers_vertical() {
        // Equal overlap on both axes
        let mut ball = ball_at(95.0, 95.0, Vec2::new(1.0, 1.0));
        let block = rect(100.0, 100.0, 10.0, 10.0);
        let normal = resolve_collision(&mut ball, &block, None);
        assert_eq!(normal, Some(Vec2::new(0.0, -1.0)));
        assert_eq!(ball.vel, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_resolve_degenerate_bounds_is_noop() {
        let mut ball = ball_at(95.0, 95.0, Vec2::new(1.0, 1.0));
        let before = ball.clone();
        assert_eq!(resolve_collision(&mut ball, &rect(100.0, 100.0, 0.0, 10.0), None), None);
        assert_eq!(ball.pos, before.pos);
        assert_eq!(ball.vel, before.vel);
    }

    #[test]
    fn test_resolve_with_hint_pushes_out_of_face() {
        // Ball deep inside a paddle, forced out to the right
        let paddle = rect(30.0, 250.0, 20.0, 100.0);
        let mut ball = ball_at(35.0, 300.0, Vec2::new(-4.0, 2.0));
        let normal = resolve_collision(&mut ball, &paddle, Some(Vec2::X));

        assert_eq!(normal, Some(Vec2::X));
        assert!(ball.pos.x >= 50.0);
        assert_eq!(ball.vel, Vec2::new(4.0, 2.0));

        // Already moving away: no second flip
        let mut ball = ball_at(45.0, 300.0, Vec2::new(4.0, 2.0));
        resolve_collision(&mut ball, &paddle, Some(Vec2::X));
        assert_eq!(ball.vel, Vec2::new(4.0, 2.0));
    }

    #[test]
    fn test_top_edge_bounce() {
        let mut state = quiet_state();
        state.ball = ball_at(600.0, -3.0, Vec2::new(4.0, -4.0));
        handle_collisions(&mut state);

        assert_eq!(state.ball.pos.y, 0.0);
        assert_eq!(state.ball.vel, Vec2::new(4.0, 4.0));
        assert_eq!(state.events, vec![GameEvent::Sound(SoundEffect::WallHit)]);
    }

    #[test]
    fn test_bottom_edge_bounce() {
        let mut state = quiet_state();
        state.ball = ball_at(600.0, 795.0, Vec2::new(-4.0, 4.0));
        handle_collisions(&mut state);

        assert_eq!(state.ball.pos.y, 790.0);
        assert_eq!(state.ball.vel, Vec2::new(-4.0, -4.0));
    }

    #[test]
    fn test_paddle_hit_transfers_speed() {
        let mut state = quiet_state();
        state.left_paddle.speed = 10.0;
        state.ball = ball_at(45.0, 290.0, Vec2::new(-4.0, 4.0));
        let speed_before = state.ball.speed;
        handle_collisions(&mut state);

        assert!(state.ball.vel.x > 0.0);
        assert!(state.ball.pos.x >= 50.0);
        // 4 + 10 * 0.15
        assert!((state.ball.vel.x - 5.5).abs() < 1e-4);
        assert!(state.ball.speed > speed_before);
        assert!((state.ball.vel.length() - state.ball.speed).abs() < 1e-4);
        assert_eq!(state.events, vec![GameEvent::Sound(SoundEffect::PaddleHit)]);
    }

    #[test]
    fn test_paddle_hit_respects_max_speed() {
        let mut state = quiet_state();
        state.settings.ball.max_speed = 6.0;
        state.right_paddle.speed = 15.0;
        state.ball = ball_at(1145.0, 290.0, Vec2::new(4.0, 4.0));
        handle_collisions(&mut state);

        assert!(state.ball.vel.x < 0.0);
        assert!((state.ball.speed - 6.0).abs() < 1e-5);
        assert!((state.ball.vel.length() - 6.0).abs() < 1e-4);
    }

    #[test]
    fn test_wall_hit_moves_wall_and_resolves() {
        let mut state = quiet_state();
        state.walls.push(Wall::new(Vec2::new(500.0, 300.0), 10.0, 100.0, 2.0));
        state.ball = ball_at(493.0, 340.0, Vec2::new(4.0, 0.5));
        handle_collisions(&mut state);

        assert_eq!(state.walls[0].pos.y, 302.0);
        assert!(state.ball.vel.x < 0.0);
        assert!(!check_collision(&state.ball.bounds(), &state.walls[0].bounds()));
        assert_eq!(state.events, vec![GameEvent::Sound(SoundEffect::BallHitWall)]);
    }

    #[test]
    fn test_wall_hit_spawns_power_ups() {
        let mut state = quiet_state();
        state.settings.power_ups.wall_hit_chance = 1.0;
        state.walls.push(Wall::new(Vec2::new(500.0, 300.0), 10.0, 100.0, 0.0));
        state.ball = ball_at(493.0, 340.0, Vec2::new(4.0, 0.5));
        handle_collisions(&mut state);

        let spawned = state.power_ups.power_ups().len();
        assert!((1..=2).contains(&spawned));
    }

    proptest! {
        #[test]
        fn prop_overlap_symmetric(
            ax in -500f32..500.0, ay in -500f32..500.0, aw in 0f32..200.0, ah in 0f32..200.0,
            bx in -500f32..500.0, by in -500f32..500.0, bw in 0f32..200.0, bh in 0f32..200.0,
        ) {
            let a = rect(ax, ay, aw, ah);
            let b = rect(bx, by, bw, bh);
            prop_assert_eq!(check_collision(&a, &b), check_collision(&b, &a));
        }

        #[test]
        fn prop_reflection_law(angle in 0f32..std::f32::consts::TAU, vx in -20f32..20.0, vy in -20f32..20.0) {
            let n = Vec2::new(angle.cos(), angle.sin());
            let t = Vec2::new(-n.y, n.x);
            let v = Vec2::new(vx, vy);
            let r = reflect_velocity(v, n);
            prop_assert!((r.dot(n) + v.dot(n)).abs() < 1e-3);
            prop_assert!((r.dot(t) - v.dot(t)).abs() < 1e-3);
        }

        #[test]
        fn prop_resolution_separates(
            fx in 0.01f32..0.99, fy in 0.01f32..0.99,
            ox in 50f32..150.0, oy in 50f32..150.0, ow in 5f32..60.0, oh in 5f32..120.0,
            vx in -10f32..10.0, vy in -10f32..10.0,
        ) {
            // Place the ball somewhere strictly overlapping the object
            let object = rect(ox, oy, ow, oh);
            let bx = ox - 10.0 + fx * (ow + 10.0);
            let by = oy - 10.0 + fy * (oh + 10.0);
            let mut ball = ball_at(bx, by, Vec2::new(vx, vy));
            prop_assert!(check_collision(&ball.bounds(), &object));
            prop_assert!(resolve_collision(&mut ball, &object, None).is_some());
            prop_assert!(!check_collision(&ball.bounds(), &object));
        }
    }
}
