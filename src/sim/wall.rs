//! Moving obstacle walls
//!
//! Walls drift vertically and bounce off the top and bottom edges. The set is
//! regenerated from scratch whenever the required count changes.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::state::{Arena, ColorTag, random_in};
use crate::consts::{WALL_MAX_COUNT, WALL_PLACEMENT_ATTEMPTS, WALL_SCORE_STEP};
use crate::settings::WallSettings;

/// A wall entity. `pos` is the top-left corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Pixels per tick, positive is downward
    pub vertical_speed: f32,
    pub color: ColorTag,
}

impl Wall {
    pub fn new(pos: Vec2, width: f32, height: f32, vertical_speed: f32) -> Self {
        Self {
            pos,
            width,
            height,
            vertical_speed,
            color: ColorTag::Gray,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(self.width, self.height))
    }

    /// Advance one tick, reversing at the arena edges
    pub fn step(&mut self, arena_height: f32) {
        self.pos.y += self.vertical_speed;

        if self.pos.y <= 0.0 {
            self.pos.y = 0.0;
            self.vertical_speed = self.vertical_speed.abs();
        } else if self.pos.y + self.height >= arena_height {
            self.pos.y = arena_height - self.height;
            self.vertical_speed = -self.vertical_speed.abs();
        }
    }
}

/// Number of walls for a combined score: one more every few points, capped
pub fn calculate_wall_count(total_score: u32, base_walls: u32) -> u32 {
    (base_walls + total_score / WALL_SCORE_STEP).min(WALL_MAX_COUNT)
}

/// Speed multiplier for a wall set: faster as more walls are added
pub fn wall_speed_multiplier(count: u32, base_count: u32, step: f32) -> f32 {
    1.0 + count.saturating_sub(base_count) as f32 * step
}

/// Place `count` walls, one per evenly spaced column between the paddle zones
///
/// Each wall's Y is rejection-sampled so it keeps `min_distance` vertically
/// from every wall already placed. A column that can't be satisfied within
/// the attempt budget is left empty, so fewer walls than requested may come back.
pub fn generate_walls(
    count: u32,
    settings: &WallSettings,
    arena: &Arena,
    speed_multiplier: f32,
    rng: &mut impl Rng,
) -> Vec<Wall> {
    let mut walls: Vec<Wall> = Vec::with_capacity(count as usize);
    if count == 0 {
        return walls;
    }

    let start_x = settings.paddle_zone;
    let end_x = arena.width - settings.paddle_zone;
    let col_width = (end_x - start_x) / count as f32;
    let speed = settings.base_speed * speed_multiplier;

    let min_y = settings.edge_margin;
    let max_y = arena.height - settings.height - settings.edge_margin;

    for i in 0..count {
        let x = start_x + (i as f32 + 0.5) * col_width - settings.width / 2.0;

        let y = (0..WALL_PLACEMENT_ATTEMPTS).find_map(|_| {
            let y = random_in(rng, min_y, max_y);
            walls
                .iter()
                .all(|w| (w.pos.y - y).abs() >= settings.min_distance)
                .then_some(y)
        });

        let Some(y) = y else {
            log::debug!(
                "Wall column {} skipped: no position after {} attempts",
                i,
                WALL_PLACEMENT_ATTEMPTS
            );
            continue;
        };

        let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        walls.push(Wall::new(
            Vec2::new(x, y),
            settings.width,
            settings.height,
            speed * direction,
        ));
    }

    walls
}
