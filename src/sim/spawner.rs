//! Obstacle and power-up spawning
//!
//! Variant choice is table-driven: rules are checked top-down and the first
//! match wins, falling back to the common variant.

use rand::Rng;

use super::entities::{Obstacle, ObstacleKind, Powerup, PowerupKind};
use crate::consts::*;

/// Condition on a uniform draw in [0, 1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Draw {
    /// draw < threshold
    Below(f32),
    /// draw > threshold
    Above(f32),
}

impl Draw {
    pub fn matches(self, draw: f32) -> bool {
        match self {
            Draw::Below(t) => draw < t,
            Draw::Above(t) => draw > t,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ObstacleRule {
    /// Rule applies only once the score is strictly above this
    pub score_above: f32,
    pub draw: Draw,
    pub kind: ObstacleKind,
}

/// Harder variants unlock with score; everything else is a block
pub const OBSTACLE_RULES: [ObstacleRule; 2] = [
    ObstacleRule {
        score_above: 2000.0,
        draw: Draw::Below(0.25),
        kind: ObstacleKind::Drone,
    },
    ObstacleRule {
        score_above: 4000.0,
        draw: Draw::Above(0.85),
        kind: ObstacleKind::Roller,
    },
];

#[derive(Debug, Clone, Copy)]
pub struct PowerupRule {
    pub draw: Draw,
    pub kind: PowerupKind,
}

/// Rarer variants first; anything at or below 0.4 is currency
pub const POWERUP_RULES: [PowerupRule; 3] = [
    PowerupRule {
        draw: Draw::Above(0.8),
        kind: PowerupKind::Shield,
    },
    PowerupRule {
        draw: Draw::Above(0.6),
        kind: PowerupKind::Warp,
    },
    PowerupRule {
        draw: Draw::Above(0.4),
        kind: PowerupKind::Magnet,
    },
];

pub fn select_obstacle(score: f32, draw: f32) -> ObstacleKind {
    OBSTACLE_RULES
        .iter()
        .find(|rule| score > rule.score_above && rule.draw.matches(draw))
        .map(|rule| rule.kind)
        .unwrap_or(ObstacleKind::Block)
}

pub fn select_powerup(draw: f32) -> PowerupKind {
    POWERUP_RULES
        .iter()
        .find(|rule| rule.draw.matches(draw))
        .map(|rule| rule.kind)
        .unwrap_or(PowerupKind::Currency)
}

/// Frames between obstacle attempts: shrinks as speed grows, `jitter` in [0, 1)
pub fn spawn_interval(speed: f32, jitter: f32) -> u64 {
    let frames = (OBSTACLE_SPAWN_BUDGET / speed.max(f32::EPSILON) * (1.0 + jitter)).floor();
    (frames as u64).max(1)
}

/// Obstacle spawn attempt for this frame
pub fn try_spawn_obstacle(
    frame: u64,
    speed: f32,
    score: f32,
    width: f32,
    height: f32,
    rng: &mut impl Rng,
) -> Option<Obstacle> {
    let interval = spawn_interval(speed, rng.random::<f32>());
    if frame % interval != 0 {
        return None;
    }
    let kind = select_obstacle(score, rng.random::<f32>());
    log::debug!("Spawn {:?} at frame {} (interval {})", kind, frame, interval);
    Some(Obstacle::spawn(kind, width, height, rng))
}

/// Power-up spawn attempt for this frame (flat chance, independent of obstacles)
pub fn try_spawn_powerup(width: f32, height: f32, rng: &mut impl Rng) -> Option<Powerup> {
    if rng.random::<f32>() >= POWERUP_SPAWN_CHANCE {
        return None;
    }
    let kind = select_powerup(rng.random::<f32>());
    Some(Powerup::spawn(kind, width, height, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_no_special_obstacles_at_low_score() {
        for i in 0..1000 {
            let draw = i as f32 / 1000.0;
            assert_eq!(select_obstacle(0.0, draw), ObstacleKind::Block);
            assert_eq!(select_obstacle(2000.0, draw), ObstacleKind::Block);
        }
    }

    #[test]
    fn test_obstacle_gates() {
        assert_eq!(select_obstacle(2000.1, 0.1), ObstacleKind::Drone);
        assert_eq!(select_obstacle(2000.1, 0.9), ObstacleKind::Block);
        assert_eq!(select_obstacle(4000.0, 0.9), ObstacleKind::Block);
        assert_eq!(select_obstacle(4000.1, 0.9), ObstacleKind::Roller);
        // Drone rule is checked first
        assert_eq!(select_obstacle(5000.0, 0.1), ObstacleKind::Drone);
        assert_eq!(select_obstacle(5000.0, 0.5), ObstacleKind::Block);
    }

    #[test]
    fn test_powerup_bands() {
        assert_eq!(select_powerup(0.95), PowerupKind::Shield);
        assert_eq!(select_powerup(0.8), PowerupKind::Warp);
        assert_eq!(select_powerup(0.7), PowerupKind::Warp);
        assert_eq!(select_powerup(0.6), PowerupKind::Magnet);
        assert_eq!(select_powerup(0.5), PowerupKind::Magnet);
        assert_eq!(select_powerup(0.4), PowerupKind::Currency);
        assert_eq!(select_powerup(0.0), PowerupKind::Currency);
    }

    #[test]
    fn test_interval_shrinks_with_speed() {
        assert_eq!(spawn_interval(BASE_SPEED, 0.0), 171);
        assert_eq!(spawn_interval(12.0, 0.0), 100);
        assert_eq!(spawn_interval(12.0, 0.5), 150);
        assert_eq!(spawn_interval(1.0e9, 0.0), 1);
    }

    #[test]
    fn test_frame_zero_always_spawns() {
        let mut rng = Pcg32::seed_from_u64(1);
        let obstacle = try_spawn_obstacle(0, BASE_SPEED, 0.0, 960.0, 540.0, &mut rng);
        assert_eq!(obstacle.map(|o| o.kind), Some(ObstacleKind::Block));
    }

    #[test]
    fn test_powerup_rate_is_roughly_flat() {
        let mut rng = Pcg32::seed_from_u64(42);
        let spawned = (0..100_000)
            .filter(|_| try_spawn_powerup(960.0, 540.0, &mut rng).is_some())
            .count();
        // 1.5% of 100k, with generous slack
        assert!((1200..1800).contains(&spawned), "spawned {}", spawned);
    }
}
