// Character settings - ability toggles, camera feel and body dimensions

use glam::Vec3;

/// Which movement abilities the character has unlocked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Abilities {
    pub jump: bool,
    /// Jumping off a wall while wall-running
    pub wall_jump: bool,
    pub wall_run: bool,
    pub run: bool,
    pub crouch: bool,
    pub crawl: bool,
    pub slide: bool,
}

impl Default for Abilities {
    fn default() -> Self {
        Self {
            jump: true,
            wall_jump: false,
            wall_run: false,
            run: true,
            crouch: true,
            crawl: false,
            slide: false,
        }
    }
}

impl Abilities {
    /// Everything unlocked
    pub fn all() -> Self {
        Self {
            jump: true,
            wall_jump: true,
            wall_run: true,
            run: true,
            crouch: true,
            crawl: true,
            slide: true,
        }
    }
}

/// Mouse look parameters
#[derive(Debug, Clone, PartialEq)]
pub struct CameraSettings {
    /// Blend factor toward the target rotation per mouse event (0..1)
    pub camera_sensitivity: f32,
    /// Scale applied to raw mouse motion, in thousandths
    pub mouse_sensitivity: f32,
    /// Maximum head pitch up or down, in radians
    pub camera_vertical_limit: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            camera_sensitivity: 0.45,
            mouse_sensitivity: 3.0,
            camera_vertical_limit: std::f32::consts::FRAC_PI_2,
        }
    }
}

/// Collision and head dimensions for each stance
#[derive(Debug, Clone, PartialEq)]
pub struct BodySettings {
    pub radius: f32,
    pub stand_height: f32,
    pub crouch_height: f32,
    pub crawl_height: f32,
    /// Eye height above the feet while standing
    pub stand_head_height: f32,
    pub crouch_head_height: f32,
    pub crawl_head_height: f32,
    /// Steepest walkable slope, in degrees
    pub floor_max_angle_degrees: f32,
    pub floor_snap_length: f32,
    pub up_direction: Vec3,
}

impl Default for BodySettings {
    fn default() -> Self {
        Self {
            radius: 0.4,
            stand_height: 1.8,
            crouch_height: 1.2,
            crawl_height: 0.8,
            stand_head_height: 1.6,
            crouch_head_height: 1.0,
            crawl_head_height: 0.5,
            floor_max_angle_degrees: 45.0,
            floor_snap_length: 0.1,
            up_direction: Vec3::Y,
        }
    }
}

/// Posture of the character; each one has its own capsule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stance {
    #[default]
    Stand,
    Crouch,
    Crawl,
}

impl BodySettings {
    pub fn height(&self, stance: Stance) -> f32 {
        match stance {
            Stance::Stand => self.stand_height,
            Stance::Crouch => self.crouch_height,
            Stance::Crawl => self.crawl_height,
        }
    }

    pub fn head_height(&self, stance: Stance) -> f32 {
        match stance {
            Stance::Stand => self.stand_head_height,
            Stance::Crouch => self.crouch_head_height,
            Stance::Crawl => self.crawl_head_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_abilities() {
        let abilities = Abilities::default();
        assert!(abilities.jump && abilities.run && abilities.crouch);
        assert!(!abilities.wall_run && !abilities.wall_jump);
        assert!(!abilities.crawl && !abilities.slide);
    }

    #[test]
    fn test_stance_heights_shrink() {
        let settings = BodySettings::default();
        assert!(settings.height(Stance::Stand) > settings.height(Stance::Crouch));
        assert!(settings.height(Stance::Crouch) > settings.height(Stance::Crawl));
        for stance in [Stance::Stand, Stance::Crouch, Stance::Crawl] {
            assert!(settings.head_height(stance) < settings.height(stance));
        }
    }
}
