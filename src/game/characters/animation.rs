// Character animation playback

use std::collections::HashMap;

/// A single animation clip
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    /// Name of the animation (e.g., "crouch", "crawl")
    pub name: String,
    /// Duration in seconds
    pub length: f32,
}

impl AnimationClip {
    pub fn new(name: &str, length: f32) -> Self {
        Self {
            name: name.to_string(),
            length: length.max(0.0),
        }
    }
}

/// Which way the current clip is playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackDirection {
    Forward,
    Backward,
}

/// Plays one clip at a time, forward or backward.
///
/// Stance animations are played forward when entering a lower stance and
/// backward when leaving it, so the clip position always tracks how far the
/// body is between the two poses.
#[derive(Debug, Default)]
pub struct AnimationPlayer {
    /// All available animations
    animations: HashMap<String, AnimationClip>,
    /// Currently playing animation name
    current_animation: String,
    /// Seconds into the current clip
    position: f32,
    direction: Option<PlaybackDirection>,
    /// Whether the animation is playing
    playing: bool,
    /// Playback speed multiplier (1.0 = normal)
    playback_speed: f32,
}

impl AnimationPlayer {
    pub fn new() -> Self {
        Self {
            playback_speed: 1.0,
            ..Self::default()
        }
    }

    /// Create an animation player with the stance clips
    pub fn with_standard_animations() -> Self {
        let mut player = Self::new();
        player.add_animation(AnimationClip::new("crouch", 0.3));
        player.add_animation(AnimationClip::new("crawl", 0.4));
        player
    }

    /// Add an animation clip
    pub fn add_animation(&mut self, clip: AnimationClip) {
        self.animations.insert(clip.name.clone(), clip);
    }

    pub fn has_animation(&self, name: &str) -> bool {
        self.animations.contains_key(name)
    }

    /// Play an animation from its start
    pub fn play(&mut self, name: &str) {
        self.start(name, PlaybackDirection::Forward);
    }

    /// Play an animation in reverse from its end
    pub fn play_backwards(&mut self, name: &str) {
        self.start(name, PlaybackDirection::Backward);
    }

    fn start(&mut self, name: &str, direction: PlaybackDirection) {
        let Some(clip) = self.animations.get(name) else {
            log::warn!("No animation named '{}'", name);
            return;
        };

        // Reversing the clip in flight keeps its position
        let resumed = self.current_animation == name && self.playing;
        if !resumed {
            self.position = match direction {
                PlaybackDirection::Forward => 0.0,
                PlaybackDirection::Backward => clip.length,
            };
        }

        self.current_animation = name.to_string();
        self.direction = Some(direction);
        self.playing = true;
        log::trace!("Playing '{}' {:?}", name, direction);
    }

    /// Stop and forget the current animation
    pub fn stop(&mut self) {
        self.playing = false;
        self.position = 0.0;
        self.direction = None;
    }

    /// Set playback speed (1.0 = normal, 2.0 = double speed)
    pub fn set_playback_speed(&mut self, speed: f32) {
        self.playback_speed = speed.max(0.0);
    }

    /// Advance the current animation
    pub fn update(&mut self, dt: f32) {
        if !self.playing {
            return;
        }

        let Some(clip) = self.animations.get(&self.current_animation) else {
            return;
        };

        let step = dt * self.playback_speed;
        match self.direction {
            Some(PlaybackDirection::Forward) => {
                self.position += step;
                if self.position >= clip.length {
                    self.position = clip.length;
                    self.playing = false;
                }
            }
            Some(PlaybackDirection::Backward) => {
                self.position -= step;
                if self.position <= 0.0 {
                    self.position = 0.0;
                    self.playing = false;
                }
            }
            None => {}
        }
    }

    /// Get the current animation name
    pub fn current_animation(&self) -> &str {
        &self.current_animation
    }

    pub fn direction(&self) -> Option<PlaybackDirection> {
        self.direction
    }

    /// Seconds into the current clip
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Check if the animation is playing
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Check if the current animation reached its end in the direction it plays
    pub fn is_finished(&self) -> bool {
        !self.playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_play_forward_to_end() {
        let mut player = AnimationPlayer::with_standard_animations();
        player.play("crouch");
        assert_eq!(player.current_animation(), "crouch");
        assert_eq!(player.direction(), Some(PlaybackDirection::Forward));

        player.update(0.1);
        assert_relative_eq!(player.position(), 0.1);
        assert!(player.is_playing());

        player.update(1.0);
        assert_relative_eq!(player.position(), 0.3);
        assert!(player.is_finished());
    }

    #[test]
    fn test_play_backwards_from_end() {
        let mut player = AnimationPlayer::with_standard_animations();
        player.play_backwards("crawl");
        assert_relative_eq!(player.position(), 0.4);

        player.update(0.5);
        assert_eq!(player.position(), 0.0);
        assert!(!player.is_playing());
    }

    #[test]
    fn test_reverse_in_flight_keeps_position() {
        let mut player = AnimationPlayer::with_standard_animations();
        player.play("crouch");
        player.update(0.2);

        player.play_backwards("crouch");
        assert_relative_eq!(player.position(), 0.2);

        player.update(0.1);
        assert_relative_eq!(player.position(), 0.1);
    }

    #[test]
    fn test_unknown_clip_is_ignored() {
        let mut player = AnimationPlayer::with_standard_animations();
        player.play("crouch");
        player.play("dance");
        assert_eq!(player.current_animation(), "crouch");
        assert!(!player.has_animation("dance"));
    }

    #[test]
    fn test_playback_speed() {
        let mut player = AnimationPlayer::new();
        player.add_animation(AnimationClip::new("test", 1.0));
        player.play("test");
        player.set_playback_speed(2.0);

        player.update(0.25);
        assert_relative_eq!(player.position(), 0.5);

        player.stop();
        assert!(!player.is_playing());
        assert_eq!(player.direction(), None);
    }
}
