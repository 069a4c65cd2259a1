// One-shot countdown timer advanced by physics ticks

/// A one-shot countdown.
///
/// Nothing happens in the background: the owner calls `tick` once per
/// physics step and reacts when it reports a timeout.
#[derive(Debug, Clone, PartialEq)]
pub struct Timer {
    wait_time: f32,
    time_left: f32,
    running: bool,
}

impl Timer {
    /// Create a stopped timer lasting `wait_time` seconds
    pub fn new(wait_time: f32) -> Self {
        Self {
            wait_time: wait_time.max(0.0),
            time_left: 0.0,
            running: false,
        }
    }

    /// Create a stopped timer lasting `frames` physics ticks at `ticks_per_second`
    pub fn from_frames(frames: f32, ticks_per_second: u32) -> Self {
        Self::new(frames / ticks_per_second as f32)
    }

    /// (Re)start the countdown from `wait_time`
    pub fn start(&mut self) {
        self.time_left = self.wait_time;
        self.running = true;
    }

    /// (Re)start the countdown with a different duration
    pub fn start_with(&mut self, wait_time: f32) {
        self.wait_time = wait_time.max(0.0);
        self.start();
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.time_left = 0.0;
    }

    pub fn is_stopped(&self) -> bool {
        !self.running
    }

    pub fn time_left(&self) -> f32 {
        self.time_left
    }

    pub fn wait_time(&self) -> f32 {
        self.wait_time
    }

    /// Advance by `delta`; returns true on the tick the timer runs out
    pub fn tick(&mut self, delta: f32) -> bool {
        if !self.running {
            return false;
        }

        self.time_left -= delta;
        if self.time_left <= 0.0 {
            self.stop();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_timer_is_stopped() {
        let mut timer = Timer::new(1.0);
        assert!(timer.is_stopped());
        assert!(!timer.tick(5.0));
    }

    #[test]
    fn test_times_out_once() {
        let mut timer = Timer::new(0.5);
        timer.start();

        assert!(!timer.tick(0.25));
        assert!(!timer.is_stopped());
        assert!(timer.tick(0.25));
        assert!(timer.is_stopped());
        assert!(!timer.tick(0.25));
    }

    #[test]
    fn test_restart_resets_countdown() {
        let mut timer = Timer::new(1.0);
        timer.start();
        timer.tick(0.75);
        timer.start();
        assert_relative_eq!(timer.time_left(), 1.0);
    }

    #[test]
    fn test_from_frames() {
        let timer = Timer::from_frames(25.0, 60);
        assert_relative_eq!(timer.wait_time(), 25.0 / 60.0);
    }

    #[test]
    fn test_stop() {
        let mut timer = Timer::new(1.0);
        timer.start_with(2.0);
        timer.stop();
        assert!(timer.is_stopped());
        assert_eq!(timer.time_left(), 0.0);
        assert_eq!(timer.wait_time(), 2.0);
    }
}
