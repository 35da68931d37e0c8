// Loading screen shown for a fixed time after startup.

use std::time::Duration;

use super::config::SplashConfig;

pub struct Splash {
    config: SplashConfig,
    elapsed: Duration,
}

impl Splash {
    pub fn new(config: SplashConfig) -> Self {
        Self {
            config,
            elapsed: Duration::ZERO,
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt).min(self.config.duration);
    }

    pub fn is_visible(&self) -> bool {
        self.elapsed < self.config.duration
    }

    pub fn opacity(&self) -> f32 {
        let remaining = self.config.duration.saturating_sub(self.elapsed);
        if self.config.fade.is_zero() || remaining >= self.config.fade {
            if self.is_visible() { 1.0 } else { 0.0 }
        } else {
            remaining.as_secs_f32() / self.config.fade.as_secs_f32()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hides_after_duration() {
        let mut splash = Splash::new(SplashConfig::default());
        assert!(splash.is_visible());
        assert_eq!(splash.opacity(), 1.0);
        splash.tick(Duration::from_millis(2050));
        assert!(splash.is_visible());
        assert!((splash.opacity() - 0.5).abs() < 1e-3);
        splash.tick(Duration::from_millis(150));
        assert!(!splash.is_visible());
        assert_eq!(splash.opacity(), 0.0);
    }
}
