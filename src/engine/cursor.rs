// Custom cursor: a dot pinned to the pointer and a ring trailing it with
// per-frame easing.

use glam::Vec2;

use super::config::CursorConfig;

pub struct CursorFollower {
    config: CursorConfig,
    /// Last pointer position seen; the ring keeps easing toward it.
    target: Vec2,
    ring: Vec2,
    visible: bool,
}

impl CursorFollower {
    pub fn new(config: CursorConfig) -> Self {
        Self {
            config,
            target: Vec2::ZERO,
            ring: Vec2::ZERO,
            visible: false,
        }
    }

    /// One frame of easing. The ring starts at the window origin and is
    /// hidden, along with the dot, while the pointer is absent.
    pub fn update(&mut self, pointer: Option<Vec2>) {
        match pointer {
            Some(target) => {
                self.target = target;
                self.visible = true;
            }
            None => self.visible = false,
        }
        self.ring += (self.target - self.ring) * self.config.easing;
    }

    /// Ring centre, `None` while hidden.
    pub fn position(&self) -> Option<Vec2> {
        self.visible.then_some(self.ring)
    }

    /// Dot centre: exactly the pointer.
    pub fn dot(&self) -> Option<Vec2> {
        self.visible.then_some(self.target)
    }

    pub fn ring_radius(&self) -> f32 {
        self.config.ring_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_eases_from_origin_toward_pointer() {
        let mut follower = CursorFollower::new(CursorConfig::default());
        assert_eq!(follower.position(), None);

        follower.update(Some(Vec2::new(100.0, 50.0)));
        let p = follower.position().unwrap();
        assert!((p.x - 12.0).abs() < 1e-4);
        assert!((p.y - 6.0).abs() < 1e-4);

        for _ in 0..200 {
            follower.update(Some(Vec2::new(100.0, 50.0)));
        }
        assert!(follower.position().unwrap().distance(Vec2::new(100.0, 50.0)) < 0.01);
    }

    #[test]
    fn dot_sits_on_pointer() {
        let mut follower = CursorFollower::new(CursorConfig::default());
        follower.update(Some(Vec2::new(40.0, 30.0)));
        assert_eq!(follower.dot(), Some(Vec2::new(40.0, 30.0)));
        assert_ne!(follower.position(), follower.dot());
    }

    #[test]
    fn hides_when_pointer_leaves_and_resumes_from_last_ring() {
        let mut follower = CursorFollower::new(CursorConfig::default());
        follower.update(Some(Vec2::new(50.0, 0.0)));
        follower.update(None);
        assert_eq!(follower.position(), None);
        assert_eq!(follower.dot(), None);

        follower.update(Some(Vec2::new(50.0, 0.0)));
        let x = follower.position().unwrap().x;
        assert!(x > 6.0 && x < 50.0);
    }
}
