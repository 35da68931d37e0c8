// Single-slot transient notification.
// A new message pre-empts the current one and restarts the countdown.

use std::time::Duration;

use super::config::ToastConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastMessage {
    pub text: String,
    pub kind: ToastKind,
}

pub struct Toast {
    config: ToastConfig,
    current: Option<ToastMessage>,
    remaining: Duration,
}

impl Toast {
    pub fn new(config: ToastConfig) -> Self {
        Self {
            config,
            current: None,
            remaining: Duration::ZERO,
        }
    }

    pub fn show(&mut self, text: impl Into<String>, kind: ToastKind) {
        let text = text.into();
        log::debug!("toast ({kind:?}): {text}");
        self.current = Some(ToastMessage { text, kind });
        self.remaining = self.config.lifetime;
    }

    pub fn tick(&mut self, dt: Duration) {
        if self.current.is_none() {
            return;
        }
        self.remaining = self.remaining.saturating_sub(dt);
        if self.remaining.is_zero() {
            self.current = None;
        }
    }

    pub fn current(&self) -> Option<&ToastMessage> {
        self.current.as_ref()
    }

    /// 1.0 while shown, fading to 0 over the final `fade` window.
    pub fn opacity(&self) -> f32 {
        if self.current.is_none() {
            return 0.0;
        }
        if self.config.fade.is_zero() || self.remaining >= self.config.fade {
            1.0
        } else {
            self.remaining.as_secs_f32() / self.config.fade.as_secs_f32()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_dismisses_after_lifetime() {
        let mut toast = Toast::new(ToastConfig::default());
        toast.show("Saved", ToastKind::Success);
        toast.tick(Duration::from_millis(3199));
        assert_eq!(toast.current().map(|m| m.text.as_str()), Some("Saved"));
        toast.tick(Duration::from_millis(1));
        assert!(toast.current().is_none());
        assert_eq!(toast.opacity(), 0.0);
    }

    #[test]
    fn new_message_restarts_countdown() {
        let mut toast = Toast::new(ToastConfig::default());
        toast.show("first", ToastKind::Success);
        toast.tick(Duration::from_millis(3000));
        toast.show("second", ToastKind::Error);
        toast.tick(Duration::from_millis(3000));

        let current = toast.current().unwrap();
        assert_eq!(current.text, "second");
        assert_eq!(current.kind, ToastKind::Error);
        toast.tick(Duration::from_millis(200));
        assert!(toast.current().is_none());
    }

    #[test]
    fn fades_at_the_end() {
        let mut toast = Toast::new(ToastConfig::default());
        toast.show("fading", ToastKind::Success);
        assert_eq!(toast.opacity(), 1.0);
        toast.tick(Duration::from_millis(3075));
        let opacity = toast.opacity();
        assert!(opacity > 0.45 && opacity < 0.55, "{opacity}");
    }
}
