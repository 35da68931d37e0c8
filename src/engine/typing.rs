//! Type-then-delete text animation cycling through a fixed phrase list.
//!
//! The state machine is a pure transition table over [`TypingState`]; the
//! [`TypingSequencer`] only converts elapsed frame time into steps.
//!
//! ```text
//!  Typing --(count == len, dwell 2000ms)--> Deleting
//!  Deleting --(count == 0, next phrase, dwell 380ms)--> Typing
//! ```

use std::time::Duration;

use super::config::TypingConfig;

/// Zero-length delays would make `tick` spin.
const MIN_STEP: Duration = Duration::from_millis(1);
const CARET_HALF_PERIOD_MS: u128 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingPhase {
    Typing,
    Deleting,
}

/// Which pause follows a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDelay {
    Type,
    Delete,
    /// Full phrase shown; long dwell before deleting.
    DwellFull,
    /// Phrase erased; short dwell before typing the next one.
    DwellEmpty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingState {
    pub phase: TypingPhase,
    /// Index into the phrase list.
    pub index: usize,
    /// Characters of the current phrase currently shown.
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub state: TypingState,
    pub delay: StepDelay,
}

impl Default for TypingState {
    fn default() -> Self {
        Self {
            phase: TypingPhase::Typing,
            index: 0,
            count: 0,
        }
    }
}

impl TypingState {
    /// Advance one character and pick the pause before the next step.
    pub fn step<S: AsRef<str>>(self, phrases: &[S]) -> Transition {
        let Some(phrase) = phrases.get(self.index) else {
            return Transition {
                state: Self::default(),
                delay: StepDelay::DwellEmpty,
            };
        };
        let len = phrase.as_ref().chars().count();

        match self.phase {
            TypingPhase::Typing => {
                let count = (self.count + 1).min(len);
                if count == len {
                    Transition {
                        state: Self {
                            phase: TypingPhase::Deleting,
                            count,
                            ..self
                        },
                        delay: StepDelay::DwellFull,
                    }
                } else {
                    Transition {
                        state: Self { count, ..self },
                        delay: StepDelay::Type,
                    }
                }
            }
            TypingPhase::Deleting => {
                let count = self.count.min(len).saturating_sub(1);
                if count == 0 {
                    Transition {
                        state: Self {
                            phase: TypingPhase::Typing,
                            index: (self.index + 1) % phrases.len(),
                            count: 0,
                        },
                        delay: StepDelay::DwellEmpty,
                    }
                } else {
                    Transition {
                        state: Self { count, ..self },
                        delay: StepDelay::Delete,
                    }
                }
            }
        }
    }

    /// The first `count` characters of the current phrase.
    pub fn visible<'a, S: AsRef<str>>(&self, phrases: &'a [S]) -> &'a str {
        let Some(phrase) = phrases.get(self.index).map(|p| p.as_ref()) else {
            return "";
        };
        let end = phrase
            .char_indices()
            .nth(self.count)
            .map_or(phrase.len(), |(i, _)| i);
        &phrase[..end]
    }
}

impl StepDelay {
    pub fn duration(self, config: &TypingConfig) -> Duration {
        match self {
            StepDelay::Type => config.type_delay,
            StepDelay::Delete => config.delete_delay,
            StepDelay::DwellFull => config.full_dwell,
            StepDelay::DwellEmpty => config.empty_dwell,
        }
    }
}

/// Drives [`TypingState`] from frame deltas.
pub struct TypingSequencer {
    config: TypingConfig,
    state: TypingState,
    until_next: Duration,
    caret_clock: Duration,
    running: bool,
}

impl TypingSequencer {
    /// An empty phrase list yields a sequencer that never runs.
    pub fn new(config: TypingConfig) -> Self {
        let running = !config.phrases.is_empty();
        if !running {
            log::debug!("typing sequencer disabled: no phrases");
        }
        Self {
            until_next: config.start_delay.max(MIN_STEP),
            config,
            state: TypingState::default(),
            caret_clock: Duration::ZERO,
            running,
        }
    }

    /// Consume `dt` of elapsed time, firing every step it covers.
    /// Returns the number of steps fired.
    pub fn tick(&mut self, dt: Duration) -> usize {
        if !self.running {
            return 0;
        }
        self.caret_clock += dt;

        let mut budget = dt;
        let mut steps = 0;
        while budget >= self.until_next {
            budget -= self.until_next;
            let transition = self.state.step(&self.config.phrases);
            self.state = transition.state;
            self.until_next = transition.delay.duration(&self.config).max(MIN_STEP);
            steps += 1;
        }
        self.until_next -= budget;
        steps
    }

    pub fn text(&self) -> &str {
        self.state.visible(&self.config.phrases)
    }

    pub fn caret_visible(&self) -> bool {
        (self.caret_clock.as_millis() / CARET_HALF_PERIOD_MS) % 2 == 0
    }

    pub fn start(&mut self) {
        self.running = !self.config.phrases.is_empty();
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
