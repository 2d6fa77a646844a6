//! Guided step-by-step playback.
//!
//! [`Playback`] is a plain state machine: navigation and timer changes are
//! events fed in by the caller, and the one-second countdown is driven by
//! explicit [`PlaybackEvent::Tick`] events. [`PlaybackClock`] is the async
//! driver that produces those ticks only while the machine wants them.

mod clock;

pub use clock::{PlaybackClock, Ticker};

use crate::error::PlaybackError;
use crate::types::Step;

/// Countdown state for the step being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running { remaining_secs: i64 },
    Expired { remaining_secs: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Guided view not shown.
    Idle,
    Showing { index: usize, timer: TimerState },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    Open,
    Next,
    Previous,
    StartTimer,
    Tick,
    StopTimer,
    Close,
}

#[derive(Debug, Clone)]
pub struct Playback {
    steps: Vec<Step>,
    state: PlaybackState,
    /// Bumped every time a countdown starts, so a clock driver can tell a
    /// fresh countdown from the one it was already ticking.
    timer_epoch: u64,
}

impl Playback {
    /// Fails for an empty sequence; every other operation is total.
    pub fn new(steps: Vec<Step>) -> Result<Self, PlaybackError> {
        if steps.is_empty() {
            return Err(PlaybackError::EmptyRecipe);
        }
        Ok(Self {
            steps,
            state: PlaybackState::Idle,
            timer_epoch: 0,
        })
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            PlaybackState::Showing { index, .. } => Some(index),
            PlaybackState::Idle => None,
        }
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.current_index().map(|index| &self.steps[index])
    }

    pub fn timer(&self) -> TimerState {
        match self.state {
            PlaybackState::Showing { timer, .. } => timer,
            PlaybackState::Idle => TimerState::Idle,
        }
    }

    /// True while a countdown is running and needs ticks.
    pub fn wants_clock(&self) -> bool {
        matches!(self.timer(), TimerState::Running { .. })
    }

    pub fn timer_epoch(&self) -> u64 {
        self.timer_epoch
    }

    /// Apply one event. Returns whether the state changed.
    ///
    /// Events that make no sense in the current state (navigating past
    /// either end, starting a timer on an untimed step, ticking with no
    /// countdown running) are ignored.
    pub fn handle(&mut self, event: PlaybackEvent) -> bool {
        let before = self.state;
        self.state = match (self.state, event) {
            (_, PlaybackEvent::Open) => PlaybackState::Showing {
                index: 0,
                timer: TimerState::Idle,
            },
            (_, PlaybackEvent::Close) => PlaybackState::Idle,
            (PlaybackState::Idle, _) => PlaybackState::Idle,

            (PlaybackState::Showing { index, timer }, PlaybackEvent::Next) => {
                self.moved_to((index + 1).min(self.steps.len() - 1), index, timer)
            }
            (PlaybackState::Showing { index, timer }, PlaybackEvent::Previous) => {
                self.moved_to(index.saturating_sub(1), index, timer)
            }

            (PlaybackState::Showing { index, timer }, PlaybackEvent::StartTimer) => {
                let timer = match (timer, self.steps[index].body.duration_secs()) {
                    (TimerState::Idle, Some(duration)) => {
                        self.timer_epoch += 1;
                        let remaining_secs = i64::from(duration);
                        if remaining_secs <= 0 {
                            TimerState::Expired { remaining_secs }
                        } else {
                            TimerState::Running { remaining_secs }
                        }
                    }
                    (timer, _) => timer,
                };
                PlaybackState::Showing { index, timer }
            }

            (PlaybackState::Showing { index, timer }, PlaybackEvent::Tick) => {
                let timer = match timer {
                    TimerState::Running { remaining_secs } => {
                        let remaining_secs = remaining_secs - 1;
                        if remaining_secs <= 0 {
                            TimerState::Expired { remaining_secs }
                        } else {
                            TimerState::Running { remaining_secs }
                        }
                    }
                    other => other,
                };
                PlaybackState::Showing { index, timer }
            }

            (PlaybackState::Showing { index, .. }, PlaybackEvent::StopTimer) => {
                PlaybackState::Showing {
                    index,
                    timer: TimerState::Idle,
                }
            }
        };

        let changed = before != self.state;
        if changed && event != PlaybackEvent::Tick {
            tracing::debug!(?event, state = ?self.state, "playback transition");
        }
        changed
    }

    fn moved_to(&self, target: usize, index: usize, timer: TimerState) -> PlaybackState {
        if target == index {
            PlaybackState::Showing { index, timer }
        } else {
            PlaybackState::Showing {
                index: target,
                timer: TimerState::Idle,
            }
        }
    }

    pub fn open(&mut self) -> bool {
        self.handle(PlaybackEvent::Open)
    }

    pub fn next(&mut self) -> bool {
        self.handle(PlaybackEvent::Next)
    }

    pub fn previous(&mut self) -> bool {
        self.handle(PlaybackEvent::Previous)
    }

    pub fn start_timer(&mut self) -> bool {
        self.handle(PlaybackEvent::StartTimer)
    }

    pub fn tick(&mut self) -> bool {
        self.handle(PlaybackEvent::Tick)
    }

    pub fn stop_timer(&mut self) -> bool {
        self.handle(PlaybackEvent::StopTimer)
    }

    pub fn close(&mut self) -> bool {
        self.handle(PlaybackEvent::Close)
    }
}
