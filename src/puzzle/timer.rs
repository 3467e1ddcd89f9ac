//! Per-second countdown for timed puzzle rounds

/// Time limit in seconds for a difficulty; `None` means untimed
pub fn time_limit(difficulty: u8) -> Option<u32> {
    match difficulty {
        2 => Some(60),
        3 => Some(40),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Seconds left after this tick
    Tick(u32),
    /// Reached zero; the countdown has halted
    TimeUp,
}

/// A countdown driven by elapsed time
#[derive(Debug, Clone, Default)]
pub struct Countdown {
    left: u32,
    carry_ms: f64,
    running: bool,
}

impl Countdown {
    /// Start from `seconds`, emitting the initial tick
    pub fn start(&mut self, seconds: u32) -> TimerEvent {
        self.left = seconds;
        self.carry_ms = 0.0;
        self.running = seconds > 0;
        TimerEvent::Tick(seconds)
    }

    /// Idempotent
    pub fn stop(&mut self) {
        self.running = false;
        self.carry_ms = 0.0;
    }

    pub fn tick(&mut self, elapsed_ms: f64) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        if !self.running {
            return events;
        }

        self.carry_ms += elapsed_ms.max(0.0);
        while self.running && self.carry_ms >= 1000.0 {
            self.carry_ms -= 1000.0;
            self.left = self.left.saturating_sub(1);
            events.push(TimerEvent::Tick(self.left));
            if self.left == 0 {
                self.stop();
                events.push(TimerEvent::TimeUp);
            }
        }
        events
    }

    pub fn left(&self) -> u32 {
        self.left
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
