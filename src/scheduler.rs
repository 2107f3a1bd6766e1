use std::time::Duration;

/// Most ticks a single poll will hand out. Time beyond that is dropped so a
/// stalled window does not come back to a burst of catch-up frames.
pub const MAX_TICKS_PER_POLL: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
}

/// Fixed-rate tick source, fed with the wall time that actually passed.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    state: SchedulerState,
    period: Duration,
    accumulated: Duration,
}

impl FrameScheduler {
    /// Starts out idle.
    pub fn new(tick_rate: u32) -> Self {
        Self {
            state: SchedulerState::Idle,
            period: period_for(tick_rate),
            accumulated: Duration::ZERO,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn start(&mut self) {
        if self.state == SchedulerState::Idle {
            self.state = SchedulerState::Running;
            self.accumulated = Duration::ZERO;
            tracing::debug!(period = ?self.period, "frame scheduler started");
        }
    }

    pub fn stop(&mut self) {
        if self.state == SchedulerState::Running {
            self.state = SchedulerState::Idle;
            self.accumulated = Duration::ZERO;
            tracing::debug!("frame scheduler stopped");
        }
    }

    pub fn toggle(&mut self) {
        match self.state {
            SchedulerState::Idle => self.start(),
            SchedulerState::Running => self.stop(),
        }
    }

    pub fn set_tick_rate(&mut self, tick_rate: u32) {
        self.period = period_for(tick_rate);
    }

    /// Number of ticks that fell due during `elapsed`. Always 0 when idle.
    pub fn due_ticks(&mut self, elapsed: Duration) -> u32 {
        // 停止中は何も進めない / Nothing runs while idle
        if self.state == SchedulerState::Idle {
            return 0;
        }

        // 経過時間を貯めて、周期いくつ分になったかを数える
        // Bank the elapsed time and count how many whole periods it covers.
        self.accumulated += elapsed;
        let period = self.period.as_nanos().max(1);
        let due = self.accumulated.as_nanos() / period;

        // 遅れすぎたら追いつこうとせず切り捨てる / Too far behind: drop the backlog instead of catching up
        if due > MAX_TICKS_PER_POLL as u128 {
            tracing::debug!(due = due as u64, "frame scheduler fell behind, dropping ticks");
            self.accumulated = Duration::ZERO;
            return MAX_TICKS_PER_POLL;
        }
        // 端数は次回へ持ち越す / The remainder carries over to the next poll
        self.accumulated -= self.period * due as u32;
        due as u32
    }
}

fn period_for(tick_rate: u32) -> Duration {
    Duration::from_secs_f64(1.0 / tick_rate.max(1) as f64)
}
