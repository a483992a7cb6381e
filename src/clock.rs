//! Frame timing: the per-frame delta source and the frame-rate cap.

use std::time::{Duration, Instant};

/// Hands out the time since the previous tick. Tick it every frame, paused or
/// not, so paused wall time never reaches the model after a resume.
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
    max_dt: f32,
    frames: u64,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self::starting_at(Instant::now(), max_dt)
    }

    pub fn starting_at(now: Instant, max_dt: f32) -> Self {
        Self {
            last: now,
            max_dt,
            frames: 0,
        }
    }

    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Seconds since the last tick, capped at `max_dt`.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let dt = now.saturating_duration_since(self.last).as_secs_f32();
        self.last = now;
        self.frames += 1;
        dt.min(self.max_dt)
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Caps the frame rate by sleeping out the rest of each frame.
#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    frame: Duration,
}

impl FramePacer {
    pub fn new(fps: u32) -> Self {
        let fps = fps.clamp(1, 240);
        Self {
            frame: Duration::from_secs_f32(1.0 / fps as f32),
        }
    }

    pub fn frame(&self) -> Duration {
        self.frame
    }

    /// Block until one frame has passed since `frame_start`.
    pub fn wait(&self, frame_start: Instant) {
        let end = frame_start + self.frame;
        loop {
            let t = Instant::now();
            if t >= end {
                break;
            }
            let left = end - t;
            if left > Duration::from_millis(2) {
                std::thread::sleep(Duration::from_millis(1));
            } else {
                std::hint::spin_loop();
            }
        }
    }
}

/// Smoothed frames-per-second readout for the HUD.
#[derive(Debug, Default)]
pub struct FpsMeter {
    fps: f32,
}

impl FpsMeter {
    pub fn record(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let inst = 1.0 / dt;
        self.fps = if self.fps == 0.0 { inst } else { self.fps * 0.9 + inst * 0.1 };
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}
