//! Fixed-rate sampling loop: sensors → joystick report → emitter.
//!
//! A failed sample never ends the loop. The cycle sends a neutral report
//! instead, logs the fault and waits for the next tick as usual. The loop
//! touches the GATT tree only through [`GattApplication::send_report`].

use core::sync::atomic::{AtomicBool, Ordering};

use crate::gatt::{GattApplication, ReportSink};
use crate::hid::JoystickReport;
use crate::sensors::AxisSource;

/// Waits for the next sampling slot.
#[allow(async_fn_in_trait)]
pub trait Pacer {
    async fn tick(&mut self);
}

/// Cooperative stop request, checked once per cycle.
#[derive(Debug, Default)]
pub struct CancelToken(AtomicBool);

impl CancelToken {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SamplingStats {
    /// Cycles completed.
    pub cycles: u32,
    /// Cycles whose sample failed and were replaced by a neutral report.
    pub faults: u32,
    /// Reports handed to the sink.
    pub reports_sent: u32,
}

pub struct Sampler<'a, S, K: ?Sized> {
    app: &'a GattApplication,
    source: S,
    sink: &'a K,
    stats: SamplingStats,
}

impl<'a, S: AxisSource, K: ReportSink + ?Sized> Sampler<'a, S, K> {
    pub fn new(app: &'a GattApplication, source: S, sink: &'a K) -> Self {
        Self {
            app,
            source,
            sink,
            stats: SamplingStats::default(),
        }
    }

    /// One cycle without waiting. Returns the report that was offered.
    pub async fn step(&mut self) -> JoystickReport {
        let report = match self.source.read_axes().await {
            Ok(axes) => JoystickReport::new(axes, false),
            Err(e) => {
                warn!("sensor read failed: {}", e);
                self.stats.faults = self.stats.faults.wrapping_add(1);
                JoystickReport::neutral()
            }
        };

        if self.app.send_report(&report, self.sink) {
            self.stats.reports_sent = self.stats.reports_sent.wrapping_add(1);
        }
        self.stats.cycles = self.stats.cycles.wrapping_add(1);
        report
    }

    /// Sample every tick of `pacer` until `cancel` fires.
    pub async fn run<P: Pacer>(&mut self, pacer: &mut P, cancel: &CancelToken) -> SamplingStats {
        info!("sampling loop started");
        while !cancel.is_cancelled() {
            self.step().await;
            pacer.tick().await;
        }
        info!("sampling loop stopped after {} cycles", self.stats.cycles);
        self.stats
    }

    pub fn stats(&self) -> SamplingStats {
        self.stats
    }

    pub fn into_source(self) -> S {
        self.source
    }
}
