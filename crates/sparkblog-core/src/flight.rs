//! Per-operation single-flight guard.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Operation, SessionError};

/// Whether an operation currently has a call outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpState {
    #[default]
    Idle,
    InFlight,
}

/// Admits at most one in-flight call of one operation.
#[derive(Debug)]
pub(crate) struct SingleFlight {
    operation: Operation,
    busy: AtomicBool,
}

impl SingleFlight {
    pub(crate) fn new(operation: Operation) -> Self {
        Self {
            operation,
            busy: AtomicBool::new(false),
        }
    }

    /// Enter the operation, or fail with `Busy` if a call is already running.
    /// The slot is released when the returned guard drops.
    pub(crate) fn begin(&self) -> Result<FlightGuard<'_>, SessionError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SessionError::Busy(self.operation))?;
        Ok(FlightGuard { flight: self })
    }

    pub(crate) fn state(&self) -> OpState {
        if self.busy.load(Ordering::Acquire) {
            OpState::InFlight
        } else {
            OpState::Idle
        }
    }
}

pub(crate) struct FlightGuard<'a> {
    flight: &'a SingleFlight,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flight.busy.store(false, Ordering::Release);
    }
}
