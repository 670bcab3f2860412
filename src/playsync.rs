// Copyright (C) 2024 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// A cancel handle is held by both a scheduled task and whoever started it. Cancellation is
/// cooperative: the scheduler checks the handle before resuming the task and drops it without
/// running once it has been cancelled.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    /// Set to true once the underlying task should no longer run.
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Creates a new cancel handle.
    pub fn new() -> CancelHandle {
        CancelHandle {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns true if the task has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Cancels the task. Cancelling more than once is a no-op.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}
