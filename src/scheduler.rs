// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
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

//! Cooperative per-tick tasks.
//!
//! A task is a piece of state plus a cancel handle. Each time the scheduler is polled, every
//! live task is resumed once: the caller's predicate decides whether it keeps waiting. Tasks
//! that stop waiting are handed back to the caller to run their completion.

use crate::playsync::CancelHandle;

struct Task<T> {
    cancel_handle: CancelHandle,
    state: T,
}

pub struct Scheduler<T> {
    tasks: Vec<Task<T>>,
}

impl<T> Scheduler<T> {
    pub fn new() -> Scheduler<T> {
        Scheduler { tasks: Vec::new() }
    }

    /// Schedules a task. It is first resumed on the next poll.
    pub fn spawn(&mut self, state: T) -> CancelHandle {
        let cancel_handle = CancelHandle::new();
        self.tasks.push(Task {
            cancel_handle: cancel_handle.clone(),
            state,
        });
        cancel_handle
    }

    /// Resumes every task once. `pending` returns true if the task should keep waiting.
    ///
    /// Cancelled tasks are dropped without being resumed. Finished tasks are removed and
    /// returned in the order they were spawned.
    pub fn poll<F>(&mut self, mut pending: F) -> Vec<T>
    where
        F: FnMut(&T) -> bool,
    {
        let mut finished = Vec::new();
        let mut waiting = Vec::with_capacity(self.tasks.len());

        for task in self.tasks.drain(..) {
            if task.cancel_handle.is_cancelled() {
                continue;
            }
            if pending(&task.state) {
                waiting.push(task);
            } else {
                finished.push(task.state);
            }
        }

        self.tasks = waiting;
        finished
    }

    /// The number of tasks that have not finished. Cancelled tasks count until the next poll.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Scheduler<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("tasks", &self.tasks.len())
            .finish()
    }
}
