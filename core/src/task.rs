/*
 * task.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of flattr-rs.
 *
 * flattr-rs is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * flattr-rs is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with flattr-rs.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Background execution: run a request on the tokio runtime and hand the
//! result to a callback.
//!
//! Each spawned request is independent; there is no queue and no limit on
//! how many run at once. Cancelling a task aborts it at its next await
//! point, and a cancelled task never calls its callback.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::debug;

use crate::error::{FlattrError, Result};
use crate::request::FlattrRequest;
use crate::service::FlattrService;

/// Completion callback for a spawned request.
pub type OnComplete<T> = Box<dyn FnOnce(Result<T>) + Send + 'static>;

/// Handle to one spawned request.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    abort: AbortHandle,
    cancelled: Arc<AtomicBool>,
}

impl TaskHandle {
    /// Stop the request. Its callback will not be called.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.abort.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// The task ran to completion or was aborted.
    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

/// Spawns requests on a given runtime.
#[derive(Debug, Clone)]
pub struct TaskRunner {
    runtime: Handle,
}

impl TaskRunner {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Runner for the runtime the caller is running on.
    pub fn current() -> Result<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| FlattrError::InvalidRequest(format!("no tokio runtime: {}", e)))
    }

    pub fn spawn<R>(
        &self,
        service: Arc<FlattrService>,
        request: R,
        on_complete: impl FnOnce(Result<R::Output>) + Send + 'static,
    ) -> TaskHandle
    where
        R: FlattrRequest + 'static,
    {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();
        let on_complete: OnComplete<R::Output> = Box::new(on_complete);
        let join = self.runtime.spawn(async move {
            let result = request.execute(&service).await;
            if flag.load(Ordering::SeqCst) {
                debug!("task cancelled, result dropped");
                return;
            }
            on_complete(result);
        });
        TaskHandle {
            abort: join.abort_handle(),
            cancelled,
        }
    }
}

/// Spawn on the current runtime. Fails when called outside one.
pub fn spawn<R>(
    service: Arc<FlattrService>,
    request: R,
    on_complete: impl FnOnce(Result<R::Output>) + Send + 'static,
) -> Result<TaskHandle>
where
    R: FlattrRequest + 'static,
{
    Ok(TaskRunner::current()?.spawn(service, request, on_complete))
}
