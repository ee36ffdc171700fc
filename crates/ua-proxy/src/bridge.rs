// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Blocking calls over the asynchronous core.
//!
//! Every synchronous facade method funnels through [`SyncBridge::block_on`].
//! The future runs as a task on the client's runtime while the caller waits.
//! Waiting ends with one of:
//!
//! - the task's own result
//! - [`CancellationError::Interrupted`] when the bridge's token fires
//! - [`ExecutionError::Panicked`] with the panic message when the task panics
//! - [`ExecutionError::Unexpected`] when no cause can be extracted
//!
//! Blocking from inside a current-thread runtime would deadlock, so it is
//! refused with [`ExecutionError::RuntimeUnavailable`].

use std::future::Future;

use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{CancellationError, ExecutionError, ProxyError, ProxyResult};

/// Runs asynchronous operations to completion for blocking callers.
#[derive(Debug, Clone)]
pub struct SyncBridge {
    handle: Handle,
    cancel: CancellationToken,
}

impl SyncBridge {
    /// Creates a bridge that spawns onto `handle`.
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            cancel: CancellationToken::new(),
        }
    }

    /// Returns a bridge that is interrupted when `cancel` fires.
    pub fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        Self {
            handle: self.handle.clone(),
            cancel,
        }
    }

    /// Returns the runtime handle.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Returns the cancellation token.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Blocks the calling thread until `future` completes.
    ///
    /// Inside a current-thread runtime the call fails with
    /// [`ExecutionError::RuntimeUnavailable`]. This includes threads of that
    /// runtime's blocking pool (`spawn_blocking`), which tokio does not let us
    /// tell apart from the runtime thread itself. Callers there should await
    /// the async form, or build the context on a multi-thread runtime.
    pub fn block_on<T, F>(&self, operation: &'static str, future: F) -> ProxyResult<T>
    where
        T: Send + 'static,
        F: Future<Output = ProxyResult<T>> + Send + 'static,
    {
        if self.cancel.is_cancelled() {
            return Err(CancellationError::interrupted(operation).into());
        }

        let current = Handle::try_current().ok();
        if let Some(current) = &current {
            if matches!(current.runtime_flavor(), RuntimeFlavor::CurrentThread) {
                return Err(ExecutionError::runtime_unavailable(format!(
                    "{} cannot block inside a current-thread runtime; use the async variant",
                    operation
                ))
                .into());
            }
        }

        let wait = self.run(operation, future);
        match current {
            Some(current) => tokio::task::block_in_place(|| current.block_on(wait)),
            None => self.handle.block_on(wait),
        }
    }

    /// Awaits `future` as a task, with the same error translation as [`block_on`](Self::block_on).
    pub async fn run<T, F>(&self, operation: &'static str, future: F) -> ProxyResult<T>
    where
        T: Send + 'static,
        F: Future<Output = ProxyResult<T>> + Send + 'static,
    {
        if self.cancel.is_cancelled() {
            return Err(CancellationError::interrupted(operation).into());
        }

        let task = self.handle.spawn(future);
        let abort = task.abort_handle();

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                abort.abort();
                debug!(operation, "Blocking call interrupted");
                Err(CancellationError::interrupted(operation).into())
            }
            joined = task => match joined {
                Ok(result) => result,
                Err(e) => Err(join_failure(operation, e)),
            },
        }
    }
}

fn join_failure(operation: &str, error: JoinError) -> ProxyError {
    if error.is_cancelled() {
        return CancellationError::task_cancelled(operation).into();
    }

    match error.try_into_panic() {
        Ok(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned());
            match message {
                Some(message) => ExecutionError::panicked(operation, message).into(),
                None => ExecutionError::unexpected(format!("{} panicked", operation)).into(),
            }
        }
        Err(other) => ExecutionError::unexpected(other.to_string()).into(),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::status::StatusCode;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_block_on_inside_runtime() {
        let bridge = SyncBridge::new(Handle::current());
        let value = bridge.block_on("read", async { Ok(21 * 2) }).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_block_on_outside_runtime() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let bridge = SyncBridge::new(runtime.handle().clone());

        let value = bridge
            .block_on("read", async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Ok("opc.tcp://host:4840".to_string())
            })
            .unwrap();
        assert_eq!(value, "opc.tcp://host:4840");
    }

    #[test]
    fn test_errors_pass_through() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let bridge = SyncBridge::new(runtime.handle().clone());

        let err = bridge
            .block_on::<(), _>("write", async { Err(ProxyError::not_connected()) })
            .unwrap_err();
        assert!(matches!(err, ProxyError::Service(_)));
    }

    #[test]
    fn test_interrupted_wait() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let token = CancellationToken::new();
        let bridge = SyncBridge::new(runtime.handle().clone()).with_cancellation(token.clone());

        let canceller = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            token.cancel();
        });

        let err = bridge
            .block_on("read", async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            })
            .unwrap_err();
        canceller.join().unwrap();

        assert!(err.is_cancelled());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST_CANCELLED_BY_CLIENT);
    }

    #[test]
    fn test_cancelled_before_start() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let bridge = SyncBridge::new(runtime.handle().clone()).with_cancellation(token);

        let started = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&started);
        let err = bridge
            .block_on("read", async move {
                flag.store(true, Ordering::SeqCst);
                Ok(())
            })
            .unwrap_err();

        assert!(err.is_cancelled());
        assert!(!started.load(Ordering::SeqCst));
    }

    fn explode() -> ProxyResult<()> {
        panic!("codec exploded")
    }

    #[test]
    fn test_panic_is_translated() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let bridge = SyncBridge::new(runtime.handle().clone());

        let err = bridge
            .block_on("decode", async { explode() })
            .unwrap_err();
        match err {
            ProxyError::Execution(ExecutionError::Panicked { message, .. }) => {
                assert_eq!(message, "codec exploded");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_current_thread_runtime_is_refused() {
        let bridge = SyncBridge::new(Handle::current());
        let err = bridge.block_on("read", async { Ok(()) }).unwrap_err();
        assert!(matches!(
            err,
            ProxyError::Execution(ExecutionError::RuntimeUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_run_translates_cancellation() {
        let token = CancellationToken::new();
        let bridge = SyncBridge::new(Handle::current()).with_cancellation(token.clone());

        let pending = bridge.run("read", async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        });
        token.cancel();
        assert!(pending.await.unwrap_err().is_cancelled());
    }
}
