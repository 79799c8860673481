use super::{decompose_with_cancellation, DecompositionError, DecompositionParameters, Stage};
use crate::mask::OpacityMask;
use crate::shape::ConvexPolygon;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

/// A flag shared between a running decomposition and the code that may cancel it.
///
/// The decomposition checks the flag before each of its stages.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// A token that is not cancelled yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the cancellation of every decomposition observing this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Has [`Self::cancel`] been called on this token or one of its clones?
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub(crate) fn check(&self, next_stage: Stage) -> Result<(), DecompositionError> {
        if self.is_cancelled() {
            log::debug!("decomposition cancelled before the {next_stage} stage");
            Err(DecompositionError::Cancelled(next_stage))
        } else {
            Ok(())
        }
    }
}

/// A decomposition running on its own thread.
pub struct DecompositionTask {
    token: CancellationToken,
    handle: JoinHandle<Result<Vec<ConvexPolygon>, DecompositionError>>,
}

impl DecompositionTask {
    /// Starts decomposing `mask` in the background.
    pub fn spawn<M>(mask: M, params: DecompositionParameters) -> Self
    where
        M: OpacityMask + Send + 'static,
    {
        let token = CancellationToken::new();
        let task_token = token.clone();
        let handle =
            std::thread::spawn(move || decompose_with_cancellation(&mask, &params, &task_token));

        Self { token, handle }
    }

    /// A token cancelling this task.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Requests the task to stop at its next stage boundary.
    ///
    /// A stage already running is not interrupted.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Has the task completed, successfully or not?
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the task and returns its result.
    ///
    /// A panic of the task is propagated to the caller.
    pub fn join(self) -> Result<Vec<ConvexPolygon>, DecompositionError> {
        match self.handle.join() {
            Ok(result) => result,
            Err(payload) => std::panic::resume_unwind(payload),
        }
    }
}

/// Decomposes every mask of `masks` in parallel.
///
/// Each mask is an independent decomposition; the results are in the same order as the
/// masks.
#[cfg(feature = "parallel")]
pub fn decompose_batch<M>(
    masks: &[M],
    params: &DecompositionParameters,
) -> Vec<Result<Vec<ConvexPolygon>, DecompositionError>>
where
    M: OpacityMask + Sync,
{
    use rayon::prelude::*;

    masks
        .par_iter()
        .map(|mask| super::decompose(mask, params))
        .collect()
}
