//! Fan-out/fan-in over spawned tasks.
//!
//! Every stage of the audit spawns one task per input, lets each task hand
//! exactly one result to a channel whose capacity equals the number of
//! producers, waits for all tasks at a barrier, and only then drains the
//! channel. Results are tagged with their input index so they land in the
//! slot of the input that produced them regardless of completion order.

use futures::future::join_all;
use std::future::Future;
use tokio::sync::mpsc;
use tracing::{debug, error};

/// Runs `task` on every input concurrently and collects one result per input.
///
/// The returned vector has the same length and order as `inputs`. A slot is
/// `None` only if its task panicked before reporting; callers turn that into
/// an error value so the caller-visible count never changes. Catching the
/// panic relies on unwinding, so the workspace profiles keep `panic = "unwind"`.
pub(crate) async fn fan_out<I, T, F, Fut>(inputs: Vec<I>, task: F) -> Vec<Option<T>>
where
    F: Fn(I) -> Fut,
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let producers = inputs.len();
    // Sized to the producer count so no send ever waits on the receiver.
    let (tx, mut rx) = mpsc::channel::<(usize, T)>(producers.max(1));

    let handles: Vec<_> = inputs
        .into_iter()
        .enumerate()
        .map(|(index, input)| {
            let tx = tx.clone();
            let work = task(input);
            tokio::spawn(async move {
                let output = work.await;
                if tx.send((index, output)).await.is_err() {
                    debug!(index, "Fan-in receiver dropped before result was delivered");
                }
            })
        })
        .collect();
    drop(tx);

    for joined in join_all(handles).await {
        if let Err(e) = joined {
            error!(error = %e, "Fan-out task did not complete");
        }
    }

    let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(producers).collect();
    while let Ok((index, output)) = rx.try_recv() {
        slots[index] = Some(output);
    }
    slots
}
