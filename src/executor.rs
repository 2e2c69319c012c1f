//! Batch executor
//!
//! Runs the per-item pipeline — resolve operation, compile request, dispatch,
//! classify — strictly in input order, one item at a time. The only
//! suspension point is the transport call; compilation and classification are
//! synchronous. Results always line up with inputs: `results[i]` corresponds
//! to `items[i]`, and a later item never starts before the previous one
//! finished (successfully or as a recorded failure).

use std::time::Duration;

use tracing::{debug, warn};

use crate::classifier;
use crate::compiler;
use crate::error::{ClientError, Result};
use crate::params::ParameterResolver;
use crate::transport::Transport;
use crate::types::{BatchItem, ExecutionResult, ItemOutcome, OperationKind};

/// Orchestrates a batch run against a transport collaborator.
#[derive(Debug, Clone)]
pub struct BatchExecutor {
    timeout: Duration,
    continue_on_failure: bool,
}

impl BatchExecutor {
    /// Create an executor.
    ///
    /// `timeout` bounds each item's transport call; `Duration::ZERO` means
    /// unbounded. With `continue_on_failure` set, a failing item becomes a
    /// Failure outcome and the run proceeds; otherwise the first failure
    /// aborts the whole run and no partial sequence is returned.
    pub fn new(timeout: Duration, continue_on_failure: bool) -> Self {
        Self {
            timeout,
            continue_on_failure,
        }
    }

    /// Process every item in order, returning one result per input item.
    pub async fn run<T>(&self, items: &[BatchItem], transport: &T) -> Result<Vec<ExecutionResult>>
    where
        T: Transport + ?Sized,
    {
        let mut results = Vec::with_capacity(items.len());

        for item in items {
            match self.process_item(item, transport).await {
                Ok(outcome) => results.push(ExecutionResult::new(item.index(), outcome)),
                Err(error) if self.continue_on_failure => {
                    warn!(index = item.index(), %error, "item failed, continuing batch");
                    results.push(ExecutionResult::new(
                        item.index(),
                        ItemOutcome::Failure {
                            message: error.to_string(),
                        },
                    ));
                }
                Err(error) => {
                    warn!(index = item.index(), %error, "item failed, aborting batch");
                    return Err(error);
                }
            }
        }

        Ok(results)
    }

    async fn process_item<T>(&self, item: &BatchItem, transport: &T) -> Result<ItemOutcome>
    where
        T: Transport + ?Sized,
    {
        let params = ParameterResolver::new(item);
        let operation = OperationKind::parse(params.require_str("operation")?)?;
        let request = compiler::compile(operation, item)?;
        let timeout = self.item_timeout(&params);

        debug!(
            index = item.index(),
            %operation,
            path = request.path,
            "dispatching compiled request"
        );

        let response = transport.dispatch(&request, timeout).await?;
        if !(200..300).contains(&response.status) {
            return Err(ClientError::Api {
                status: response.status,
                message: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        let result = classifier::classify(&response.headers, &response.body);
        Ok(ItemOutcome::Success { operation, result })
    }

    /// Effective timeout for one item: the item's own `timeout` parameter
    /// (milliseconds) when supplied, otherwise the executor default. Zero
    /// means unbounded either way.
    fn item_timeout(&self, params: &ParameterResolver<'_>) -> Option<Duration> {
        let timeout = match params.optional_i64("timeout") {
            Some(millis) if millis > 0 => Duration::from_millis(millis as u64),
            Some(_) => Duration::ZERO,
            None => self.timeout,
        };
        (!timeout.is_zero()).then_some(timeout)
    }
}
