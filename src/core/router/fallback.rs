//! Fallback execution
//!
//! Walks a routing decision's candidates in order, one attempt in flight at
//! a time. Transient failures are retried on the same candidate with
//! backoff; permanent and configuration failures advance immediately. Every
//! finished attempt is recorded before the next transition. Cancellation is
//! observed while a provider call or a backoff delay is pending; the
//! interrupted attempt is not recorded.

use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::execution::{BackoffPolicy, ExecutionState, RetryDecision, Sleeper, TokioSleeper};
use crate::core::analytics::{UsageRecord, UsageTracker};
use crate::core::providers::ProviderFactory;
use crate::core::types::{Attempt, FailureKind, Request, Response, RoutingDecision};
use crate::utils::error::{GatewayError, Result};

/// Turns a routing decision into a response or a terminal failure
#[derive(Debug, Clone)]
pub struct FallbackExecutor {
    factory: Arc<ProviderFactory>,
    tracker: UsageTracker,
    policy: BackoffPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl FallbackExecutor {
    pub fn new(factory: Arc<ProviderFactory>, tracker: UsageTracker, policy: BackoffPolicy) -> Self {
        Self {
            factory,
            tracker,
            policy,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replace the sleep implementation (builder pattern)
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Retry policy in use
    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// Execute without external cancellation
    pub async fn execute(&self, decision: &RoutingDecision, request: &Request) -> Result<Response> {
        self.execute_with_cancel(decision, request, &CancellationToken::new())
            .await
    }

    /// Execute, stopping with [`GatewayError::Cancelled`] once `cancel` fires
    pub async fn execute_with_cancel(
        &self,
        decision: &RoutingDecision,
        request: &Request,
        cancel: &CancellationToken,
    ) -> Result<Response> {
        let candidates = decision.candidates();
        let mut attempts: Vec<Attempt> = Vec::new();
        let mut state = ExecutionState::Pending { candidate: 0 };

        loop {
            state = match state {
                ExecutionState::Pending { candidate } => {
                    if cancel.is_cancelled() {
                        info!("Request cancelled after {} attempts", attempts.len());
                        return Err(GatewayError::Cancelled { attempts });
                    }
                    match candidates.get(candidate) {
                        None => ExecutionState::Exhausted,
                        Some(target) => match self.factory.create(&target.model_id).await {
                            Ok(provider) => ExecutionState::Attempting {
                                candidate,
                                attempt: 1,
                                provider,
                            },
                            Err(e) => {
                                warn!("Cannot create provider for {}: {}", target.model_id, e);
                                let attempt = Attempt::failure(
                                    &target.model_id,
                                    1,
                                    FailureKind::Configuration,
                                    e.to_string(),
                                    0,
                                );
                                self.tracker
                                    .record(
                                        UsageRecord::from_failed_attempt(&attempt)
                                            .for_request(request.request_id()),
                                    )
                                    .await;
                                attempts.push(attempt);
                                ExecutionState::Advancing { candidate }
                            }
                        },
                    }
                }

                ExecutionState::Attempting {
                    candidate,
                    attempt,
                    provider,
                } => {
                    let model_id = candidates[candidate].model_id.as_str();
                    let started = Instant::now();

                    let outcome = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            info!("Request cancelled during call to {}", model_id);
                            return Err(GatewayError::Cancelled { attempts });
                        }
                        outcome = provider.complete(request) => outcome,
                    };
                    let elapsed_ms = started.elapsed().as_millis() as u64;

                    match outcome {
                        Ok(completion) => {
                            let record = UsageRecord::success(
                                model_id,
                                completion.cost,
                                completion.latency_ms,
                                completion.tokens,
                            )
                            .for_request(request.request_id());
                            self.tracker.record(record).await;
                            attempts.push(Attempt::success(model_id, attempt, completion.latency_ms));

                            if candidate > 0 || attempt > 1 {
                                info!(
                                    "{} succeeded after {} failed attempts",
                                    model_id,
                                    attempts.len() - 1
                                );
                            }
                            ExecutionState::Succeeded(Response {
                                content: completion.content,
                                cost: completion.cost,
                                latency_ms: completion.latency_ms,
                                tokens: completion.tokens,
                                model_used: model_id.to_string(),
                                attempts: std::mem::take(&mut attempts),
                            })
                        }
                        Err(err) => {
                            let kind = err.kind();
                            let failed = Attempt::failure(
                                model_id,
                                attempt,
                                kind,
                                err.to_string(),
                                elapsed_ms,
                            );
                            self.tracker
                                .record(
                                    UsageRecord::from_failed_attempt(&failed)
                                        .for_request(request.request_id()),
                                )
                                .await;
                            attempts.push(failed);

                            match self.policy.after_failure(attempt, kind) {
                                RetryDecision::Retry(delay) => {
                                    debug!(
                                        "{} attempt {} failed ({}): {}; retrying in {:?}",
                                        model_id, attempt, kind, err, delay
                                    );
                                    ExecutionState::Retrying {
                                        candidate,
                                        attempt,
                                        delay,
                                        provider,
                                    }
                                }
                                RetryDecision::Advance => {
                                    warn!(
                                        "{} failed after {} attempt(s) ({}): {}",
                                        model_id, attempt, kind, err
                                    );
                                    ExecutionState::Advancing { candidate }
                                }
                            }
                        }
                    }
                }

                ExecutionState::Retrying {
                    candidate,
                    attempt,
                    delay,
                    provider,
                } => {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            info!("Request cancelled during backoff");
                            return Err(GatewayError::Cancelled { attempts });
                        }
                        _ = self.sleeper.sleep(delay) => {}
                    }
                    ExecutionState::Attempting {
                        candidate,
                        attempt: attempt + 1,
                        provider,
                    }
                }

                ExecutionState::Advancing { candidate } => {
                    if let Some(next) = candidates.get(candidate + 1) {
                        debug!("Falling back to {}", next.model_id);
                    }
                    ExecutionState::Pending {
                        candidate: candidate + 1,
                    }
                }

                ExecutionState::Succeeded(response) => return Ok(response),

                ExecutionState::Exhausted => {
                    warn!(
                        "All {} candidates failed after {} attempts",
                        candidates.len(),
                        attempts.len()
                    );
                    return Err(GatewayError::AllProvidersFailed { attempts });
                }
            };
        }
    }
}
