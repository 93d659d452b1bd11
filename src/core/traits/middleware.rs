//! Middleware chain
//!
//! Each stage may rewrite or reject the request before routing and the
//! response after execution. Stages run in registration order on the way in
//! and in reverse order on the way out.

use std::sync::Arc;
use tracing::{debug, info};

use crate::core::types::{Request, Response};
use crate::utils::error::{GatewayError, Result};
use crate::utils::truncate_string;

/// Longest prompt accepted by [`ValidationMiddleware`]
pub const MAX_PROMPT_CHARS: usize = 20_000;

const PREVIEW_CHARS: usize = 100;

/// One stage of the chain
///
/// Both hooks default to passing the value through unchanged.
pub trait Middleware: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Transform or reject the request before routing
    fn process_request(&self, request: Request) -> Result<Request> {
        Ok(request)
    }

    /// Transform or reject the response before it reaches the caller
    fn process_response(&self, response: Response) -> Result<Response> {
        Ok(response)
    }
}

/// Ordered middleware stages
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    stages: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage (builder pattern)
    pub fn with<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.push(Arc::new(middleware));
        self
    }

    /// Append a shared stage
    pub fn push(&mut self, middleware: Arc<dyn Middleware>) {
        self.stages.push(middleware);
    }

    /// Number of stages
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// True when the chain has no stages
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage on the request, first registered first
    pub fn process_request(&self, request: Request) -> Result<Request> {
        self.stages
            .iter()
            .try_fold(request, |request, stage| stage.process_request(request))
    }

    /// Run every stage on the response, last registered first
    pub fn process_response(&self, response: Response) -> Result<Response> {
        self.stages
            .iter()
            .rev()
            .try_fold(response, |response, stage| stage.process_response(response))
    }
}

impl std::fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.stages.iter().map(|stage| stage.name()))
            .finish()
    }
}

/// Logs a preview of each request and a summary of each response
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMiddleware;

impl Middleware for LoggingMiddleware {
    fn name(&self) -> &str {
        "logging"
    }

    fn process_request(&self, request: Request) -> Result<Request> {
        info!(
            request_id = request.request_id().unwrap_or("-"),
            "Request: {}",
            truncate_string(request.prompt(), PREVIEW_CHARS)
        );
        Ok(request)
    }

    fn process_response(&self, response: Response) -> Result<Response> {
        info!(
            "Response from {} in {}ms ({} tokens, {} attempts)",
            response.model_used,
            response.latency_ms,
            response.tokens,
            response.attempts.len()
        );
        Ok(response)
    }
}

/// Rejects prompts that cannot be routed
#[derive(Debug, Clone, Copy)]
pub struct ValidationMiddleware {
    max_prompt_chars: usize,
}

impl ValidationMiddleware {
    /// Validation with a custom prompt length limit
    pub fn with_max_prompt_chars(max_prompt_chars: usize) -> Self {
        Self { max_prompt_chars }
    }
}

impl Default for ValidationMiddleware {
    fn default() -> Self {
        Self::with_max_prompt_chars(MAX_PROMPT_CHARS)
    }
}

impl Middleware for ValidationMiddleware {
    fn name(&self) -> &str {
        "validation"
    }

    fn process_request(&self, request: Request) -> Result<Request> {
        if request.prompt().trim().is_empty() {
            return Err(GatewayError::validation("Prompt must not be empty"));
        }

        let length = request.prompt().chars().count();
        if length > self.max_prompt_chars {
            return Err(GatewayError::validation(format!(
                "Prompt is {} characters, limit is {}",
                length, self.max_prompt_chars
            )));
        }

        debug!("Request passed validation ({} chars)", length);
        Ok(request)
    }
}
