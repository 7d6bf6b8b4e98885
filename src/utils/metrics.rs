//! Observability and Metrics
//!
//! This module provides metrics collection and observability features
//! for monitoring dispatch volume and failure classes.
//!
//! Uses atomic counters for thread-safe metrics collection.

use crate::error::ProtocolError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Metrics collector for RPC dispatch operations
#[derive(Debug)]
pub struct Metrics {
    /// Total requests dispatched
    pub requests_total: AtomicU64,
    /// Requests that produced an error envelope
    pub requests_failed: AtomicU64,
    /// Version-gate rejections
    pub unsupported_protocol: AtomicU64,
    /// Method-grammar rejections
    pub invalid_method_names: AtomicU64,
    /// Unknown-module rejections
    pub modules_not_found: AtomicU64,
    /// Unregistered-operation rejections
    pub methods_not_implemented: AtomicU64,
    /// Faults raised inside handlers
    pub handler_faults: AtomicU64,
    /// Shared chain-state replacements
    pub chain_resets: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            requests_total: AtomicU64::new(0),
            requests_failed: AtomicU64::new(0),
            unsupported_protocol: AtomicU64::new(0),
            invalid_method_names: AtomicU64::new(0),
            modules_not_found: AtomicU64::new(0),
            methods_not_implemented: AtomicU64::new(0),
            handler_faults: AtomicU64::new(0),
            chain_resets: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a dispatched request
    pub fn request_dispatched(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed request, classified by error
    pub fn request_failed(&self, error: &ProtocolError) {
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
        let class = match error {
            ProtocolError::UnsupportedProtocol(_) => &self.unsupported_protocol,
            ProtocolError::InvalidMethodName(_) => &self.invalid_method_names,
            ProtocolError::ModuleNotFound(_) => &self.modules_not_found,
            ProtocolError::MethodNotImplemented(_) => &self.methods_not_implemented,
            _ => &self.handler_faults,
        };
        class.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a shared chain-state replacement
    pub fn chain_reset(&self) {
        self.chain_resets.fetch_add(1, Ordering::Relaxed);
    }

    /// Uptime since this collector was created
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Log a summary of all counters
    pub fn log_summary(&self) {
        info!(
            requests_total = self.requests_total.load(Ordering::Relaxed),
            requests_failed = self.requests_failed.load(Ordering::Relaxed),
            unsupported_protocol = self.unsupported_protocol.load(Ordering::Relaxed),
            invalid_method_names = self.invalid_method_names.load(Ordering::Relaxed),
            modules_not_found = self.modules_not_found.load(Ordering::Relaxed),
            methods_not_implemented = self.methods_not_implemented.load(Ordering::Relaxed),
            handler_faults = self.handler_faults.load(Ordering::Relaxed),
            chain_resets = self.chain_resets.load(Ordering::Relaxed),
            uptime_secs = self.uptime_secs(),
            "rpc metrics summary"
        );
    }
}
