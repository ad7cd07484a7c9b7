// ABOUTME: Scan flow state machine from capture to recorded result
// ABOUTME: Rejects concurrent captures and discards late results via generation tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Scan coordinator
//!
//! `Idle → Scanning → Result | Error → Idle`. Only one capture runs at a
//! time. Navigating away calls [`ScanCoordinator::abandon`], which bumps the
//! generation so the in-flight analysis, when it eventually resolves, is
//! dropped instead of being written to history.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::errors::{AppError, AppResult, ErrorCode};
use crate::llm::{FoodAnalyzer, ImagePayload};
use crate::models::{NutritionRecord, UserId};
use crate::progression::{ProgressionLedger, ScanOutcome};

/// What the scan screen shows
#[derive(Debug, Clone)]
pub enum ScanStatus {
    /// Ready for a capture
    Idle,
    /// Waiting on the analysis
    Scanning,
    /// Analysis recorded
    Result(Box<ScanOutcome>),
    /// Analysis failed; the message is user-facing
    Error(String),
}

impl ScanStatus {
    /// Whether a capture is in flight
    #[must_use]
    pub const fn is_scanning(&self) -> bool {
        matches!(self, Self::Scanning)
    }
}

/// Handle for one in-flight capture
#[derive(Debug, Clone)]
pub struct ScanTicket {
    generation: u64,
    image: ImagePayload,
}

impl ScanTicket {
    /// Generation this capture belongs to
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Captured image
    #[must_use]
    pub const fn image(&self) -> &ImagePayload {
        &self.image
    }
}

/// How a capture ended
#[derive(Debug)]
pub enum ScanResolution {
    /// Recorded into history and the ledger
    Completed(Box<ScanOutcome>),
    /// Analysis or recording failed
    Failed(AppError),
    /// Abandoned before it resolved; nothing was written
    Discarded,
}

#[derive(Debug)]
struct Inner {
    status: ScanStatus,
    generation: u64,
}

/// Per-device scan coordinator
#[derive(Clone)]
pub struct ScanCoordinator {
    inner: Arc<Mutex<Inner>>,
    analyzer: Option<Arc<dyn FoodAnalyzer>>,
    ledger: ProgressionLedger,
}

impl ScanCoordinator {
    /// Create a coordinator; without an analyzer every scan fails
    #[must_use]
    pub fn new(ledger: ProgressionLedger, analyzer: Option<Arc<dyn FoodAnalyzer>>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                status: ScanStatus::Idle,
                generation: 0,
            })),
            analyzer,
            ledger,
        }
    }

    /// Current status
    pub async fn status(&self) -> ScanStatus {
        self.inner.lock().await.status.clone()
    }

    /// Start a capture
    ///
    /// # Errors
    ///
    /// Returns `ScanInProgress` while another capture is running
    pub async fn begin(&self, image: ImagePayload) -> AppResult<ScanTicket> {
        let mut inner = self.inner.lock().await;
        if inner.status.is_scanning() {
            return Err(AppError::scan_in_progress());
        }
        inner.generation += 1;
        inner.status = ScanStatus::Scanning;
        debug!(generation = inner.generation, "Scan started");
        Ok(ScanTicket {
            generation: inner.generation,
            image,
        })
    }

    /// Resolve a capture with the analysis result
    ///
    /// A ticket from an abandoned generation is discarded without touching
    /// history or the ledger.
    pub async fn complete(
        &self,
        ticket: ScanTicket,
        user: &UserId,
        analysis: AppResult<NutritionRecord>,
        at: DateTime<Utc>,
    ) -> ScanResolution {
        let mut inner = self.inner.lock().await;
        if inner.generation != ticket.generation || !inner.status.is_scanning() {
            info!(
                ticket = ticket.generation,
                current = inner.generation,
                "Discarding stale scan result"
            );
            return ScanResolution::Discarded;
        }

        let recorded = match analysis {
            Ok(record) => {
                self.ledger
                    .record_scan(user, record, Some(ticket.image.data_url()), at)
                    .await
            }
            Err(e) => Err(e),
        };

        match recorded {
            Ok(outcome) => {
                let outcome = Box::new(outcome);
                inner.status = ScanStatus::Result(outcome.clone());
                ScanResolution::Completed(outcome)
            }
            Err(e) => {
                warn!(code = ?e.code, "Scan failed: {}", e.message);
                inner.status = ScanStatus::Error(e.message.clone());
                ScanResolution::Failed(e)
            }
        }
    }

    /// Capture, analyse, and record in one call
    ///
    /// # Errors
    ///
    /// Returns `ScanInProgress` if a capture is already running; analysis
    /// and storage failures are reported as [`ScanResolution::Failed`]
    pub async fn scan(
        &self,
        user: &UserId,
        image: ImagePayload,
        at: DateTime<Utc>,
    ) -> AppResult<ScanResolution> {
        let ticket = self.begin(image).await?;
        let analysis = match &self.analyzer {
            Some(analyzer) => analyzer.analyze(ticket.image()).await,
            None => Err(AppError::new(
                ErrorCode::ExternalServiceUnavailable,
                "No meal analyzer is configured",
            )),
        };
        Ok(self.complete(ticket, user, analysis, at).await)
    }

    /// Navigate away: forget any in-flight capture
    pub async fn abandon(&self) {
        let mut inner = self.inner.lock().await;
        inner.generation += 1;
        inner.status = ScanStatus::Idle;
    }

    /// "Try again": return to idle from a result or an error
    pub async fn reset(&self) {
        let mut inner = self.inner.lock().await;
        if inner.status.is_scanning() {
            inner.generation += 1;
        }
        inner.status = ScanStatus::Idle;
    }
}
