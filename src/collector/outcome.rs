// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Per-cycle results and collector health tracking

use std::time::Duration;

use crate::error::AppError;

/// Result of one collection cycle
#[derive(Debug)]
pub enum CycleOutcome {
    /// Snapshot written to the database
    Exported {
        cycle: u64,
        fields: usize,
        elapsed: Duration,
    },
    /// A stage failed; the loop carries on with the next tick
    Failed {
        cycle: u64,
        error: AppError,
        elapsed: Duration,
    },
}

impl CycleOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Exported { .. })
    }

    pub fn cycle(&self) -> u64 {
        match self {
            Self::Exported { cycle, .. } | Self::Failed { cycle, .. } => *cycle,
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            Self::Exported { elapsed, .. } | Self::Failed { elapsed, .. } => *elapsed,
        }
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            Self::Exported { .. } => None,
            Self::Failed { error, .. } => Some(error),
        }
    }
}

/// Running totals of collection cycles
#[derive(Debug, Clone, Default)]
pub struct CollectorHealth {
    pub cycles: u64,
    pub successes: u64,
    pub failures: u64,
    pub consecutive_failures: u32,
    pub last_success: Option<tokio::time::Instant>,
    pub last_failure: Option<tokio::time::Instant>,
}

impl CollectorHealth {
    pub(crate) fn record(&mut self, outcome: &CycleOutcome) {
        self.cycles += 1;
        if outcome.is_success() {
            self.successes += 1;
            self.consecutive_failures = 0;
            self.last_success = Some(tokio::time::Instant::now());
        } else {
            self.failures += 1;
            self.consecutive_failures = self.consecutive_failures.saturating_add(1);
            self.last_failure = Some(tokio::time::Instant::now());
        }
    }
}
