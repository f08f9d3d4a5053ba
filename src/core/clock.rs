// Copyright (c) 2026 Kadmos
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Injectable time source. All timestamp and expiry logic goes through
//! [`Clock`] so tests and simulations can substitute a deterministic one.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Time source abstraction. Implementations report seconds since the UNIX
/// epoch as a float, matching the envelope timestamp format.
pub trait Clock: Send + Sync {
    /// Current time in seconds since the UNIX epoch.
    fn now(&self) -> f64;
}

/// Wall-clock time source.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64()
    }
}

/// Deterministic time source for tests and simulation.
#[derive(Debug, Default)]
pub struct FixedClock {
    now: Mutex<f64>,
}

impl FixedClock {
    /// Create a clock pinned at `now` seconds since the epoch.
    pub fn at(now: f64) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Pin the clock at an absolute time.
    pub fn set(&self, now: f64) {
        if let Ok(mut t) = self.now.lock() {
            *t = now;
        }
    }

    /// Move the clock forward by `secs` seconds.
    pub fn advance(&self, secs: f64) {
        if let Ok(mut t) = self.now.lock() {
            *t += secs;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> f64 {
        self.now.lock().map(|t| *t).unwrap_or_default()
    }
}
