// Copyright (c) 2026 Kadmos
// Licensed under the Apache License, Version 2.0

#![forbid(unsafe_code)]
#![allow(missing_docs)]

//! Monitoring: Prometheus metrics for lookup and routing activity.

pub mod metrics;
