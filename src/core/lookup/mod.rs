// Copyright (c) 2026 Kadmos
// Licensed under the Apache License, Version 2.0

#![forbid(unsafe_code)]
#![allow(missing_docs)]

//! Lookup: the iterative, bounded-parallel FIND_NODE / FIND_VALUE engine.

mod engine;
mod state;

pub use engine::{Lookup, LookupCanceller, LookupError, LookupOutcome, LookupProgress};
