// Copyright (c) 2026 Kadmos
// Licensed under the Apache License, Version 2.0

#![forbid(unsafe_code)]
#![allow(missing_docs)]

//! Crypto: canonical digests and signed-item envelopes.

pub mod digest;
pub mod envelope;
