// Copyright (c) 2026 Kadmos
// Licensed under the Apache License, Version 2.0

#![forbid(unsafe_code)]
#![allow(missing_docs)]

//! Networking: wire message types and the transport seam.

pub mod rpc;
