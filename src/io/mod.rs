// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: content sources, background loading and documents.

pub mod loader;
pub mod media;
pub mod serialization;
pub mod source;
