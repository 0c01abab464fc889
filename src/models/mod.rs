// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model shared by renderers and hosts.

pub mod annotation;
pub mod document;
pub mod file;
