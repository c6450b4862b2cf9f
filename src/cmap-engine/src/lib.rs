// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

#![forbid(unsafe_code)]

pub mod common;
pub mod config;
pub mod layout;
pub mod model;
pub mod query;
pub mod report;
pub mod vocab;

pub use self::common::{Error, ErrorCode, ErrorKind, Result};
pub use self::config::{Config, GraphMode, LayoutStrategy};
pub use self::layout::{LayoutSummary, generate_layout};
pub use self::model::{Model, PrefixMap, Statement, Term};
pub use self::query::{QueryText, synthesize, write_query};
pub use self::report::{BreadthFirstSearch, PathReport, ShortestPathSearch, build_report, write_report};
