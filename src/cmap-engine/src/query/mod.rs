// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Query synthesis between the source and target resources of a model.

pub mod path;
pub mod render;

use std::fs;
use std::path::{Path, PathBuf};

use crate::common::{ErrorCode, Result, io_error};
use crate::config::Config;
use crate::model::{Model, Term, local_name};
use crate::vocab;

use self::path::find_path;

/// A synthesized query and its commented variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryText {
    pub query: String,
    /// Same query with each triple pattern followed by a `#` comment of
    /// human-readable labels.
    pub readable: String,
    pub found_path: bool,
    /// Number of statements on the path.
    pub hops: usize,
}

fn single_flagged(model: &Model, flag: &str) -> Result<Option<Term>> {
    let mut flagged = model.flagged(flag);
    if flagged.len() > 1 {
        let names: Vec<String> = flagged.iter().map(|t| t.to_string()).collect();
        return crate::query_err!(
            DuplicateFlag,
            format!("{} is set on {}", local_name(flag), names.join(", "))
        );
    }
    Ok(flagged.pop())
}

/// The resources flagged as source and as target. Each flag must be set on
/// exactly one resource.
pub fn find_endpoints(model: &Model) -> Result<(Term, Term)> {
    let Some(source) = single_flagged(model, vocab::IS_SOURCE)? else {
        return crate::query_err!(
            MissingSourceFlag,
            "no resource is flagged as source".to_owned()
        );
    };
    let Some(target) = single_flagged(model, vocab::IS_TARGET)? else {
        return crate::query_err!(
            MissingTargetFlag,
            "no resource is flagged as target".to_owned()
        );
    };
    Ok((source, target))
}

/// Find a path from the flagged source to the flagged target and render it
/// as a query.
///
/// A model without a path still yields a query over the target's own
/// properties; `found_path` tells the two cases apart.
pub fn synthesize(model: &Model, config: &Config) -> Result<QueryText> {
    let (source, target) = find_endpoints(model)?;
    let state = find_path(model, &source, &target);
    if !state.found_target {
        tracing::warn!(%source, %target, "no path between source and target");
    }
    Ok(render::render(model, config, &target, &state))
}

/// `dir/name-readable.ext` for `dir/name.ext`.
pub fn readable_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}-readable.{}", ext.to_string_lossy()),
        None => format!("{stem}-readable"),
    };
    path.with_file_name(name)
}

/// Synthesize the query and write it to `path`, with the readable variant
/// beside it. Nothing is written when synthesis fails.
pub fn write_query(model: &Model, config: &Config, path: &Path) -> Result<QueryText> {
    let text = synthesize(model, config)?;

    fs::write(path, &text.query).map_err(|err| io_error(ErrorCode::FileWrite, path, err))?;
    let readable = readable_path(path);
    fs::write(&readable, &text.readable)
        .map_err(|err| io_error(ErrorCode::FileWrite, &readable, err))?;

    tracing::info!(
        query = %path.display(),
        readable = %readable.display(),
        hops = text.hops,
        "query written"
    );
    Ok(text)
}
