// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::{error, fmt, result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Generic,
    DoesNotExist,
    MissingPosition,
    BadLiteral,
    MissingSourceFlag,
    MissingTargetFlag,
    DuplicateFlag,
    MissingRootNode,
    JsonDeserialization,
    JsonSerialization,
    FileRead,
    FileWrite,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            Generic => "generic",
            DoesNotExist => "does_not_exist",
            MissingPosition => "missing_position",
            BadLiteral => "bad_literal",
            MissingSourceFlag => "missing_source_flag",
            MissingTargetFlag => "missing_target_flag",
            DuplicateFlag => "duplicate_flag",
            MissingRootNode => "missing_root_node",
            JsonDeserialization => "json_deserialization",
            JsonSerialization => "json_serialization",
            FileRead => "file_read",
            FileWrite => "file_write",
        };

        write!(f, "{name}")
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Model,
    Layout,
    Query,
    Report,
    Io,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub code: ErrorCode,
    pub details: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, code: ErrorCode, details: Option<String>) -> Self {
        Error {
            kind,
            code,
            details,
        }
    }

    pub fn get_details(&self) -> Option<String> {
        self.details.clone()
    }

    /// True for the precondition failures that abort an operation before
    /// any output is produced.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::MissingSourceFlag
                | ErrorCode::MissingTargetFlag
                | ErrorCode::DuplicateFlag
                | ErrorCode::MissingRootNode
                | ErrorCode::MissingPosition
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.kind {
            ErrorKind::Model => "ModelError",
            ErrorKind::Layout => "LayoutError",
            ErrorKind::Query => "QueryError",
            ErrorKind::Report => "ReportError",
            ErrorKind::Io => "IoError",
        };
        match self.details {
            Some(ref details) => write!(f, "{}{{{}: {}}}", kind, self.code, details),
            None => write!(f, "{}{{{}}}", kind, self.code),
        }
    }
}

impl error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        let code = if err.is_io() {
            ErrorCode::FileRead
        } else {
            ErrorCode::JsonDeserialization
        };
        Error::new(ErrorKind::Model, code, Some(err.to_string()))
    }
}

pub type Result<T> = result::Result<T, Error>;

#[macro_export]
macro_rules! model_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Model, ErrorCode::$code, Some($str)))
    }};
    ($code:tt) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Model, ErrorCode::$code, None))
    }};
}

#[macro_export]
macro_rules! layout_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Layout, ErrorCode::$code, Some($str)))
    }};
}

#[macro_export]
macro_rules! query_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Query, ErrorCode::$code, Some($str)))
    }};
    ($code:tt) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Query, ErrorCode::$code, None))
    }};
}

#[macro_export]
macro_rules! report_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Report, ErrorCode::$code, Some($str)))
    }};
    ($code:tt) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Report, ErrorCode::$code, None))
    }};
}

/// Wrap a filesystem failure on `path` as an `Io` error.
pub(crate) fn io_error(code: ErrorCode, path: &std::path::Path, err: std::io::Error) -> Error {
    Error::new(
        ErrorKind::Io,
        code,
        Some(format!("{}: {}", path.display(), err)),
    )
}
