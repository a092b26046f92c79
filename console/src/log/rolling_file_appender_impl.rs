// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::Path;

use miette::miette;
use tracing_appender::rolling::{self, RollingFileAppender};

/// A file appender that never rotates. A bare file name is created in the current
/// working directory.
///
/// Note that wrapping this in `tracing_appender::non_blocking` drops the worker guard
/// as soon as this returns, which silently stops all writes. Use it as is.
///
/// # Errors
///
/// Returns an error if `path` has no file name (eg: it ends in `..`).
pub fn try_create(path: &Path) -> miette::Result<RollingFileAppender> {
    let Some(file_name) = path.file_name() else {
        return Err(miette!(
            "Can't use {} as a tracing log file, it has no file name.",
            path.display()
        ));
    };

    let folder = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    Ok(rolling::never(folder, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_path_without_file_name() {
        assert!(try_create(Path::new("/tmp/..")).is_err());
    }

    #[test]
    fn test_creates_appender_in_folder() {
        let dir = tempfile::tempdir().unwrap();
        assert!(try_create(&dir.path().join("tracing.log")).is_ok());
    }
}
