//! Access rules.

use pathdb_core::{ClientError, Path};

/// Locations where reads or writes are refused.
///
/// A denied location also blocks operations on its ancestors, since those
/// would read or replace the denied data, and on its descendants.
#[derive(Clone, Debug, Default)]
pub(crate) struct AccessRules {
    denied_reads: Vec<Path>,
    denied_writes: Vec<Path>,
}

impl AccessRules {
    pub(crate) fn deny_read(&mut self, path: Path) {
        self.denied_reads.push(path);
    }

    pub(crate) fn deny_write(&mut self, path: Path) {
        self.denied_writes.push(path);
    }

    pub(crate) fn check_read(&self, path: &Path) -> Result<(), ClientError> {
        check(&self.denied_reads, path)
    }

    pub(crate) fn check_write(&self, path: &Path) -> Result<(), ClientError> {
        check(&self.denied_writes, path)
    }

    /// Like [`AccessRules::check_read`], without logging a denial.
    pub(crate) fn can_read(&self, path: &Path) -> bool {
        !self.denied_reads.iter().any(|d| d.overlaps(path))
    }
}

fn check(denied: &[Path], path: &Path) -> Result<(), ClientError> {
    if denied.iter().any(|d| d.overlaps(path)) {
        tracing::debug!(path = %path, "access denied");
        return Err(ClientError::PermissionDenied { path: path.clone() });
    }
    Ok(())
}
