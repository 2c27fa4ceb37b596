//! JSONL repository - append-only files with a capped in-memory cache
//!
//! Layout inside the data directory:
//! - `checks.jsonl`: one JSON-serialized `ComplianceCheck` per line
//! - `alerts.jsonl`: one JSON-serialized `AmlAlert` per line
//!
//! On open, the last `cap` parsable records of each file are loaded.
//! Unparsable lines (bad JSON, bad UTF-8, a torn last write) are skipped
//! with a warning rather than failing the whole store, and a torn last
//! line is terminated before anything new is appended. Files are compacted
//! down to the retained records when a record is replaced, and once a file
//! holds twice the cap.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use vigil_core::{AmlAlert, ComplianceCheck};

use crate::capped::{CappedLog, DEFAULT_RETENTION};
use crate::error::StoreResult;
use crate::repository::{ComplianceRepository, Record};

pub const CHECKS_FILE: &str = "checks.jsonl";
pub const ALERTS_FILE: &str = "alerts.jsonl";

/// One record kind backed by one JSONL file
struct JsonlLog<T> {
    path: PathBuf,
    file: File,
    log: CappedLog<T>,
    /// Lines currently in the file (parsable or not)
    lines_on_disk: usize,
}

impl<T: Record> JsonlLog<T> {
    fn open(path: PathBuf, cap: usize) -> StoreResult<Self> {
        let mut log = CappedLog::new(cap);
        let mut lines_on_disk = 0;
        let mut torn_tail = false;

        if path.exists() {
            let mut reader = BufReader::new(File::open(&path)?);
            let mut buf = Vec::new();
            let mut line_no = 0;
            loop {
                buf.clear();
                if reader.read_until(b'\n', &mut buf)? == 0 {
                    break;
                }
                line_no += 1;
                torn_tail = buf.last() != Some(&b'\n');
                if buf.iter().all(u8::is_ascii_whitespace) {
                    continue;
                }
                lines_on_disk += 1;
                // Bytes go straight to serde so bad UTF-8 is a parse error
                match serde_json::from_slice::<T>(&buf) {
                    Ok(record) => {
                        log.push(record);
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            line = line_no,
                            error = %e,
                            "Skipping unreadable {} record",
                            T::KIND
                        );
                    }
                }
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        if torn_tail {
            // Terminate a partial last line so the next record starts clean
            tracing::warn!(path = %path.display(), "Terminating partial last line");
            writeln!(file)?;
            file.flush()?;
        }

        let mut this = Self {
            path,
            file,
            log,
            lines_on_disk,
        };
        if this.lines_on_disk >= this.compaction_threshold() {
            this.compact()?;
        }
        Ok(this)
    }

    fn compaction_threshold(&self) -> usize {
        self.log.cap() * 2
    }

    fn append(&mut self, record: T) -> StoreResult<()> {
        let json = serde_json::to_string(&record)?;
        writeln!(self.file, "{}", json)?;
        self.file.flush()?;
        self.lines_on_disk += 1;

        if let Some(evicted) = self.log.push(record) {
            tracing::debug!(id = evicted.id(), "Evicted oldest {}", T::KIND);
        }
        if self.lines_on_disk >= self.compaction_threshold() {
            self.compact()?;
        }
        Ok(())
    }

    /// Replace a record on disk first, then in memory
    fn replace(&mut self, record: T) -> StoreResult<()> {
        let mut updated = self.log.clone();
        updated.replace(record)?;

        self.file = rewrite(&self.path, &updated)?;
        self.log = updated;
        self.lines_on_disk = self.log.len();
        Ok(())
    }

    fn compact(&mut self) -> StoreResult<()> {
        self.file = rewrite(&self.path, &self.log)?;
        self.lines_on_disk = self.log.len();
        tracing::debug!(path = %self.path.display(), records = self.lines_on_disk, "Compacted");
        Ok(())
    }
}

/// Rewrite `path` with exactly the records in `log` and reopen it for append
fn rewrite<T: Record>(path: &Path, log: &CappedLog<T>) -> StoreResult<File> {
    let tmp_path = path.with_extension("jsonl.tmp");
    {
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        for record in log.iter() {
            let json = serde_json::to_string(record)?;
            writeln!(writer, "{}", json)?;
        }
        writer.flush()?;
    }
    fs::rename(&tmp_path, path)?;

    Ok(OpenOptions::new().append(true).open(path)?)
}

/// File-backed repository for checks and alerts
pub struct JsonlRepository {
    dir: PathBuf,
    checks: JsonlLog<ComplianceCheck>,
    alerts: JsonlLog<AmlAlert>,
}

impl JsonlRepository {
    /// Open (or create) a repository in `dir` with the default retention
    pub fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open_with_retention(dir, DEFAULT_RETENTION)
    }

    /// Open (or create) a repository in `dir` with a custom retention cap
    pub fn open_with_retention(dir: impl AsRef<Path>, cap: usize) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let checks = JsonlLog::open(dir.join(CHECKS_FILE), cap)?;
        let alerts = JsonlLog::open(dir.join(ALERTS_FILE), cap)?;

        Ok(Self { dir, checks, alerts })
    }

    /// Get the data directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ComplianceRepository for JsonlRepository {
    fn append_check(&mut self, check: ComplianceCheck) -> StoreResult<()> {
        self.checks.append(check)
    }

    fn recent_checks(&self, limit: Option<usize>) -> StoreResult<Vec<ComplianceCheck>> {
        Ok(self.checks.log.recent(limit))
    }

    fn find_check(&self, id: &str) -> StoreResult<Option<ComplianceCheck>> {
        Ok(self.checks.log.find(id).cloned())
    }

    fn replace_check(&mut self, check: ComplianceCheck) -> StoreResult<()> {
        self.checks.replace(check)
    }

    fn append_alert(&mut self, alert: AmlAlert) -> StoreResult<()> {
        self.alerts.append(alert)
    }

    fn recent_alerts(&self, limit: Option<usize>) -> StoreResult<Vec<AmlAlert>> {
        Ok(self.alerts.log.recent(limit))
    }

    fn find_alert(&self, id: &str) -> StoreResult<Option<AmlAlert>> {
        Ok(self.alerts.log.find(id).cloned())
    }

    fn replace_alert(&mut self, alert: AmlAlert) -> StoreResult<()> {
        self.alerts.replace(alert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::tests::{alert, check};
    use tempfile::tempdir;
    use vigil_core::{AlertStatus, CheckStatus};

    fn line_count(path: &Path) -> usize {
        fs::read_to_string(path).unwrap().lines().count()
    }

    #[test]
    fn test_write_and_reopen() {
        let dir = tempdir().unwrap();

        {
            let mut repo = JsonlRepository::open(dir.path()).unwrap();
            repo.append_check(check(1)).unwrap();
            repo.append_check(check(2)).unwrap();
            repo.append_alert(alert(2)).unwrap();
        }

        let repo = JsonlRepository::open(dir.path()).unwrap();
        let checks = repo.recent_checks(None).unwrap();

        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].id, "CHK-001");
        assert_eq!(checks[1].id, "CHK-002");
        assert_eq!(repo.recent_alerts(None).unwrap().len(), 1);
    }

    #[test]
    fn test_creates_data_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested").join("data");

        let repo = JsonlRepository::open(&nested).unwrap();
        assert!(nested.join(CHECKS_FILE).exists());
        assert!(nested.join(ALERTS_FILE).exists());
        assert_eq!(repo.dir(), nested.as_path());
    }

    #[test]
    fn test_retention_survives_reopen() {
        let dir = tempdir().unwrap();

        {
            let mut repo = JsonlRepository::open_with_retention(dir.path(), 5).unwrap();
            for n in 0..8 {
                repo.append_check(check(n)).unwrap();
            }
        }

        let repo = JsonlRepository::open_with_retention(dir.path(), 5).unwrap();
        let ids: Vec<String> = repo.recent_checks(None).unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["CHK-003", "CHK-004", "CHK-005", "CHK-006", "CHK-007"]);
    }

    #[test]
    fn test_compacts_at_twice_the_cap() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CHECKS_FILE);
        let mut repo = JsonlRepository::open_with_retention(dir.path(), 3).unwrap();

        for n in 0..5 {
            repo.append_check(check(n)).unwrap();
        }
        assert_eq!(line_count(&path), 5);

        repo.append_check(check(5)).unwrap();
        assert_eq!(line_count(&path), 3);

        // Appends keep working after the file was swapped
        repo.append_check(check(6)).unwrap();
        assert_eq!(line_count(&path), 4);
    }

    #[test]
    fn test_replace_rewrites_file() {
        let dir = tempdir().unwrap();

        {
            let mut repo = JsonlRepository::open(dir.path()).unwrap();
            repo.append_check(check(1)).unwrap();
            repo.append_alert(alert(1)).unwrap();

            let mut reviewed = check(1);
            reviewed.status = CheckStatus::Rejected;
            reviewed.reviewed_by = Some("OFFICER-001".to_string());
            repo.replace_check(reviewed).unwrap();

            let mut closed = alert(1);
            closed.status = AlertStatus::Resolved;
            repo.replace_alert(closed).unwrap();
        }

        let repo = JsonlRepository::open(dir.path()).unwrap();
        let stored = repo.find_check("CHK-001").unwrap().unwrap();
        assert_eq!(stored.status, CheckStatus::Rejected);
        assert_eq!(stored.reviewed_by.as_deref(), Some("OFFICER-001"));
        assert_eq!(line_count(&dir.path().join(CHECKS_FILE)), 1);

        let alert = repo.find_alert("ALERT-001").unwrap().unwrap();
        assert_eq!(alert.status, AlertStatus::Resolved);
    }

    #[test]
    fn test_corrupt_lines_are_skipped() {
        let dir = tempdir().unwrap();

        {
            let mut repo = JsonlRepository::open(dir.path()).unwrap();
            repo.append_check(check(1)).unwrap();
        }
        {
            let mut file = OpenOptions::new()
                .append(true)
                .open(dir.path().join(CHECKS_FILE))
                .unwrap();
            writeln!(file, "{{ not json").unwrap();
        }
        {
            let mut repo = JsonlRepository::open(dir.path()).unwrap();
            repo.append_check(check(2)).unwrap();
        }

        let repo = JsonlRepository::open(dir.path()).unwrap();
        let ids: Vec<String> = repo.recent_checks(None).unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["CHK-001", "CHK-002"]);
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let dir = tempdir().unwrap();

        {
            let mut repo = JsonlRepository::open(dir.path()).unwrap();
            repo.append_check(check(1)).unwrap();
        }
        {
            let mut file = OpenOptions::new()
                .append(true)
                .open(dir.path().join(CHECKS_FILE))
                .unwrap();
            file.write_all(&[0xff, 0xfe, b'\n']).unwrap();
        }

        let mut repo = JsonlRepository::open(dir.path()).unwrap();
        repo.append_check(check(2)).unwrap();

        let ids: Vec<String> = repo.recent_checks(None).unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["CHK-001", "CHK-002"]);
    }

    #[test]
    fn test_partial_last_line_does_not_swallow_next_record() {
        let dir = tempdir().unwrap();

        {
            let mut repo = JsonlRepository::open(dir.path()).unwrap();
            repo.append_check(check(1)).unwrap();
        }
        {
            let mut file = OpenOptions::new()
                .append(true)
                .open(dir.path().join(CHECKS_FILE))
                .unwrap();
            write!(file, r#"{{"id":"CHK-"#).unwrap();
        }
        {
            let mut repo = JsonlRepository::open(dir.path()).unwrap();
            repo.append_check(check(2)).unwrap();
        }

        let repo = JsonlRepository::open(dir.path()).unwrap();
        let ids: Vec<String> = repo.recent_checks(None).unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["CHK-001", "CHK-002"]);
    }

    #[test]
    fn test_failed_replace_leaves_memory_unchanged() {
        let dir = tempdir().unwrap();
        let mut repo = JsonlRepository::open(dir.path()).unwrap();
        repo.append_check(check(1)).unwrap();

        // A directory in the way of the temp file makes the rewrite fail
        fs::create_dir(dir.path().join("checks.jsonl.tmp")).unwrap();

        let mut reviewed = check(1);
        reviewed.status = CheckStatus::Rejected;
        assert!(repo.replace_check(reviewed).is_err());

        let stored = repo.find_check("CHK-001").unwrap().unwrap();
        assert_eq!(stored.status, check(1).status);
    }

    #[test]
    fn test_replace_unknown_is_not_found() {
        let dir = tempdir().unwrap();
        let mut repo = JsonlRepository::open(dir.path()).unwrap();

        assert!(repo.replace_check(check(9)).is_err());
    }
}
