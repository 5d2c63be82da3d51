use crate::app::error::{Error, Result};
use crate::app::group::Tally;
use std::fmt::Write;
use std::path::Path;

/// Counters exported for shell scripts as `export KEY=VALUE` lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub total: usize,
    pub pass: usize,
    pub fail: usize,
    pub skip: usize,
    pub elapsed_time: Option<String>,
}

impl From<&Tally> for Status {
    fn from(tally: &Tally) -> Self {
        Self {
            total: tally.total(),
            pass: tally.pass,
            fail: tally.fail,
            skip: tally.skip,
            elapsed_time: None,
        }
    }
}

impl Status {
    pub fn with_elapsed_time(mut self, elapsed_time: String) -> Self {
        self.elapsed_time = Some(elapsed_time);
        self
    }

    pub fn to_env(&self) -> String {
        let mut env = format!(
            "export TOTAL={}\nexport PASS={}\nexport FAIL={}\nexport SKIP={}\n",
            self.total, self.pass, self.fail, self.skip
        );
        if let Some(elapsed_time) = &self.elapsed_time {
            let _ = writeln!(env, "export ELAPSED_TIME={}", elapsed_time);
        }
        env
    }

    /// Replaces the file content, so writing twice leaves only the last status.
    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_env()).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Status written to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_counters() {
        let tally = Tally {
            pass: 2,
            fail: 1,
            skip: 1,
        };
        let env = Status::from(&tally).to_env();

        assert_eq!(
            env,
            "export TOTAL=4\nexport PASS=2\nexport FAIL=1\nexport SKIP=1\n"
        );
    }

    #[test]
    fn test_second_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.env");
        let tally = Tally {
            pass: 2,
            fail: 1,
            skip: 1,
        };

        let status = Status::from(&tally);
        status.write(&path).unwrap();
        status.with_elapsed_time("3.2s".to_owned()).write(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "export TOTAL=4\nexport PASS=2\nexport FAIL=1\nexport SKIP=1\nexport ELAPSED_TIME=3.2s\n"
        );
    }

    #[test]
    fn test_unwritable_path() {
        let status = Status::default();
        let result = status.write(Path::new("/nonexistent/dir/status.env"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
