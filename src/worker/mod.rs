//! Line-oriented DUCO-S1 worker
//!
//! Reads one job per line and answers each with one result line, the way a
//! mining board answers its host over serial or I2C. Lines that are not valid
//! jobs are answered with `#` so the host flushes and resends.

use std::io::{self, BufRead, Write};

use crate::config::WorkerConfig;
use crate::job::{Job, JobResult, CORRUPTED_MARKER};

/// Counters for one worker session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Non-empty lines received
    pub jobs: u64,
    /// Jobs whose nonce was found
    pub solved: u64,
    /// Lines that could not be parsed
    pub rejected: u64,
}

pub struct Worker<R, W> {
    reader: R,
    writer: W,
    config: WorkerConfig,
}

impl<R: BufRead, W: Write> Worker<R, W> {
    pub fn new(reader: R, writer: W, config: WorkerConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    /// Process jobs until the reader is exhausted
    pub fn run(&mut self) -> io::Result<WorkerStats> {
        let mut stats = WorkerStats::default();
        let mut raw = Vec::new();

        loop {
            raw.clear();
            if self.reader.read_until(b'\n', &mut raw)? == 0 {
                break;
            }
            if raw.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            stats.jobs += 1;
            let reply = match std::str::from_utf8(&raw) {
                Ok(line) => self.handle_line(line, &mut stats),
                Err(e) => {
                    log::warn!("Rejecting job line with corrupted bytes: {e}");
                    stats.rejected += 1;
                    CORRUPTED_MARKER.to_string()
                }
            };
            writeln!(self.writer, "{reply}")?;
            self.writer.flush()?;
        }

        log::info!(
            "Worker finished: {} jobs, {} solved, {} rejected",
            stats.jobs,
            stats.solved,
            stats.rejected
        );
        Ok(stats)
    }

    /// Consume the worker, returning its writer
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn handle_line(&self, line: &str, stats: &mut WorkerStats) -> String {
        let job = match Job::parse_with(line, self.config.separator) {
            Ok(job) => job,
            Err(e) => {
                log::warn!("Rejecting job line {:?}: {}", line.trim_end(), e);
                stats.rejected += 1;
                return CORRUPTED_MARKER.to_string();
            }
        };

        log::debug!("Received job: {job}");
        let result = self.solve(&job);

        match result.nonce {
            Some(nonce) => {
                stats.solved += 1;
                log::debug!(
                    "Solved with nonce {} in {}us ({:.0} H/s)",
                    nonce,
                    result.elapsed_us,
                    result.hashrate()
                );
            }
            None => log::warn!("No nonce in 0..={} for job {}", job.max_nonce(), job),
        }

        result.to_line(self.config.separator)
    }

    fn solve(&self, job: &Job) -> JobResult {
        #[cfg(feature = "parallel")]
        {
            if self.config.search_threads() > 1 {
                return job.solve_parallel(&self.config.ducoid);
            }
        }

        job.solve(&self.config.ducoid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const LAST_HASH: &str = "ba29a15896fd2d792d5c4b60668bf2b9feebc51d";
    const EXPECTED: &str = "0b819a4ef1a1bb9f4bd83bd127eeadd562259ece";

    fn run_worker(input: &str, config: WorkerConfig) -> (WorkerStats, String) {
        let mut worker = Worker::new(Cursor::new(input.as_bytes()), Vec::new(), config);
        let stats = worker.run().unwrap();
        let output = String::from_utf8(worker.into_writer()).unwrap();
        (stats, output)
    }

    fn test_config() -> WorkerConfig {
        WorkerConfig {
            ducoid: "DUCOIDTEST".to_string(),
            ..WorkerConfig::default()
        }
    }

    #[test]
    fn test_solves_job_lines() {
        let input = format!("{LAST_HASH},{EXPECTED},6,\n");
        let (stats, output) = run_worker(&input, test_config());

        assert_eq!(
            stats,
            WorkerStats {
                jobs: 1,
                solved: 1,
                rejected: 0
            }
        );

        let fields: Vec<&str> = output.trim_end().split(',').collect();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0], "577");
        assert!(fields[1].parse::<u64>().is_ok());
        assert_eq!(fields[2], "DUCOIDTEST");
    }

    #[test]
    fn test_corrupted_and_unsolvable_lines() {
        let input = format!(
            "garbage\n\n{LAST_HASH},{EXPECTED},5,\n{LAST_HASH},{EXPECTED},6,\n"
        );
        let (stats, output) = run_worker(&input, test_config());

        assert_eq!(
            stats,
            WorkerStats {
                jobs: 3,
                solved: 1,
                rejected: 1
            }
        );

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "#");
        assert!(lines[1].starts_with("0,"));
        assert!(lines[2].starts_with("577,"));
    }

    #[test]
    fn test_corrupted_bytes_do_not_end_session() {
        let mut input = b"ba29\xff\xfe,zz,6,\n".to_vec();
        input.extend_from_slice(format!("{LAST_HASH},{EXPECTED},6,\n").as_bytes());

        let mut worker = Worker::new(Cursor::new(input), Vec::new(), test_config());
        let stats = worker.run().unwrap();
        let output = String::from_utf8(worker.into_writer()).unwrap();

        assert_eq!(
            stats,
            WorkerStats {
                jobs: 2,
                solved: 1,
                rejected: 1
            }
        );

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "#");
        assert!(lines[1].starts_with("577,"));
    }

    #[test]
    fn test_custom_separator() {
        let config = WorkerConfig {
            separator: ';',
            ..test_config()
        };
        let input = format!("{LAST_HASH};{EXPECTED};6;\n");
        let (stats, output) = run_worker(&input, config);

        assert_eq!(stats.solved, 1);
        assert!(output.starts_with("577;"));
        assert!(output.trim_end().ends_with(";DUCOIDTEST"));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_search_threads() {
        let config = WorkerConfig {
            threads: Some(4),
            ..test_config()
        };
        let input = format!("{LAST_HASH},{EXPECTED},6,\n");
        let (stats, output) = run_worker(&input, config);

        assert_eq!(stats.solved, 1);
        assert!(output.starts_with("577,"));
    }

    #[test]
    fn test_empty_input() {
        let (stats, output) = run_worker("", test_config());
        assert_eq!(stats, WorkerStats::default());
        assert!(output.is_empty());
    }
}
