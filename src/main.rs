//! DUCO SHA-1 CLI
//!
//! A command-line tool around the streaming SHA-1 engine used by Duino-Coin
//! mining boards.
//!
//! # Commands
//!
//! - `hash` - SHA-1 of a string, hex bytes or a file
//! - `hmac` - HMAC-SHA1 of a string or hex bytes
//! - `solve` - Solve a single DUCO-S1 job
//! - `worker` - Answer DUCO-S1 job lines from stdin on stdout
//! - `init-config` - Write a config file with a fresh board identifier
//! - `benchmark` - Run performance benchmark

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use duco::algorithm::{ducos1, BLOCK_LENGTH, HASH_LENGTH};
use duco::config::{default_config_path, WorkerConfig};
use duco::job::Job;
use duco::worker::Worker;
use duco::{sha1, Sha1};

#[derive(Parser)]
#[command(name = "duco-sha1")]
#[command(author = "Duino-Coin Community")]
#[command(version = "0.1.0")]
#[command(about = "Streaming SHA-1 engine and DUCO-S1 job worker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Custom config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Board identifier override
    #[arg(long, global = true)]
    ducoid: Option<String>,

    /// Search threads per job (default: from config, or all cores for `solve`)
    #[arg(short, long, global = true)]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the SHA-1 digest of the input
    Hash {
        /// Input text (or hex with --hex)
        input: Option<String>,

        /// Treat the input as hex-encoded bytes
        #[arg(long)]
        hex: bool,

        /// Hash the contents of a file instead
        #[arg(long, conflicts_with = "input")]
        file: Option<PathBuf>,
    },

    /// Compute the HMAC-SHA1 of the input
    Hmac {
        /// HMAC key (or hex with --key-hex)
        #[arg(long)]
        key: String,

        /// Treat the key as hex-encoded bytes
        #[arg(long)]
        key_hex: bool,

        /// Message text (or hex with --hex)
        input: String,

        /// Treat the message as hex-encoded bytes
        #[arg(long)]
        hex: bool,
    },

    /// Solve one DUCO-S1 job
    Solve {
        /// Previous block hash
        last_hash: String,

        /// Expected result hash (40 hex characters)
        expected_hash: String,

        /// Job difficulty (nonces 0..=difficulty*100)
        difficulty: u32,
    },

    /// Read job lines from stdin and write result lines to stdout
    Worker,

    /// Write a config file with a freshly generated board identifier
    InitConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of jobs to solve
        #[arg(short, long, default_value = "100")]
        count: u32,

        /// Difficulty of each job (every job runs its full nonce range)
        #[arg(short, long, default_value = "6")]
        difficulty: u32,
    },
}

fn main() {
    pretty_env_logger::formatted_builder()
        .parse_filters(&std::env::var("RUST_LOG").unwrap_or("warn".to_string()))
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    let result = match cli.command {
        Commands::Hash { input, hex, file } => cmd_hash(input, hex, file),
        Commands::Hmac {
            key,
            key_hex,
            input,
            hex,
        } => cmd_hmac(&key, key_hex, &input, hex),
        Commands::Solve {
            last_hash,
            expected_hash,
            difficulty,
        } => build_worker_config(&config_path, cli.ducoid, cli.threads).and_then(|config| {
            cmd_solve(&last_hash, &expected_hash, difficulty, cli.threads, &config)
        }),
        Commands::Worker => {
            build_worker_config(&config_path, cli.ducoid, cli.threads).and_then(cmd_worker)
        }
        Commands::InitConfig { force } => cmd_init_config(&config_path, cli.ducoid, force),
        Commands::Benchmark { count, difficulty } => cmd_benchmark(count, difficulty),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Load the worker config and apply CLI overrides
fn build_worker_config(
    path: &Path,
    ducoid: Option<String>,
    threads: Option<usize>,
) -> anyhow::Result<WorkerConfig> {
    let mut config = WorkerConfig::load_or_default(path)?;
    if let Some(id) = ducoid {
        config.ducoid = id;
    }
    if let Some(n) = threads {
        config.threads = Some(n);
    }
    Ok(config)
}

/// Decode CLI input as hex or take it as UTF-8 bytes
fn decode_input(input: &str, is_hex: bool) -> anyhow::Result<Vec<u8>> {
    if is_hex {
        Ok(hex::decode(input)?)
    } else {
        Ok(input.as_bytes().to_vec())
    }
}

/// Run `f` inside a rayon pool of `threads` workers
fn with_search_pool<T: Send>(
    threads: usize,
    f: impl FnOnce() -> T + Send,
) -> anyhow::Result<T> {
    #[cfg(feature = "parallel")]
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?;
        Ok(pool.install(f))
    }

    #[cfg(not(feature = "parallel"))]
    {
        let _ = threads;
        Ok(f())
    }
}

fn cmd_hash(input: Option<String>, is_hex: bool, file: Option<PathBuf>) -> anyhow::Result<()> {
    let mut hasher = Sha1::new();

    if let Some(path) = file {
        let mut file = File::open(&path)?;
        let copied = io::copy(&mut file, &mut hasher)?;
        log::debug!("Hashed {} bytes from {}", copied, path.display());
    } else {
        let Some(input) = input else {
            anyhow::bail!("Provide an input string or --file");
        };
        hasher.write_bytes(&decode_input(&input, is_hex)?);
    }

    println!("{}", hex::encode(hasher.result()));
    Ok(())
}

fn cmd_hmac(key: &str, key_hex: bool, input: &str, is_hex: bool) -> anyhow::Result<()> {
    let key = decode_input(key, key_hex)?;
    let message = decode_input(input, is_hex)?;

    if key.len() > BLOCK_LENGTH {
        log::debug!(
            "Key is {} bytes, longer than one block; hashing it first",
            key.len()
        );
    }

    let mut hasher = Sha1::new();
    hasher.init_hmac(&key);
    hasher.write_bytes(&message);

    println!("{}", hex::encode(hasher.result_hmac()));
    Ok(())
}

fn cmd_solve(
    last_hash: &str,
    expected_hash: &str,
    difficulty: u32,
    threads: Option<usize>,
    config: &WorkerConfig,
) -> anyhow::Result<()> {
    let job = Job::new(last_hash, expected_hash, difficulty)?;
    let num_threads = threads.unwrap_or_else(num_cpus::get).max(1);

    println!("\n=== DUCO-S1 Job ===");
    println!("Last hash:  {}", job.last_hash);
    println!("Expected:   {}", hex::encode(job.expected_hash));
    println!("Difficulty: {} (nonces 0..={})", job.difficulty, job.max_nonce());
    println!("Threads:    {}", num_threads);
    println!("===================\n");

    #[cfg(feature = "parallel")]
    let result = if num_threads > 1 {
        with_search_pool(num_threads, || job.solve_parallel(&config.ducoid))?
    } else {
        job.solve(&config.ducoid)
    };
    #[cfg(not(feature = "parallel"))]
    let result = job.solve(&config.ducoid);

    match result.nonce {
        Some(nonce) => {
            println!("Found nonce!");
            println!("  Nonce:    {}", nonce);
            println!("  Time:     {}us", result.elapsed_us);
            println!("  Hashrate: {:.0} H/s", result.hashrate());
            println!("\nResult line: {}", result.to_line(config.separator));
        }
        None => {
            anyhow::bail!(
                "No nonce in 0..={} produces the expected hash",
                job.max_nonce()
            );
        }
    }

    Ok(())
}

fn cmd_worker(config: WorkerConfig) -> anyhow::Result<()> {
    let threads = config.search_threads();
    log::info!(
        "Worker {} ready (separator {:?}, {} search threads)",
        config.ducoid,
        config.separator,
        threads
    );

    let stats = with_search_pool(threads, move || {
        let stdin = io::stdin();
        let stdout = io::stdout();
        Worker::new(stdin.lock(), stdout.lock(), config).run()
    })??;

    eprintln!(
        "Jobs: {} | Solved: {} | Rejected: {}",
        stats.jobs, stats.solved, stats.rejected
    );
    Ok(())
}

fn cmd_init_config(path: &Path, ducoid: Option<String>, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Use --force to replace it.",
            path.display()
        );
    }

    let mut config = WorkerConfig::generate()?;
    if let Some(id) = ducoid {
        config.ducoid = id;
    }
    config.save_to_file(path)?;

    println!("Config created!");
    println!("DUCOID: {}", config.ducoid);
    println!("Saved to: {}", path.display());

    Ok(())
}

fn cmd_benchmark(count: u32, difficulty: u32) -> anyhow::Result<()> {
    println!(
        "Running benchmark with {} jobs at difficulty {}...",
        count, difficulty
    );

    let max_nonce = ducos1::max_nonce(difficulty);
    let jobs: Vec<Job> = (0..count)
        .map(|i| {
            let last_hash = hex::encode(sha1(&i.to_le_bytes()));
            let expected_hash = ducos1::job_digest(last_hash.as_bytes(), max_nonce);
            Job {
                last_hash,
                expected_hash,
                difficulty,
            }
        })
        .collect();

    let start = Instant::now();
    for job in &jobs {
        let result = job.solve("DUCOIDBENCH");
        if result.nonce != Some(max_nonce) {
            anyhow::bail!("Benchmark job {} solved incorrectly", job.last_hash);
        }
    }
    let elapsed = start.elapsed();

    let total_hashes = u64::from(count) * (u64::from(max_nonce) + 1);
    let hashrate = total_hashes as f64 / elapsed.as_secs_f64();

    println!("\nResults:");
    println!("  Total hashes: {}", total_hashes);
    println!("  Time elapsed: {:.2}s", elapsed.as_secs_f64());
    println!("  Hashrate: {:.2} H/s", hashrate);

    // Memory info
    println!("\nEngine parameters:");
    println!("  Hasher size: {} bytes", std::mem::size_of::<Sha1>());
    println!("  Block size: {} bytes", BLOCK_LENGTH);
    println!("  Digest size: {} bytes", HASH_LENGTH);
    println!(
        "  Debug assertions: {}",
        if cfg!(debug_assertions) { "on" } else { "off" }
    );

    Ok(())
}
