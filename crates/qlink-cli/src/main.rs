//! qlink Command-Line Interface
//!
//! Drives a qlink link from a workstation. The device-side commands
//! (`measure`, `submit`, `status`, `result`, `wait`, `configure-ibm`) speak
//! the line protocol over a serial port exactly like a microcontroller would;
//! `serve` runs the host bridge that answers them.
//!
//! ```text
//!   qlink measure ─┐                          ┌─ qlink serve
//!   qlink submit  ─┼── serial line ── JSON ───┤   simulated backend
//!   qlink status  ─┘   one line each way      └─  token store
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{configure, measure, ports, result, serve, status, submit, version, wait};
use config::LinkConfig;

/// qlink - request quantum jobs over a serial line
#[derive(Parser)]
#[command(name = "qlink")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ~/.qlink/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Serial port (auto-detected when omitted)
    #[arg(short, long, global = true)]
    port: Option<String>,

    /// Baud rate
    #[arg(short, long, global = true)]
    baud: Option<u32>,

    /// Response timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an immediate measurement and print the bits
    Measure {
        /// Number of qubits to measure
        #[arg(default_value = "1")]
        qubits: u32,
    },

    /// Submit a job to the remote quantum service
    Submit {
        /// Number of qubits
        #[arg(default_value = "1")]
        qubits: u32,

        /// Wait for the job to finish and print its result
        #[arg(short, long)]
        wait: bool,
    },

    /// Query job status
    Status {
        /// Job ID
        job_id: String,
    },

    /// Retrieve the bits of a finished job
    Result {
        /// Job ID
        job_id: String,

        /// Number of qubits (caps how many bits are printed)
        #[arg(default_value = "1")]
        qubits: u32,
    },

    /// Poll a job until it finishes, then print its result
    Wait {
        /// Job ID
        job_id: String,

        /// Number of qubits (caps how many bits are printed)
        #[arg(short, long, default_value = "1")]
        qubits: u32,

        /// Seconds between status queries
        #[arg(short, long, default_value = "1")]
        interval: u64,

        /// Give up after this many seconds
        #[arg(short, long, default_value = "300")]
        timeout: u64,
    },

    /// Hand an IBM Quantum token to the host
    ConfigureIbm {
        /// API token
        #[arg(env = "QLINK_IBM_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Run the host bridge
    Serve {
        /// Answer requests on stdin/stdout instead of a serial port
        #[arg(long)]
        stdio: bool,

        /// Largest qubit count a job may request
        #[arg(long)]
        max_qubits: Option<u32>,

        /// Refuse remote jobs until a token is configured
        #[arg(long)]
        require_token: bool,
    },

    /// List serial ports
    Ports,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging; stdout may carry the link in `serve --stdio`
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Measure { qubits } => measure::execute(&config, qubits).await,

        Commands::Submit { qubits, wait } => submit::execute(&config, qubits, wait).await,

        Commands::Status { job_id } => status::execute(&config, &job_id).await,

        Commands::Result { job_id, qubits } => result::execute(&config, &job_id, qubits).await,

        Commands::Wait {
            job_id,
            qubits,
            interval,
            timeout,
        } => wait::execute(&config, &job_id, qubits, interval, timeout).await,

        Commands::ConfigureIbm { token } => configure::execute(&config, &token).await,

        Commands::Serve {
            stdio,
            max_qubits,
            require_token,
        } => {
            let mut config = config;
            if let Some(max_qubits) = max_qubits {
                config.bridge.max_qubits = max_qubits;
            }
            config.bridge.require_token |= require_token;
            serve::execute(&config, stdio).await
        }

        Commands::Ports => ports::execute(),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}

/// Load file and environment configuration, then apply global flags.
fn load_config(cli: &Cli) -> anyhow::Result<LinkConfig> {
    let mut config = LinkConfig::load(cli.config.as_deref())?;

    if let Some(ref port) = cli.port {
        config.serial.port = Some(port.clone());
    }
    if let Some(baud) = cli.baud {
        config.serial.baud_rate = baud;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.exchange.timeout_ms = timeout_ms;
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_defaults() {
        let cli = Cli::try_parse_from(["qlink", "measure"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(cli.port.is_none());
        match cli.command {
            Commands::Measure { qubits } => assert_eq!(qubits, 1),
            _ => panic!("Expected Measure"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "qlink",
            "measure",
            "4",
            "--port",
            "/dev/ttyUSB1",
            "--baud",
            "115200",
            "--timeout-ms",
            "250",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.port.as_deref(), Some("/dev/ttyUSB1"));
        assert_eq!(cli.baud, Some(115_200));
        assert_eq!(cli.timeout_ms, Some(250));
        match cli.command {
            Commands::Measure { qubits } => assert_eq!(qubits, 4),
            _ => panic!("Expected Measure"),
        }
    }

    #[test]
    fn test_submit_with_wait() {
        let cli = Cli::try_parse_from(["qlink", "submit", "3", "--wait"]).unwrap();
        match cli.command {
            Commands::Submit { qubits, wait } => {
                assert_eq!(qubits, 3);
                assert!(wait);
            }
            _ => panic!("Expected Submit"),
        }
    }

    #[test]
    fn test_status_requires_job_id() {
        assert!(Cli::try_parse_from(["qlink", "status"]).is_err());
        let cli = Cli::try_parse_from(["qlink", "status", "job-1"]).unwrap();
        match cli.command {
            Commands::Status { job_id } => assert_eq!(job_id, "job-1"),
            _ => panic!("Expected Status"),
        }
    }

    #[test]
    fn test_result_qubits() {
        let cli = Cli::try_parse_from(["qlink", "result", "job-1", "5"]).unwrap();
        match cli.command {
            Commands::Result { job_id, qubits } => {
                assert_eq!(job_id, "job-1");
                assert_eq!(qubits, 5);
            }
            _ => panic!("Expected Result"),
        }
    }

    #[test]
    fn test_wait_defaults() {
        let cli = Cli::try_parse_from(["qlink", "wait", "job-1"]).unwrap();
        match cli.command {
            Commands::Wait {
                interval, timeout, ..
            } => {
                assert_eq!(interval, 1);
                assert_eq!(timeout, 300);
            }
            _ => panic!("Expected Wait"),
        }
    }

    #[test]
    fn test_configure_ibm_token_argument() {
        let cli = Cli::try_parse_from(["qlink", "configure-ibm", "abc123"]).unwrap();
        match cli.command {
            Commands::ConfigureIbm { token } => assert_eq!(token, "abc123"),
            _ => panic!("Expected ConfigureIbm"),
        }
    }

    #[test]
    fn test_serve_flags() {
        let cli = Cli::try_parse_from([
            "qlink",
            "serve",
            "--stdio",
            "--max-qubits",
            "8",
            "--require-token",
        ])
        .unwrap();
        match cli.command {
            Commands::Serve {
                stdio,
                max_qubits,
                require_token,
            } => {
                assert!(stdio);
                assert_eq!(max_qubits, Some(8));
                assert!(require_token);
            }
            _ => panic!("Expected Serve"),
        }
    }

    #[test]
    fn test_unknown_subcommand() {
        assert!(Cli::try_parse_from(["qlink", "teleport"]).is_err());
    }

    #[test]
    fn test_ports_and_version() {
        assert!(matches!(
            Cli::try_parse_from(["qlink", "ports"]).unwrap().command,
            Commands::Ports
        ));
        assert!(matches!(
            Cli::try_parse_from(["qlink", "version"]).unwrap().command,
            Commands::Version
        ));
    }
}
