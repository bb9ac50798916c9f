//! Diagnostic command-line tool for THZ/LWZ heat pumps

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use thzlink::core::transport::list_ports;
use thzlink::{ConnectionConfig, DeviceConfig, Session, SerialConfig, TcpConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "thz-cli")]
#[command(author, version, about = "Talk to a Stiebel Eltron / Tecalor THZ heat pump")]
struct Cli {
    /// Path to a device config TOML file
    #[arg(short, long, env = "THZ_CONFIG")]
    config: Option<PathBuf>,

    /// Serial port (overrides config)
    #[arg(short, long, env = "THZ_PORT")]
    port: Option<String>,

    /// Baud rate for the serial port
    #[arg(short, long, default_value_t = 115200)]
    baud: u32,

    /// TCP bridge host (overrides config and --port)
    #[arg(long)]
    host: Option<String>,

    /// TCP bridge port
    #[arg(long, default_value_t = 2000)]
    tcp_port: u16,

    /// Force a register map variant (e.g. 5.39technician)
    #[arg(long)]
    firmware: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable lines
    Text,
    /// JSON object
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the connection and report the detected firmware
    Probe,
    /// Read and decode one register
    Read {
        /// Register name (e.g. sGlobal)
        register: String,
    },
    /// Read and decode every register of the active map
    ReadAll,
    /// Dump raw payloads of every readable command
    Dump {
        /// Write the dump to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write a parameter
    Write {
        /// Parameter name (e.g. p75passiveCooling)
        name: String,
        /// Value in display units
        value: f64,
    },
    /// List registers and writable parameters of the active map
    Registers,
    /// List local serial ports
    ListPorts,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::ListPorts = cli.command {
        return list_serial_ports();
    }

    let config = build_config(&cli)?;
    let session = Session::connect(&config).context("connecting to the heat pump")?;

    match &cli.command {
        Commands::Probe => probe(&session, cli.format),
        Commands::Read { register } => read(&session, register, cli.format),
        Commands::ReadAll => read_all(&session, cli.format),
        Commands::Dump { output } => dump(&session, output.as_deref()),
        Commands::Write { name, value } => write(&session, name, *value),
        Commands::Registers => registers(&session),
        Commands::ListPorts => unreachable!(),
    }
}

/// Merge config file and connection flags; flags win
fn build_config(cli: &Cli) -> Result<DeviceConfig> {
    let mut config = match &cli.config {
        Some(path) => DeviceConfig::load(path)
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("loading {}", path.display()))?,
        None => DeviceConfig::default(),
    };

    if let Some(host) = &cli.host {
        config.connection = ConnectionConfig::Tcp(TcpConfig::new(host, cli.tcp_port));
    } else if let Some(port) = &cli.port {
        config.connection = ConnectionConfig::Serial(SerialConfig::new(port, cli.baud));
    }
    if cli.firmware.is_some() {
        config.firmware_override = cli.firmware.clone();
    }
    Ok(config)
}

fn probe(session: &Session, format: OutputFormat) -> Result<()> {
    let firmware = session.firmware();
    match format {
        OutputFormat::Text => {
            println!("firmware version: {}", firmware.version);
            println!("register map:     {}", firmware.variant);
            println!("registers:        {}", session.register_names().len());
        }
        OutputFormat::Json => {
            let out = serde_json::json!({
                "firmware": firmware.version,
                "variant": firmware.variant.name(),
                "registers": session.register_names(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

fn read(session: &Session, register: &str, format: OutputFormat) -> Result<()> {
    let reading = session
        .read_register(register)
        .with_context(|| format!("reading {register}"))?;
    print_reading(&reading, format)
}

fn read_all(session: &Session, format: OutputFormat) -> Result<()> {
    let reading = session.read_all().context("reading all registers")?;
    print_reading(&reading, format)
}

fn print_reading(reading: &thzlink::Reading, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for (name, value) in reading {
                println!("{name}: {value}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(reading)?),
    }
    Ok(())
}

fn dump(session: &Session, output: Option<&std::path::Path>) -> Result<()> {
    let raw = session.dump_raw().context("dumping registers")?;
    let out = serde_json::json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "firmware": session.firmware().version,
        "registers": raw,
    });
    let text = serde_json::to_string_pretty(&out)?;

    match output {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("dump written to {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn write(session: &Session, name: &str, value: f64) -> Result<()> {
    session
        .write_parameter(name, value)
        .with_context(|| format!("writing {name}"))?;
    println!("{name} set to {value}");
    Ok(())
}

fn registers(session: &Session) -> Result<()> {
    println!("readable registers ({}):", session.register_names().len());
    for info in session.map().registers() {
        let pair = match info.pair_command {
            Some(pair) => format!(" + {}", hex::encode_upper(pair)),
            None => String::new(),
        };
        println!(
            "  {:<20} cmd {}{pair} ({} fields)",
            info.name,
            hex::encode_upper(info.command),
            info.fields.len()
        );
    }

    let writes: Vec<_> = session.map().write_rules().collect();
    println!("writable parameters ({}):", writes.len());
    for rule in writes {
        println!(
            "  {:<28} cmd {} range {}..{}",
            rule.name,
            hex::encode_upper(rule.command),
            rule.min,
            rule.max
        );
    }
    Ok(())
}

fn list_serial_ports() -> Result<()> {
    let ports = list_ports().map_err(|e| anyhow::anyhow!("{e}"))?;
    if ports.is_empty() {
        bail!("no serial ports found");
    }
    for port in ports {
        println!("{}", port.port_name);
    }
    Ok(())
}
