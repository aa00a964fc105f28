use std::{error::Error, fs, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use pretty_hex::PrettyHex;
use tspreq::{nonce::random_nonce, AlgorithmIdentifier, Request};

#[derive(Parser)]
#[command(name = "tspreq")]
#[command(about = "Create and inspect RFC 3161 time-stamp requests", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a DER time-stamp request from a digest
    Create(CreateArgs),
    /// Decode a DER time-stamp request and print its fields
    Inspect(InspectArgs),
}

#[derive(Args)]
struct CreateArgs {
    /// Hex-encoded message digest
    #[arg(short, long)]
    digest: String,

    /// Hash algorithm name (sha256, SHA-384, ...) or dotted OID
    #[arg(short, long, default_value = "sha256")]
    algorithm: String,

    /// Hex-encoded nonce
    #[arg(long, conflicts_with = "random_nonce")]
    nonce: Option<String>,

    /// Generate a random 64-bit nonce
    #[arg(long)]
    random_nonce: bool,

    /// Requested TSA policy OID
    #[arg(short, long)]
    policy: Option<String>,

    /// Ask the TSA to include its certificate in the response
    #[arg(short, long)]
    cert_req: bool,

    /// Request version
    #[arg(long, default_value_t = 1)]
    req_version: u64,

    /// Output file; a hex dump is printed when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct InspectArgs {
    /// Path to a DER time-stamp request
    file: PathBuf,

    /// Also print a hex dump of the request
    #[arg(long)]
    dump: bool,
}

fn create(args: CreateArgs) -> Result<(), Box<dyn Error>> {
    let algorithm = AlgorithmIdentifier::lookup(&args.algorithm)?;
    let digest = hex::decode(args.digest.trim())?;
    let nonce = match (args.nonce, args.random_nonce) {
        (Some(nonce), _) => Some(hex::decode(nonce.trim())?),
        (None, true) => Some(random_nonce()),
        (None, false) => None,
    };

    let req = Request::from_algorithm_identifier(
        digest,
        Some(&algorithm),
        nonce,
        args.policy,
        args.cert_req,
        args.req_version,
    )?;
    let der = req.encode()?;

    match args.output {
        Some(path) => {
            fs::write(&path, &der)?;
            log::info!("wrote {} bytes to {}", der.len(), path.display());
        }
        None => println!("{:?}", der.hex_dump()),
    }

    Ok(())
}

fn inspect(args: InspectArgs) -> Result<(), Box<dyn Error>> {
    let der = fs::read(&args.file)?;
    let req = Request::decode(&der)?;

    println!("{}", req);
    if args.dump {
        println!();
        println!("{:?}", der.hex_dump());
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Create(args) => create(args),
        Commands::Inspect(args) => inspect(args),
    }
}
