use alloy::primitives::{Address, U256};
use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

use devon_rex::recovery::SignatureVerifier;
use devon_rex::signing::Wallet;

#[derive(Parser)]
#[command(name = "devon-cli")]
#[command(about = "Client for the DevonRex token node", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8545")]
    url: String,

    /// Bearer key for mutating or admin routes.
    #[arg(short, long)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign an emergency transfer with the backup key from DEVON_REX_PRIVATE_KEY
    Sign {
        #[arg(long)]
        from: Address,
        #[arg(long)]
        to: Address,
        /// Absolute deadline in unix seconds
        #[arg(long, conflicts_with = "ttl_secs")]
        deadline: Option<u64>,
        /// Deadline relative to now
        #[arg(long, default_value_t = 3600)]
        ttl_secs: u64,
        #[arg(long, default_value_t = 31337)]
        chain_id: u64,
        #[arg(long, default_value = "0x5FbDB2315678afecb367f032d93F642f64180aa3")]
        contract: Address,
        #[arg(long, default_value = "DevonRexBackup")]
        domain_name: String,
        #[arg(long, default_value = "1")]
        domain_version: String,
    },
    /// Show balance, backup and blacklist state of an account
    Account { address: Address },
    /// Show token metadata and signing domain
    Token,
    /// Submit a signed emergency transfer
    Relay {
        #[arg(long)]
        signature: String,
        #[arg(long)]
        from: Address,
        #[arg(long)]
        to: Address,
        #[arg(long)]
        deadline: u64,
    },
    /// Check node status (admin)
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(key) = &cli.key {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", key))?,
        );
    }

    match cli.command {
        Commands::Sign {
            from,
            to,
            deadline,
            ttl_secs,
            chain_id,
            contract,
            domain_name,
            domain_version,
        } => {
            let wallet = Wallet::from_env()?;
            let deadline = match deadline {
                Some(d) => d,
                None => SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() + ttl_secs,
            };
            let verifier = SignatureVerifier::new(domain_name, domain_version, chain_id, contract);
            let signature =
                wallet.sign_emergency_transfer(&verifier, from, to, U256::from(deadline))?;

            let out = json!({
                "signer": wallet.address(),
                "from": from,
                "to": to,
                "deadline": deadline,
                "signature": signature.to_string(),
                "v": signature.v,
                "r": signature.r,
                "s": signature.s,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Account { address } => {
            let res = client
                .get(format!("{}/v1/accounts/{}", cli.url, address))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Token => {
            let res = client.get(format!("{}/v1/token", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Relay {
            signature,
            from,
            to,
            deadline,
        } => {
            let res = client
                .post(format!("{}/v1/emergency-transfer", cli.url))
                .headers(headers)
                .json(&json!({
                    "signature": signature,
                    "from": from,
                    "to": to,
                    "deadline": deadline.to_string(),
                }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Status => {
            let res = client
                .get(format!("{}/admin/status", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: node returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
