use ledger_validator::{
    config::Config, graph::BlockData, pegin::TipHeightOracle, validation::Validator,
    vm::FlatCostExecutor,
};
use std::sync::Arc;
use tracing::{error, info};

/// The main entry point for the validator.
///
/// Loads the configuration, builds one shared `Validator` and checks every
/// configured block file concurrently. Exits with an error if any block is
/// rejected.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/default.toml".to_string());
    let config = Config::load(&path)?;
    info!("Validator starting with config: {:?}", config);

    let params = Arc::new(config.consensus_params());
    let executor = Arc::new(FlatCostExecutor {
        cost: config.validation.program_cost,
    });
    let oracle = Arc::new(TipHeightOracle {
        tip_height: config.mainchain.tip_height,
    });
    let validator = Validator::new(params, executor).with_oracle(oracle);

    let mut handles = Vec::new();
    for file in config.validation.block_files.iter().cloned() {
        let validator = validator.clone();
        handles.push((file.clone(), tokio::spawn(validate_file(validator, file))));
    }

    let mut rejected = 0;
    for (file, handle) in handles {
        if let Err(e) = handle.await? {
            error!("Block file {} rejected: {:#}", file, e);
            rejected += 1;
        }
    }

    if rejected > 0 {
        anyhow::bail!("{} of {} block file(s) rejected", rejected, config.validation.block_files.len());
    }
    info!("All {} block file(s) valid", config.validation.block_files.len());
    Ok(())
}

/// Read one JSON block file and validate it off the async runtime
async fn validate_file(validator: Validator, path: String) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(&path).await?;
    let data: BlockData = serde_json::from_str(&content)?;
    let block = data.into_block();
    let height = block.header.height;

    let outcome = tokio::task::spawn_blocking(move || validator.validate_block(&block)).await??;

    info!(
        "Block {} from {}: {} transaction(s), {} failed, gas used {}, fees {}",
        height,
        path,
        outcome.transactions.len(),
        outcome.failed_transactions().count(),
        outcome.gas_used,
        outcome.fees
    );
    Ok(())
}
