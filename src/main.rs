use anyhow::Result;
use clap::Parser;

use image_squeeze::{
    cli::{execute_compress, execute_inspect, Cli, Commands, CompressCommandConfig},
    logging::init_logging,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Compress {
            inputs,
            quality,
            output,
            archive,
            recursive,
            config,
        } => {
            execute_compress(CompressCommandConfig {
                inputs,
                quality,
                output,
                archive,
                recursive,
                config_file: config,
            })
            .await
        }
        Commands::Inspect { inputs, recursive } => execute_inspect(inputs, recursive).await,
    };

    if let Err(error) = result {
        eprintln!("❌ エラー: {error:#}");
        std::process::exit(1);
    }

    Ok(())
}
