use crate::cli::commands::{Cli, Commands};
use anyhow::{Context, Result, bail};
use humanizer::Config;
use humanizer::gateway;
use humanizer::pipeline::{ConversionRequest, Pipeline};
use std::io::Read;

fn read_text(text: Option<String>) -> Result<String> {
    match text {
        Some(text) if text != "-" => Ok(text),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read text from stdin")?;
            Ok(buffer)
        }
    }
}

pub async fn dispatch(cli: Cli, mut config: Config) -> Result<()> {
    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.gateway.host = host;
            }
            if let Some(port) = port {
                config.gateway.port = port;
            }
            gateway::run_gateway(config).await
        }
        Commands::Convert {
            tone,
            no_detection,
            no_plagiarism,
            allow_rewording,
            text,
        } => {
            let text = read_text(text)?;
            if text.trim().is_empty() {
                bail!("no text given: pass it as an argument or pipe it on stdin");
            }
            let request = ConversionRequest {
                text,
                tone,
                preserve_meaning: !allow_rewording,
                check_plagiarism: !no_plagiarism,
                check_ai_detection: !no_detection,
            };
            let pipeline = Pipeline::from_config(&config);
            let response = pipeline.convert(&request).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
    }
}
