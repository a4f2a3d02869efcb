use std::process::ExitCode;

use clap::Parser;
use gateway_cli::{app, cli::Cli, configs, logger};

#[tokio::main]
#[allow(clippy::print_stdout, clippy::print_stderr)]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match configs::Config::new_with_config_path(cli.config.clone()) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Failed while parsing config: {error}");
            return ExitCode::FAILURE;
        }
    };

    let _guard = match logger::setup(
        &config.log,
        gateway_cli::service_name!(),
        [gateway_cli::service_name!()],
    ) {
        Ok(guard) => guard,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };

    match app::execute(cli, &config).await {
        Ok(Some(response)) => {
            match serde_json::to_string_pretty(&response) {
                Ok(json) => println!("{json}"),
                Err(error) => {
                    eprintln!("Failed while serializing the response: {error}");
                    return ExitCode::FAILURE;
                }
            }
            if response.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }
        Ok(None) => {
            println!("null");
            ExitCode::SUCCESS
        }
        Err(report) => {
            logger::error!(error = ?report, "gateway command failed");
            eprintln!("{report:?}");
            ExitCode::FAILURE
        }
    }
}
