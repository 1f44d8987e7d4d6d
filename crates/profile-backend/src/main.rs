#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![deny(unused_features)]
#![warn(unused_crate_dependencies)]

pub mod args;

use std::process::ExitCode;

use config::{args::AppMode, get_config};
use error_stack::ResultExt;
use server::{ProfileServer, api_doc::ApiDoc};

#[derive(thiserror::Error, Debug)]
enum ServerError {
    #[error("Tokio runtime creation failed")]
    Runtime,
}

fn main() -> ExitCode {
    let args = args::get_config();

    if let Some(AppMode::OpenApi) = args.mode {
        return match ApiDoc::open_api_json_string() {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{:?}", e);
                ExitCode::FAILURE
            }
        };
    }

    let config = match get_config(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{:?}", e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Runtime::new().change_context(ServerError::Runtime) {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{:?}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(async { ProfileServer::new(config).run().await }) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}
