/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */
use std::error::Error;
use std::path::PathBuf;
use std::time;

use aws_sdk_s3::error::DisplayErrorContext;
use clap::Parser;
use file_access_repository::{BackendFactory, StorageBackend};

type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Debug, Clone, clap::Parser)]
#[command(name = "transfer")]
#[command(about = "Moves a file between a local path and the configured storage backend.")]
pub struct Args {
    /// Storage type to use instead of STORAGE_TYPE <local | minio>
    #[arg(long)]
    storage_type: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::Subcommand)]
enum Command {
    /// Retrieve FILE_TYPE/FILE_NAME into PATH
    Get {
        file_type: String,
        file_name: String,
        path: PathBuf,
    },
    /// Store PATH as FILE_TYPE/FILE_NAME
    Put {
        path: PathBuf,
        file_type: String,
        file_name: String,
    },
    /// Delete FILE_TYPE/FILE_NAME
    Delete {
        file_type: String,
        file_name: String,
    },
}

fn run(args: Args) -> Result<(), BoxError> {
    let backend = BackendFactory::from_env(args.storage_type.as_deref())?;

    let start = time::Instant::now();
    match &args.command {
        Command::Get {
            file_type,
            file_name,
            path,
        } => backend.get_file(file_type, file_name, path)?,
        Command::Put {
            path,
            file_type,
            file_name,
        } => backend.put_file(file_type, file_name, path)?,
        Command::Delete {
            file_type,
            file_name,
        } => backend.delete_file(file_type, file_name)?,
    }

    println!(
        "{:?} using {} backend completed in {:?}",
        args.command,
        backend.backend_type(),
        start.elapsed()
    );
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_thread_ids(true)
        .init();

    if let Err(err) = run(Args::parse()) {
        tracing::error!("transfer failed: {}", DisplayErrorContext(err.as_ref()));
        std::process::exit(1);
    }
}
