// ABOUTME: Server binary for the Pierre Coach chat backend
// ABOUTME: Loads env configuration, indexes the corpus, and serves the HTTP API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Pierre Coach Server Binary
//!
//! Command-line flags override the matching environment variables.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use pierre_coach::{config::ServerConfig, logging, resources::ServerResources, server};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "pierre-coach-server")]
#[command(about = "Pierre Coach - retrieval-grounded beginner fitness chat backend")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override bind address
    #[arg(long)]
    host: Option<String>,

    /// Override the corpus directory
    #[arg(long)]
    knowledge_base: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http.port = http_port;
    }
    if let Some(host) = args.host {
        config.http.host = host;
    }
    if let Some(path) = args.knowledge_base {
        config.retrieval.knowledge_base_path = path;
    }

    logging::init_from_env()?;

    info!("Starting Pierre Coach");
    info!("{}", config.summary());

    let resources = Arc::new(ServerResources::from_config(config).await);
    info!(
        "Generation backend: {} ({})",
        resources.pipeline.generator().provider_name(),
        resources.pipeline.generator().model_name()
    );

    if let Err(e) = server::serve(resources).await {
        error!("Server error: {e:#}");
        return Err(e);
    }

    Ok(())
}
