use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use actix_web::{web, App, HttpServer};
use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;
use serde::Serialize;

mod bounds;
mod config;
mod coverage;
mod dataset;
mod error;
mod location;
mod manager;
mod model;
mod nearest;
mod network;
mod operator;
mod region;
mod service;

use location::QueryPoint;
use manager::TowerManager;

#[derive(Debug, Parser)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve coverage lookups over HTTP
    Serve { port: Option<u16> },
    /// Print the coverage report for a single location
    Lookup {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
    },
    /// Print tower counts per operator
    Stats,
}

#[derive(Serialize)]
struct Stats {
    total_towers: usize,
    total_operators: usize,
    towers_per_operator: BTreeMap<String, usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let path = match cli.config.as_deref() {
        Some(x) => x,
        None => Path::new("config.toml"),
    };
    let config = config::load(path)?;

    let dataset = config.load_dataset()?;
    let manager = TowerManager::new(dataset, config.settings()?)?;

    match cli.command {
        Command::Serve { port } => {
            let port = port.unwrap_or(config.http_port);
            let manager = web::Data::new(manager);
            info!("listening on port {port}");
            HttpServer::new(move || {
                App::new()
                    .app_data(manager.clone())
                    .service(service::service)
            })
            .bind(("0.0.0.0", port))?
            .run()
            .await?;
        }

        Command::Lookup {
            latitude,
            longitude,
        } => {
            let query = QueryPoint::new(latitude, longitude)?;
            let report = manager.location_coverage(&query)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Command::Stats => {
            let mut counts = BTreeMap::new();
            for (_, record) in manager.dataset().rows() {
                *counts.entry(record.operator).or_insert(0_usize) += 1;
            }
            let operators = &manager.settings().operators;
            let towers_per_operator = counts
                .into_iter()
                .map(|(code, count)| (operators.label(code).into_owned(), count))
                .collect();
            let stats = Stats {
                total_towers: manager.dataset().len(),
                total_operators: manager.dataset().operators().len(),
                towers_per_operator,
            };
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    };

    Ok(())
}
