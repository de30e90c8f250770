use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "asp", version, about = "Used-device average selling price estimator")]
pub struct Cli {
    /// Directory holding default.toml and its overrides
    #[arg(short, long, default_value = "config", global = true)]
    pub config_dir: PathBuf,

    /// Dataset file, overriding `dataset.path` from configuration
    #[arg(short, long, env = "ASP_DATASET", global = true)]
    pub dataset: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List device types found in the dataset
    Types,

    /// List canonical manufacturers
    Makes,

    /// List models for a manufacturer
    Models {
        #[arg(long)]
        make: String,

        /// Device type; omit to list every type
        #[arg(long = "type", default_value = "")]
        device_type: String,
    },

    /// List processor buckets recorded for a model
    Cpus {
        #[arg(long)]
        make: String,

        #[arg(long)]
        model: String,
    },

    /// Show the memory, drive and grade choices
    Options,

    /// Estimate the selling price of a device
    Estimate {
        #[arg(long = "type")]
        device_type: String,

        #[arg(long)]
        make: String,

        #[arg(long)]
        model: String,

        /// Raw processor description, e.g. "i5-8250U"
        #[arg(long, default_value = "")]
        cpu: String,

        /// 4GB, 8GB, 16GB, 32GB or 64GB
        #[arg(long, default_value = "")]
        ram: String,

        /// 128GB, 256GB, 512GB, 1TB or 2TB
        #[arg(long, default_value = "")]
        hdd: String,

        /// A, B, C or F
        #[arg(long, default_value = "")]
        grade: String,

        /// Print how the price was built up
        #[arg(long)]
        explain: bool,

        /// Emit JSON instead of text
        #[arg(long, conflicts_with = "explain")]
        json: bool,
    },
}
