use crate::policy::PolicyKind;
use clap::{Parser, Subcommand};
use std::env;
use std::process;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Derive a page-reference trace from a bitmap image's pixel layout.
    Generate {
        /// Page size in bytes.
        #[arg(long)]
        page_size: u64,

        /// Image base name; '<image>.bmp' is read.
        #[arg(long)]
        image: String,

        #[arg(long, default_value_t = env_or_default_str("SIM_FILE_TRACE", "references.txt"))]
        trace: String,
    },
    /// Replay a trace artifact through the resident-frame pool.
    Simulate {
        /// Number of resident frames in the pool.
        #[arg(long)]
        frames: usize,

        #[arg(long, default_value_t = env_or_default_str("SIM_FILE_TRACE", "references.txt"))]
        trace: String,

        /// Eviction strategy governing the pool.
        #[arg(long, value_enum, default_value_t = PolicyKind::Fifo)]
        policy: PolicyKind,

        /// Artificial delay between references, in milliseconds.
        #[arg(long)]
        pacing_ms: Option<u64>,
    },
    /// Apply the Sobel edge filter to a bitmap image.
    Sobel {
        /// Image base name; '<image>.bmp' is read.
        #[arg(long)]
        image: String,

        /// Output base name; '<output>.bmp' is written.
        #[arg(long)]
        output: String,
    },
}

impl Config {
    pub fn validate(&self) {
        match &self.command {
            Command::Generate { page_size, .. } if *page_size == 0 => {
                eprintln!("'page_size' must be a non-zero value");
                process::exit(1);
            }
            Command::Simulate { frames, .. } if *frames == 0 => {
                eprintln!("'frames' must be a non-zero value");
                process::exit(1);
            }
            _ => {}
        }
    }

    pub fn display(&self) {
        println!("simulation configuration values: ");
        println!("{:#?}", self);
    }
}

fn env_or_default_str(varname: &str, default: &str) -> String {
    match env::var(varname) {
        Ok(val) => val,
        _ => String::from(default),
    }
}
