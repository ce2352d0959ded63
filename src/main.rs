use clap::Parser;
use paging_sim::config::{Command, Config};
use std::process;

fn init_msg() {
    println!("image workload paging simulation");
}

fn main() {
    env_logger::init();
    init_msg();
    let config = Config::parse();
    config.display();
    config.validate();
    println!();
    let result = match config.command {
        Command::Generate {
            page_size,
            image,
            trace,
        } => paging_sim::run_generate(page_size, &image, &trace),
        Command::Simulate {
            frames,
            trace,
            policy,
            pacing_ms,
        } => paging_sim::run_simulate(frames, &trace, policy, pacing_ms),
        Command::Sobel { image, output } => paging_sim::run_sobel(&image, &output),
    };
    if let Err(e) = result {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
