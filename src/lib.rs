pub mod bitmap;
pub mod config;
pub mod error;
pub mod policy;
pub mod simulator;
pub mod sobel;
pub mod stattrack;
pub mod table;
pub mod trace;

use bitmap::Bitmap;
use error::Result;
use policy::PolicyKind;
use simulator::Simulation;
use std::path::PathBuf;
use std::time::Duration;
use table::PageTable;
use trace::TraceGenerator;

/// Read `<image>.bmp` and persist the page-reference trace derived from its dimensions.
pub fn run_generate(page_size: u64, image: &str, trace: &str) -> Result<()> {
    let image = Bitmap::read(&bmp_path(image))?;
    let generator = TraceGenerator::build(image.width(), image.height(), page_size);
    let header = generator.write_file(&PathBuf::from(trace))?;
    println!(
        "trace artifact written to '{}': {} references over {} pages",
        trace, header.references, header.pages
    );
    Ok(())
}

/// Load a trace artifact and replay it through a pool of `frames` resident frames governed by
/// the selected eviction policy, printing the final summary.
pub fn run_simulate(
    frames: usize,
    trace: &str,
    policy: PolicyKind,
    pacing_ms: Option<u64>,
) -> Result<()> {
    let (header, references) = trace::load_trace(&PathBuf::from(trace))?;
    let table = PageTable::build(header.pages);
    let simulation = Simulation::build(
        references,
        table,
        policy.build(frames),
        pacing_ms.map(Duration::from_millis),
    );
    println!("{}", simulation.run());
    Ok(())
}

/// Read `<image>.bmp`, apply the Sobel edge filter, and write `<output>.bmp`.
pub fn run_sobel(image: &str, output: &str) -> Result<()> {
    let source = Bitmap::read(&bmp_path(image))?;
    let filtered = sobel::apply_sobel(&source);
    let path = bmp_path(output);
    filtered.write(&path)?;
    println!("filtered image written to '{}'", path.display());
    Ok(())
}

fn bmp_path(base: &str) -> PathBuf {
    PathBuf::from(format!("{}.bmp", base))
}
