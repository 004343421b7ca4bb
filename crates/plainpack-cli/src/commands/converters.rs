//! Converters command - list registered converters

use console::style;
use miette::Result;
use plainpack_convert::Pipeline;

pub fn run() -> Result<()> {
    let pipeline = Pipeline::with_defaults();

    println!();
    println!(
        "  {}",
        style(format!("{:<16} {:<10} KINDS", "NAME", "PRIORITY")).bold()
    );
    for converter in pipeline.converters() {
        println!(
            "  {:<16} {:<10} {}",
            converter.name(),
            converter.priority(),
            converter.kinds().join(", ")
        );
    }
    println!();

    Ok(())
}
