use anyhow::bail;
use clap::{arg, App};
use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::commands::{output_from_args, size_args, size_from_args, Command};
use crate::heatmap::generate_map;
use crate::topo::decode;


pub struct Render {}

impl Command for Render {
    fn register(&self) -> App<'static> {
        let app = App::new("render")
            .about("Paint a stored topography payload (e.g. a cache file) as a heatmap.")
            .arg(arg!(-i --input <FILE> "Path to a griddap JSON payload"))
            .arg(arg!(-o --output <FILE> "Image file to write (.png or .bmp)"));

        size_args(app)
    }

    fn run(&self, args: &clap::ArgMatches) -> anyhow::Result<()> {
        let start = Instant::now();

        let input_path = Path::new(args.value_of("input").unwrap_or_default());
        if !input_path.is_file() {
            bail!("Couldn't find {}", input_path.display());
        }
        let (width, height) = size_from_args(args)?;
        let output_path = output_from_args(args)?;

        let now = Instant::now();
        println!("▶️  Loading {}", input_path.display());
        let samples = decode(&fs::read_to_string(input_path)?)?;
        println!(
            "✔️  Loaded {} samples in {}ms",
            samples.len(),
            now.elapsed().as_millis()
        );

        let now = Instant::now();
        println!("▶️  Rendering {}x{} heatmap", width, height);
        generate_map(&samples, width, height, &output_path)?;
        println!(
            "✔️  Wrote {} in {}ms",
            output_path.display(),
            now.elapsed().as_millis()
        );

        println!("\n    🎉  Finished in {}ms", start.elapsed().as_millis());

        Ok(())
    }
}
