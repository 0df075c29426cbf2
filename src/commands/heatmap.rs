use clap::{arg, App};
use std::time::Instant;

use crate::commands::{bbox_args, config_from_args, output_from_args, query_from_args, service_args, size_args, size_from_args, Command};
use crate::heatmap::generate_map;
use crate::topo::{ErddapClient, FileStore, TopoSource};


pub struct Heatmap {}

impl Command for Heatmap {
    fn register(&self) -> App<'static> {
        let app = App::new("heatmap")
            .about("Fetch (or reuse cached) topography for a bounding box and paint it as a heatmap.")
            .arg(arg!(-o --output <FILE> "Image file to write (.png or .bmp)"));

        service_args(size_args(bbox_args(app)))
    }

    fn run(&self, args: &clap::ArgMatches) -> anyhow::Result<()> {
        let start = Instant::now();

        let query = query_from_args(args)?;
        let (width, height) = size_from_args(args)?;
        let output_path = output_from_args(args)?;
        let config = config_from_args(args)?;

        let source = TopoSource::new(
            ErddapClient::new(&config)?,
            FileStore::new(&config.cache_dir),
            config.cell_degrees,
        );

        let now = Instant::now();
        println!("▶️  Loading topography");
        let samples = source.load_cache_or_fetch(&query, width, height)?;
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
