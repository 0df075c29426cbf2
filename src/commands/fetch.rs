use clap::App;
use std::time::Instant;

use crate::commands::{bbox_args, config_from_args, query_from_args, service_args, size_args, size_from_args, Command};
use crate::topo::{ErddapClient, FileStore, TopoSource};


pub struct Fetch {}

impl Command for Fetch {
    fn register(&self) -> App<'static> {
        let app = App::new("fetch")
            .about("Download topography for a bounding box into the cache without rendering.");

        service_args(size_args(bbox_args(app)))
    }

    fn run(&self, args: &clap::ArgMatches) -> anyhow::Result<()> {
        let start = Instant::now();

        let query = query_from_args(args)?;
        let (width, height) = size_from_args(args)?;
        let config = config_from_args(args)?;

        let store = FileStore::new(&config.cache_dir);
        let source = TopoSource::new(ErddapClient::new(&config)?, store, config.cell_degrees);

        let key = source.resolved_key(&query, width, height)?;
        println!("ℹ️  Cache entry: {}", config.cache_dir.join(&key).display());

        println!("▶️  Loading topography");
        let samples = source.load_cache_or_fetch(&query, width, height)?;
        println!(
            "✔️  Loaded {} samples in {}ms",
            samples.len(),
            start.elapsed().as_millis()
        );

        Ok(())
    }
}
