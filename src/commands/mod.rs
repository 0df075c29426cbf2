mod fetch;
mod heatmap;
mod render;

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{App, Arg, ArgMatches};

use crate::config::{TopoConfig, DEFAULT_CELL_DEGREES, DEFAULT_ENDPOINT};
use crate::topo::{BoundingBox, TopoQuery};

pub use fetch::Fetch;
pub use heatmap::Heatmap;
pub use render::Render;


pub trait Command {
    fn register(&self) -> App<'static>;
    fn run(&self, args: &ArgMatches) -> anyhow::Result<()>;
}

fn number(name: &'static str, help: &'static str) -> Arg<'static> {
    Arg::new(name)
        .long(name)
        .value_name("NUMBER")
        .help(help)
        .takes_value(true)
        .allow_hyphen_values(true)
}

pub(crate) fn bbox_args(app: App<'static>) -> App<'static> {
    app.arg(number("min-lat", "Southern edge in degrees").required(true))
        .arg(number("max-lat", "Northern edge in degrees").required(true))
        .arg(number("lat-stride", "Latitude stride, 0 derives it from the image height").default_value("0"))
        .arg(number("min-lng", "Western edge in degrees").required(true))
        .arg(number("max-lng", "Eastern edge in degrees").required(true))
        .arg(number("lng-stride", "Longitude stride, 0 derives it from the image height").default_value("0"))
}

pub(crate) fn size_args(app: App<'static>) -> App<'static> {
    app.arg(number("width", "Image width in pixels").required(true))
        .arg(number("height", "Image height in pixels").required(true))
}

pub(crate) fn service_args(app: App<'static>) -> App<'static> {
    app.arg(
        Arg::new("endpoint")
            .long("endpoint")
            .value_name("URL")
            .takes_value(true)
            .help("Griddap JSON endpoint of the SRTM30 dataset")
            .env("TOPO_ENDPOINT")
            .default_value(DEFAULT_ENDPOINT),
    )
    .arg(
        Arg::new("timeout")
            .long("timeout")
            .value_name("SECS")
            .takes_value(true)
            .help("Request timeout in seconds")
            .env("TOPO_TIMEOUT_SECS")
            .default_value("30"),
    )
    .arg(
        Arg::new("cache-dir")
            .long("cache-dir")
            .value_name("DIR")
            .takes_value(true)
            .help("Directory holding cached query results")
            .env("TOPO_CACHE_DIR")
            .default_value("."),
    )
}

pub(crate) fn parse_arg<T>(args: &ArgMatches, name: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = match args.value_of(name) {
        Some(raw) => raw,
        None => bail!("Missing --{}", name),
    };

    raw.parse::<T>()
        .with_context(|| format!("Invalid value for --{}: {}", name, raw))
}

pub(crate) fn query_from_args(args: &ArgMatches) -> anyhow::Result<TopoQuery> {
    let bbox = BoundingBox::new(
        parse_arg(args, "min-lat")?,
        parse_arg(args, "max-lat")?,
        parse_arg(args, "min-lng")?,
        parse_arg(args, "max-lng")?,
    )?;

    Ok(TopoQuery {
        bbox,
        lat_stride: parse_arg(args, "lat-stride")?,
        lng_stride: parse_arg(args, "lng-stride")?,
    })
}

pub(crate) fn size_from_args(args: &ArgMatches) -> anyhow::Result<(u32, u32)> {
    let width: u32 = parse_arg(args, "width")?;
    let height: u32 = parse_arg(args, "height")?;

    if width == 0 || height == 0 {
        bail!("Image size must be positive, got {}x{}", width, height);
    }

    Ok((width, height))
}

pub(crate) fn config_from_args(args: &ArgMatches) -> anyhow::Result<TopoConfig> {
    let config = TopoConfig {
        endpoint: parse_arg(args, "endpoint")?,
        timeout: Duration::from_secs(parse_arg(args, "timeout")?),
        cache_dir: PathBuf::from(parse_arg::<String>(args, "cache-dir")?),
        cell_degrees: DEFAULT_CELL_DEGREES,
    };
    config.validate()?;

    Ok(config)
}

pub(crate) fn output_from_args(args: &ArgMatches) -> anyhow::Result<PathBuf> {
    let output = PathBuf::from(parse_arg::<String>(args, "output")?);

    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            bail!("Output directory {} does not exist", parent.display())
        }
        _ => Ok(output),
    }
}
