use clap::{app_from_crate, AppSettings};
use tracing_subscriber::EnvFilter;
use crate::commands::{Command, Fetch, Heatmap, Render};

mod commands;
mod config;
mod error;
mod heatmap;
mod topo;
mod utils;

#[cfg(test)]
mod test;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<_> = std::env::args().collect();

    if let Err(e) = execute(&args) {
        println!("❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

fn execute(input: &[String]) -> anyhow::Result<()> {
    let commands: Vec<Box<dyn Command>> = vec![
        Box::new(Heatmap {}),
        Box::new(Render {}),
        Box::new(Fetch {}),
        // Add commands here
    ];

    let mut app = app_from_crate!()
        .global_setting(AppSettings::PropagateVersion)
        .global_setting(AppSettings::UseLongFormatForHelpSubcommand)
        .setting(AppSettings::SubcommandRequiredElseHelp);

    app = commands.iter().fold(app, |a, c| a.subcommand(c.register()));

    let matches = app.get_matches_from(input);

    match matches.subcommand() {
        Some((name, sub_matches)) => match commands.iter().find(|c| c.register().get_name() == name) {
            Some(command) => command.run(sub_matches),
            _ => unreachable!(),
        },
        _ => unreachable!(),
    }
}
