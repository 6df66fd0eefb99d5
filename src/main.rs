mod app;
mod cli;
mod config;
mod consts;
mod core;
mod error;
mod git;
mod output;
mod utils;

use clap::Parser;

use cli::Cli;
use config::Config;

fn main() {
    let cli = Cli::parse();

    // Quiet config loading keeps JSON output parseable
    let config = if cli.json {
        Config::load_quiet()
    } else {
        Config::load()
    };
    let cli = cli.with_config(&config);
    utils::set_debug(cli.debug);

    if let Err(e) = app::run(&cli, &config) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
