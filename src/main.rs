extern crate pretty_env_logger;

#[macro_use]
extern crate log;

use clap::Parser;
use lrrseek::{context_main, coverage_main, split_main, synteny_main, triage_main, Cli, Commands};

fn main() {
    let args = Cli::parse();
    let params = args.command.params();
    let level = if params.debug() {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    pretty_env_logger::formatted_timed_builder()
        .filter_level(level)
        .init();

    info!("starting");
    debug!("params: {:#?}", params);
    if !params.validate() {
        error!("please fix arguments");
        std::process::exit(1);
    }

    let result = match args.command {
        Commands::Triage(m_args) => triage_main(&m_args).map(|stats| {
            debug!("stats: {:#?}", stats);
        }),
        Commands::Context(m_args) => context_main(m_args),
        Commands::Split(m_args) => split_main(m_args),
        Commands::Coverage(m_args) => coverage_main(m_args),
        Commands::Synteny(m_args) => synteny_main(m_args),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
    info!("finished");
}
