use clap::Parser;
use timeloggr::cli::commands::Cli;
use timeloggr::cli::handlers;
use timeloggr::io::config_io;

fn main() {
    let cli = Cli::parse();

    let config = match config_io::read_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    let data_dir = config_io::resolve_data_dir(&config, cli.data_dir.as_deref());

    let result = match cli.command {
        // No subcommand → launch TUI
        None => timeloggr::tui::run(&config, &data_dir),
        Some(_) => handlers::dispatch(cli, &config, &data_dir),
    };
    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
