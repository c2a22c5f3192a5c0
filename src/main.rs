use clap::Parser;
use todo_list::cli::commands::Cli;
use todo_list::cli::handlers;

fn main() {
    let cli = Cli::parse();
    // No subcommand launches the TUI from inside dispatch
    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
