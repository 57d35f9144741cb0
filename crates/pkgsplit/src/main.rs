mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbose, cli.quiet);

    let generator = cli::init_generator(cli.patterns, cli.no_builtins)?;

    match cli.command {
        cli::Commands::Classify {
            root,
            list,
            source,
            format,
        } => cli::classify::handle_classify_command(
            generator, root, list, &source, format, cli.quiet,
        ),

        cli::Commands::Patterns => cli::patterns::handle_patterns_command(&generator),
    }
}
