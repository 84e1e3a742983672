use clap::Parser;
use tracing_subscriber::EnvFilter;
use xmind2md::{Args, ConvertOptions, convert_directory, exitcode};

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { exitcode::USAGE } else { exitcode::OK });
        }
    };

    setup_logging(args.verbose);

    let code = match ConvertOptions::from_args(&args)
        .and_then(|options| convert_directory(&args.source_dir, &args.output_dir, &options))
    {
        Ok(summary) => exitcode::for_summary(&summary),
        Err(e) => {
            eprintln!("Error: {e}");
            exitcode::USAGE
        }
    };
    std::process::exit(code);
}

/// `RUST_LOG` wins when set; otherwise `-v` counts from warn up to trace.
fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
