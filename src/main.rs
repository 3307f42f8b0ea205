use clap::Parser;
use scenario_scaffold::cli::commands::run;
use scenario_scaffold::cli::config::{Cli, load_config};
use scenario_scaffold::trace::logger::{Logger, TeeLogger, TraceLogger, TracingLogger};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref());

    // Trace file: CLI > config > none
    let mut sinks: Vec<Box<dyn Logger>> = vec![Box::new(TracingLogger)];
    if let Some(path) = config.trace_path(cli.trace.as_deref()) {
        sinks.push(Box::new(TraceLogger::new(path)));
    }
    let logger = TeeLogger::new(sinks);

    let output = run(&cli, &config, &logger);
    println!("{}", output.text);

    if !output.success {
        std::process::exit(1);
    }
}
