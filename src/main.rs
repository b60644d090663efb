#[macro_use]
extern crate tracing;

use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use argh::FromArgs;
use exitcode::ExitCode;
use f5_statsd::consumer::Consumer;
use f5_statsd::event::read_events;
use f5_statsd::sinks::{FileTracer, MetricSink, StatsdSink, WriteSink};
use f5_statsd::{Config, trace};

#[derive(FromArgs)]
#[argh(description = "Flatten F5 telemetry systemInfo events and send them to StatsD")]
struct RootCommand {
    #[argh(option, short = 'c', description = "path of the config file, YAML or JSON")]
    config: Option<PathBuf>,

    #[argh(
        option,
        short = 'i',
        description = "file to read events from, stdin is used if not set"
    )]
    input: Option<PathBuf>,

    #[argh(
        option,
        short = 'l',
        default = "String::from(\"info\")",
        description = "log level, overridden by F5_STATSD_LOG"
    )]
    log_level: String,

    #[argh(switch, description = "write logs as JSON lines")]
    log_json: bool,

    #[argh(switch, description = "write metrics to stdout instead of StatsD")]
    dry_run: bool,

    #[argh(switch, description = "print an example config and exit")]
    generate_config: bool,

    #[argh(switch, short = 'v', description = "show version")]
    version: bool,
}

fn main() {
    let opts: RootCommand = argh::from_env();

    if opts.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return;
    }

    if opts.generate_config {
        print!("{}", Config::generate_config());
        return;
    }

    let levels = std::env::var("F5_STATSD_LOG")
        .unwrap_or_else(|_| format!("f5_statsd={0},statsd={0}", opts.log_level));
    trace::init(
        std::io::stderr().is_terminal() && !opts.log_json,
        opts.log_json,
        &levels,
    );

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            error!(message = "Build tokio runtime failed", %err);
            std::process::exit(exitcode::OSERR);
        }
    };

    let code = runtime.block_on(run(opts));
    std::process::exit(code);
}

async fn run(opts: RootCommand) -> ExitCode {
    let Some(path) = opts.config.as_ref() else {
        error!(message = "Config file is required, see --help");
        return exitcode::CONFIG;
    };

    let config = match Config::load(path) {
        Ok(config) => config,
        Err(err) => {
            error!(message = "Load config failed", ?path, %err);
            return exitcode::CONFIG;
        }
    };

    info!(
        message = "Config loaded",
        ?path,
        tag_method = ?config.add_tags.method,
        convert_booleans = config.convert_booleans_to_metrics,
    );

    let input = match open_input(opts.input.as_ref()) {
        Ok(input) => input,
        Err(err) => {
            error!(message = "Open input failed", input = ?opts.input, %err);
            return exitcode::NOINPUT;
        }
    };

    if opts.dry_run {
        let consumer = build_consumer(&config, WriteSink::new(tokio::io::stdout()));
        return drive(consumer, input).await;
    }

    match StatsdSink::connect(&config).await {
        Ok(sink) => drive(build_consumer(&config, sink), input).await,
        Err(err) => {
            error!(
                message = "Connect to statsd failed",
                host = %config.host,
                port = config.port,
                %err
            );

            exitcode::UNAVAILABLE
        }
    }
}

fn open_input(path: Option<&PathBuf>) -> f5_statsd::Result<Box<dyn Read>> {
    let reader: Box<dyn Read> = match path {
        Some(path) => Box::new(std::io::BufReader::new(std::fs::File::open(path)?)),
        None => Box::new(std::io::stdin().lock()),
    };

    Ok(reader)
}

fn build_consumer<S: MetricSink>(config: &Config, sink: S) -> Consumer<S> {
    let consumer = Consumer::new(config.flatten_options(), sink);

    match &config.trace {
        Some(path) => consumer.with_tracer(FileTracer::new(path)),
        None => consumer,
    }
}

async fn drive<S: MetricSink>(mut consumer: Consumer<S>, input: Box<dyn Read>) -> ExitCode {
    let mut events = 0usize;
    let mut metrics = 0usize;

    for result in read_events(input) {
        let event = match result {
            Ok(event) => event,
            Err(err) => {
                error!(
                    message = "Malformed event",
                    line = err.line(),
                    column = err.column(),
                    %err
                );

                return exitcode::DATAERR;
            }
        };

        match consumer.process(&event).await {
            Ok(count) => {
                events += 1;
                metrics += count;
            }
            Err(err) => {
                error!(message = "Forward metrics failed", %err);
                return exitcode::UNAVAILABLE;
            }
        }
    }

    info!(message = "All events processed", events, metrics);

    exitcode::OK
}
