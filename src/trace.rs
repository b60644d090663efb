use tracing_subscriber::EnvFilter;

/// Install the global subscriber, logs go to stderr so stdout stays usable for dry runs.
///
/// `levels` uses the `EnvFilter` syntax, e.g. `f5_statsd=debug,statsd=info`.
pub fn init(color: bool, json: bool, levels: &str) {
    let filter = EnvFilter::try_new(levels).unwrap_or_else(|err| {
        eprintln!("invalid log filter {levels:?}, fallback to info, {err}");
        EnvFilter::new("info")
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(color)
        .with_writer(std::io::stderr);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(err) = result {
        eprintln!("install tracing subscriber failed, {err}");
    }
}
