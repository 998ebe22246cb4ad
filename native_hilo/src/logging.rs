/// Install the global tracing subscriber.
///
/// With `debug` everything is shown at DEBUG with targets and source
/// locations; otherwise our crates log at INFO and the rest at WARN.
/// `RUST_LOG` overrides both.
pub fn init_tracing(debug: bool) {
    let log_filter = if debug {
        "debug"
    } else {
        "native_hilo=info,hilo_shared=info,warn"
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(debug)
        .with_thread_ids(debug)
        .with_file(debug)
        .with_line_number(debug)
        .init();
}
