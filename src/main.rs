use quiver::Backdrop;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    init_tracing();

    if let Err(e) = Backdrop::new().with_title("quiver").run() {
        tracing::error!(error = %e, "backdrop failed");
        std::process::exit(1);
    }
}
