use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Max log level for a count of `-v` flags.
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

// Initializer for logger. Logs go to stderr so stdout carries only the
// config and metrics reports.
pub fn init(verbosity: u8) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level_for(verbosity))
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("huffproc: a global logger is already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(0), Level::INFO);
        assert_eq!(level_for(1), Level::DEBUG);
        assert_eq!(level_for(2), Level::TRACE);
        assert_eq!(level_for(9), Level::TRACE);
    }
}
