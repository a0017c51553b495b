use std::io;

use clap::Args;
use tracing_subscriber::EnvFilter;

/// Verbosity flags shared by every binary.
#[derive(Debug, Args, Clone, Copy, Default)]
pub struct LogArgs {
    #[arg(long, short, global = true, help = "Log requests and failures on stderr")]
    pub verbose: bool,
    #[arg(
        long,
        short,
        global = true,
        conflicts_with = "verbose",
        help = "Only log fatal errors"
    )]
    pub quiet: bool,
}

impl LogArgs {
    fn default_directives(self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug,hyper=info,hyper_util=info,reqwest=info,rustls=info,rustyline=info"
        } else {
            "warn"
        }
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over the flags.
pub fn init(args: LogArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.default_directives()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .ok();
}
