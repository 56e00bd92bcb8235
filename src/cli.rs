use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "apiscout")]
#[command(version = concat!("Ver:", env!("CARGO_PKG_VERSION")))]
#[command(about = "API endpoint resolution and connectivity diagnostics")]
pub struct Cli {
    /// Write the default config file
    #[arg(long = "init")]
    pub init: bool,

    /// Print the effective configuration
    #[arg(short = 'p', long = "print")]
    pub print: bool,

    /// Validate the configuration file
    #[arg(short = 'c', long = "check")]
    pub check: bool,

    /// Show the endpoint the client would use now (default action)
    #[arg(short = 'r', long = "resolve")]
    pub resolve: bool,

    /// Probe candidates concurrently and save the first reachable one
    /// (config candidates when no URL is given)
    #[arg(short = 'd', long = "diagnose", num_args = 0.., value_name = "URL")]
    pub diagnose: Option<Vec<String>>,

    /// Probe a single endpoint without saving anything
    #[arg(long = "probe", value_name = "URL")]
    pub probe: Option<String>,

    /// Save an endpoint manually
    #[arg(long = "set", value_name = "URL")]
    pub set: Option<String>,

    /// Forget the saved endpoint
    #[arg(long = "reset")]
    pub reset: bool,

    /// Rewrite an image path against the current endpoint
    #[arg(long = "rewrite", value_name = "PATH")]
    pub rewrite: Option<String>,

    /// Per-probe timeout override in milliseconds
    #[arg(short = 't', long = "timeout-ms", value_name = "MS")]
    pub timeout_ms: Option<u32>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// `--resolve`, or no probing action requested at all
    pub fn wants_resolution(&self) -> bool {
        self.resolve || (self.probe.is_none() && self.diagnose.is_none())
    }
}
