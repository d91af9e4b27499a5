//! Command-line argument definitions (clap) and help text.

use clap::Parser;

pub const HELP_TEXT: &str = "
Redfish Temperature Inventory
Usage: redfish-temps [OPTIONS]

Options:
  -h, --help                    Print help
  -V, --version                 Print version
Connection:
  -i, --ip <IP>                 BMC address (host, host:port or https:// URL)
  -u, --user <USER>             BMC user name
  -p, --passwd <PASSWD>         BMC user password
      --auth <AUTH>             Authentication mode: session (default) or basic
      --cafile <CAFILE>         CA bundle used to verify the BMC certificate
      --timeout <SECONDS>       Per-request timeout in seconds (default 30)
Config & Logging:
      --config <PATH>           JSON config file (default: config.json next to the binary)
      --write-config <PATH>     Save the resolved connection settings to PATH and exit
      --log-level <LOG_LEVEL>   Log level (TRACE, DEBUG, INFO, WARN, ERROR). Logs go to stderr
";

#[derive(Parser, Debug, Default)]
#[command(name = "redfish-temps")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Redfish Temperature Inventory", long_about = None)]
pub struct Args {
    // === Connection ===
    /// BMC address (host, host:port or https:// URL)
    #[arg(short = 'i', long, help_heading = "Connection")]
    pub ip: Option<String>,

    /// BMC user name
    #[arg(short = 'u', long, help_heading = "Connection")]
    pub user: Option<String>,

    /// BMC user password
    #[arg(short = 'p', long, help_heading = "Connection")]
    pub passwd: Option<String>,

    /// Authentication mode: session or basic
    #[arg(long, help_heading = "Connection")]
    pub auth: Option<String>,

    /// CA bundle used to verify the BMC certificate
    #[arg(long, help_heading = "Connection")]
    pub cafile: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, help_heading = "Connection")]
    pub timeout: Option<u64>,

    // === Config & Logging ===
    /// JSON config file (default: config.json next to the binary)
    #[arg(long, help_heading = "Config & Logging")]
    pub config: Option<String>,

    /// Save the resolved connection settings to PATH and exit
    #[arg(long = "write-config", help_heading = "Config & Logging")]
    pub write_config: Option<String>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(long = "log-level", help_heading = "Config & Logging")]
    pub log_level: Option<String>,
}
