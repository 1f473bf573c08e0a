//! Point-of-sale workflow: configuration, the sale session, receipt printing
//! and the terminal shell that drives them.

pub mod config;
pub mod printer;
pub mod session;
pub mod shell;

pub use config::{ConfigError, PosConfig};
pub use printer::{PrintError, ReceiptPrinter, TextReceiptPrinter, render_text};
pub use session::{PosError, PosSession};
pub use shell::{ShellCommand, parse_line, run};
