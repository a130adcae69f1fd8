//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - quantum job requests over a serial line",
        style("qlink").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qlink-proto   Request/reply lines and response extraction");
    println!("  qlink-client  Blocking line-exchange client");
    println!("  qlink-bridge  Host bridge and simulated backend");
    println!("  qlink-cli     Command-line interface");
    println!();
    println!("License: {}", style("Apache-2.0").dim());
}
