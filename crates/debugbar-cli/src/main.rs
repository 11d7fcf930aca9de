use clap::Parser;
use debugbar_mcp::{Cli, run};

fn main() {
    // Reset SIGPIPE so `debugbar-mcp tree | head` exits quietly
    #[cfg(unix)]
    reset_sigpipe();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(unix)]
fn reset_sigpipe() {
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}
