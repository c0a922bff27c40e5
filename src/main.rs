//! Host-side helper: `cargo run` builds the WASM package into `static/pkg`
//! and serves `static/` locally so both backdrops can be tried in a browser.

use std::process::{self, Command};

use clap::Parser;

#[derive(Debug, Parser)]
#[command(about = "Build the backdrop demo and serve it locally")]
struct Args {
    /// Port for the local HTTP server.
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Serve whatever is already in static/pkg instead of rebuilding it.
    #[arg(long)]
    skip_build: bool,
}

fn main() {
    let args = Args::parse();

    if !args.skip_build {
        println!("Building WASM pkg …");
        let status = Command::new("wasm-pack")
            .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
            .status();
        match status {
            Ok(st) if st.success() => {}
            Ok(_) => {
                eprintln!("wasm-pack finished with errors.");
                process::exit(1);
            }
            Err(_) => {
                eprintln!(
                    "wasm-pack not found in PATH (https://rustwasm.github.io/wasm-pack/). \
                     Serving existing artifacts, which may be stale."
                );
            }
        }
    }

    println!("Serving static/ at http://127.0.0.1:{} …", args.port);
    let port = args.port.to_string();
    let status = Command::new("python3")
        .args(["-m", "http.server", &port, "--directory", "static"])
        .status();
    match status {
        Ok(st) if st.success() => {}
        Ok(st) => {
            eprintln!("http server exited with {st}");
            process::exit(st.code().unwrap_or(1));
        }
        Err(err) => {
            eprintln!("failed to start http server: {err}");
            process::exit(1);
        }
    }
}
