//! `cargo run`: rebuild the landing-page bundle into `static/pkg`, then
//! preview `static/` on localhost until interrupted.

use std::io;
use std::process::{Child, Command, ExitCode, Stdio};

const PORT: &str = "8000";
const PKG_DIR: &str = "static/pkg";

enum Bundle {
    Fresh,
    /// wasm-pack is not installed; whatever is already in `static/pkg` is served.
    Unchanged,
}

fn bundle() -> Result<Bundle, String> {
    let status = Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", PKG_DIR])
        .status();
    match status {
        Ok(status) if status.success() => Ok(Bundle::Fresh),
        Ok(status) => Err(format!("bundling the particle field failed ({status})")),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Bundle::Unchanged),
        Err(err) => Err(format!("could not launch wasm-pack: {err}")),
    }
}

fn preview() -> io::Result<Child> {
    Command::new("python3")
        .args(["-m", "http.server", PORT, "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
}

fn main() -> ExitCode {
    match bundle() {
        Ok(Bundle::Fresh) => println!("bundle written to {PKG_DIR}"),
        Ok(Bundle::Unchanged) => eprintln!("no wasm-pack on PATH; previewing the last bundle in {PKG_DIR}"),
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    }

    let mut server = match preview() {
        Ok(server) => server,
        Err(err) => {
            eprintln!("preview server did not start ({err}); any static file server over static/ works too");
            return ExitCode::FAILURE;
        }
    };
    println!("landing page at http://127.0.0.1:{PORT}/");
    match server.wait() {
        Ok(status) if status.success() => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}
