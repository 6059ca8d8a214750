// Copies the static page (markup, styles and any `static/pkg` bundle left by
// `cargo run` / wasm-pack) to `dist/`. wasm-pack is not invoked from here: it
// runs cargo itself, which would re-enter this script.
use std::path::Path;

use fs_extra::dir::{copy, CopyOptions};

fn main() {
    println!("cargo:rerun-if-changed=static");

    let static_dir = Path::new("static");
    if !static_dir.exists() {
        return;
    }
    let out_dir = Path::new("dist");
    if out_dir.exists() {
        std::fs::remove_dir_all(out_dir).ok();
    }

    let options = CopyOptions {
        copy_inside: true,
        overwrite: true,
        ..CopyOptions::new()
    };
    if let Err(err) = copy(static_dir, out_dir, &options) {
        println!("cargo:warning=failed to copy static/ to dist/: {err}");
    }
}
