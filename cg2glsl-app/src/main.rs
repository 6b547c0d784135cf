//! # cg2glsl Application (Binary)
//!
//! Standalone executable of the app crate; the workspace root forwards here too.

fn main() {
    if let Err(e) = cg2glsl_app::main() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
