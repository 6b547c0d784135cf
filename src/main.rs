// Main entry point that forwards to the cg2glsl-app library
fn main() {
    // Exit with the same code as the app
    std::process::exit(match cg2glsl_app::main() {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    });
}
