//! # blockworld Application Entry Point
//!
//! Starts the engine via the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release
//! ```

fn main() {
    blockworld::run();
}
