//! Command-line entry point for `rulesync`.
//!
//! All behaviour lives in the library half of this crate so it can be
//! exercised from tests.

fn main() -> anyhow::Result<()> {
    rulesync::run()
}
