//! Command-line interface for `rulekit`.
//!
//! Parses arguments, layers them over `rulekit.jsonc`, and hands the
//! resolved options to the sync engine in `rulekit_sync`.

mod app;
mod cli;

fn main() -> anyhow::Result<()> {
    app::run()
}
