//! Stats command handler

use anyhow::Result;

use boook_core::BookStore;

use crate::output::Output;

/// Show library statistics
pub fn show(store: &BookStore, output: &Output) -> Result<()> {
    output.print_stats(&store.stats());
    Ok(())
}
