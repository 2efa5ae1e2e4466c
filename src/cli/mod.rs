//! CLI command implementations.
//!
//! Each submodule implements one command group. Commands write to stdout;
//! diagnostics go through `tracing`.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `extract` | Print the preference state after one utterance |
//! | `recommend` | Extract, then recommend, for one utterance and optional reply |
//! | `chat` | Interactive advisor session |
//! | `catalogue list` | List catalogue records |
//! | `catalogue show` | Print one record as JSON |
//! | `catalogue clean` | Write a repaired copy of the catalogue |
//! | `config` | Show the effective configuration |
//!
//! # Example Usage
//!
//! ```bash
//! uniguide extract "I want to study medicine in london"
//! uniguide recommend "somewhere in scotland" --reply "Have you looked at Aberdeen?"
//! uniguide chat --offline
//! uniguide catalogue clean --output data/universities.clean.json
//! ```

mod catalogue;
mod chat;
mod preferences;

pub use catalogue::{
    cmd_catalogue_clean, cmd_catalogue_list, cmd_catalogue_show, write_catalogue_table,
    write_cleaned_catalogue,
};
pub use chat::{cmd_chat, run_chat};
pub use preferences::{
    RecommendOutput, build_recommendation, cmd_extract, cmd_recommend, load_reply, load_state,
    write_json,
};

use crate::config::UniguideConfig;

/// Executes the config command.
///
/// # Errors
///
/// Never fails; the signature matches the other commands.
#[allow(clippy::unnecessary_wraps)]
pub fn cmd_config(
    config: &UniguideConfig,
    show: bool,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    if show {
        println!("{config}");
    } else {
        println!("Use --show to print the effective configuration.");
    }
    Ok(())
}
