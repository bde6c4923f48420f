//! Statically embedded single-page client assets.

use rust_embed::RustEmbed;

/// The client bundle compiled into the binary. `ui/dist` is checked in;
/// there is no build step.
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/ui/dist"]
pub struct Assets;
