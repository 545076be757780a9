use std::io::{self, Write};

use tracing::debug;

/// Rings the terminal bell.
pub fn beep() {
    let mut stdout = io::stdout();
    if let Err(error) = stdout.write_all(b"\x07").and_then(|()| stdout.flush()) {
        debug!(?error, "notification sound not available");
    }
}
