/// poly3d Terminal Demo - spinning pyramid, dodecahedron and bobbing octahedron
///
/// Controls:
///   - Q/ESC: Quit
///
/// Set RUST_LOG and redirect stderr to see log output.
use anyhow::Context;
use poly3d_terminal::{init_logging, TerminalApp};

fn main() -> anyhow::Result<()> {
    init_logging();

    let mut app = TerminalApp::new().context("failed to set up the terminal scene")?;
    app.run().context("terminal renderer failed")?;

    Ok(())
}
