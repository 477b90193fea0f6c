use anyhow::Result;

use tsmv::{app, cli};

fn main() -> Result<()> {
    let args = cli::parse();
    app::run(args)
}
