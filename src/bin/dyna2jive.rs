use std::io;
use std::path::PathBuf;

use clap::Parser;

use lsdyna::keyword::Result;

#[derive(Parser, Debug)]
#[command(version, about = "Convert an LS-DYNA keyword deck to a Jive data file")]
struct Cli {
    #[arg(help = "Keyword deck to convert")]
    input: PathBuf,
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();
    let model = lsdyna::keyword::parse_file(&cli.input)?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    lsdyna::jive::write(&mut handle, &model)
}
