use anyhow::Result;

fn main() -> Result<()> {
    let code = polyhost::cli::run()?;
    std::process::exit(code)
}
