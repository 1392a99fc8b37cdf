fn main() -> anyhow::Result<()> {
    tscatalog::cli::run_cli()
}
