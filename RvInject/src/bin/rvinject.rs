fn main() -> anyhow::Result<()> {
    rvinject::cli::run_cli()
}
