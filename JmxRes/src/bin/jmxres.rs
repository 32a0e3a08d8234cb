fn main() -> anyhow::Result<()> {
    jmxres::cli::run_cli()
}
