fn main() -> anyhow::Result<()> {
    restmux::cli::run_cli()
}
