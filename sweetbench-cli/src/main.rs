fn main() -> anyhow::Result<()> {
    sweetbench_cli::run()
}
