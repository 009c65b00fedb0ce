fn main() -> anyhow::Result<()> {
    bandplot::cli::run::entry()
}
