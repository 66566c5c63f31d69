// lescission binary entry point

fn main() -> anyhow::Result<()> {
    lepilote::cli::main()
}
