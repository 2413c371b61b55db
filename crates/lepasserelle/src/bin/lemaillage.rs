// LeMaillage CLI binary

fn main() -> std::process::ExitCode {
    lepasserelle::cli::main()
}
