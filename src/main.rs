fn main() -> std::process::ExitCode {
    nekoweb_lib::run()
}
