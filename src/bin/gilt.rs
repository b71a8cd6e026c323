// Gilt CLI binary: all logic lives in the library's cli module.

fn main() {
    gilt::cli::run();
}
