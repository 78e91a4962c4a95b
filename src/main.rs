fn main() {
    confwiz::app::cli::run();
}
