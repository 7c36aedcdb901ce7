fn main() {
    name_launch::app::cli::run();
}
