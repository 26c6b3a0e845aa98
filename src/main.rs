fn main() {
    env_logger::init();
    bounty_holdem::cli::run();
}
