use ramjam::status::ExitStatus;

/// Entry point - sets up logging and calls core::run()
///
/// Returns ExitStatus directly, which implements std::process::Termination.
fn main() -> ExitStatus {
    ramjam::logging::init();

    let args: Vec<String> = std::env::args().collect();
    ramjam::core::run(args)
}
