fn main() {
    if let Err(e) = riskscope_lib::run() {
        tracing::error!(error = %e, "riskscope failed");
        std::process::exit(1);
    }
}
