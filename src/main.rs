use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match symptom_selector_lib::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("symptom-selector: {e}");
            ExitCode::FAILURE
        }
    }
}
