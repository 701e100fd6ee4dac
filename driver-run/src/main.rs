use dotenv::dotenv;
use driver_man::{Error, Pipeline, Settings};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    let settings = Settings::from_env();
    let result = match Pipeline::new(settings) {
        Ok(pipeline) => {
            info!(
                "Installing ChromeDriver for {} into {}",
                pipeline.platform(),
                pipeline.install_dir().display()
            );
            pipeline.run().await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(report) => println!("{}", report.binary_path.display()),
        Err(e) => {
            report_failure(&e);
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn report_failure(error: &Error) {
    if error.is_environment_fatal() {
        eprintln!("{}", error);
        return;
    }
    eprintln!("ChromeDriver installation failed: {}", error);
}
