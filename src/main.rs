#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = youtube_link_resolver::run().await {
        log::error!("[Main] {}", e);
        std::process::exit(1);
    }
}
