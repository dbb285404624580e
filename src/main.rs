#[tokio::main]
async fn main() {
    if let Err(err) = caredesk::run().await {
        eprintln!("caredesk: {err}");
        std::process::exit(1);
    }
}
