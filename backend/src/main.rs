#[tokio::main]
async fn main() -> std::io::Result<()> {
    server::start_server().await
}
