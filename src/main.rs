use clap::Parser;
use wheelhouse::cli::Args;

#[tokio::main]
async fn main() {
    // 加载 .env 文件
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_timer(tracing_subscriber::fmt::time::LocalTime::rfc_3339())
        .init();

    let args = Args::parse();

    match wheelhouse::run(args).await {
        Ok(index_url) => println!("wheelhouse: index written to {index_url}"),
        Err(err) => {
            eprintln!("wheelhouse: {err}, aborting!");
            std::process::exit(1);
        }
    }
}
