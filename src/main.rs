use anyhow::Context;
use huobix::core::types::CandleInterval;
use huobix::{ExchangeConfig, HuobiBuilder};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // HUOBI_ACCESS_KEY / HUOBI_SECRET_KEY are optional; public data works without them
    let config = ExchangeConfig::from_env("HUOBI").context("invalid HUOBI_* environment")?;
    let builder = HuobiBuilder::new().with_config(config.clone());
    let huobi = builder.build_rest_only()?;

    let server_time = huobi.generic.timestamp().await?;
    println!("Server time: {}", server_time);

    let candles = huobi
        .market
        .candles("btcusdt", CandleInterval::Min60, Some(5))
        .await?;
    for candle in &candles {
        println!(
            "{} open={} close={} vol={}",
            candle.id, candle.open, candle.close, candle.vol
        );
    }

    if config.has_credentials() {
        for account in huobi.account.accounts().await? {
            println!("Account {} ({}) is {}", account.id, account.account_type, account.state);
        }
    }

    let mut stream = builder.build_market_stream();
    stream.connect().await?;
    stream
        .subscribe_ticker("btcusdt", None)
        .await
        .context("ticker subscription failed")?;
    for _ in 0..3 {
        match stream.next_message().await {
            Some(Ok(message)) => println!("{}: {}", message.topic, message.data),
            Some(Err(e)) => eprintln!("Stream error: {}", e),
            None => break,
        }
    }
    stream.close().await?;

    Ok(())
}
