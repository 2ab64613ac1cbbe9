use coinapult::CoinapultError;
use coinapult::adapter::AccountAdapter;
use coinapult::backend::HttpBackend;
use coinapult::config::fetch_config;
use coinapult::currency::Currency;

#[tokio::main]
async fn main() -> Result<(), CoinapultError> {
    // Initialize tracing subscriber for logging output.
    tracing_subscriber::fmt::init();

    let config = fetch_config()?;
    let (Some(api_key), Some(api_secret)) = (
        &config.coinapult.api_key,
        &config.coinapult.api_secret,
    ) else {
        return Err(CoinapultError::Config(
            "COINAPULT_API_KEY and COINAPULT_API_SECRET must be set".to_string(),
        ));
    };

    let backend = HttpBackend::new(&config.coinapult.api_url, api_key, api_secret)?;
    let adapter = AccountAdapter::new(backend);

    adapter.activate(None).await?;

    for currency in Currency::ALL {
        match adapter.balance(currency).await? {
            Some(balance) => println!("{currency}: {}", balance.available.to_decimal()),
            None => println!("{currency}: -"),
        }
    }

    let history = adapter.transactions(Currency::Btc).await?;
    println!("{} BTC ledger entries", history.len());

    Ok(())
}
