//! Lambda entry point serving the returns calculator over HTTP

use estate_returns::api::ReturnsApi;
use estate_returns::CalculatorConfig;
use lambda_http::{run, service_fn, Error, Request};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let config = CalculatorConfig::load(None)?;
    log::info!(
        "Starting returns API (negative net policy: {:?}, {} days/year)",
        config.negative_net_policy, config.days_per_year
    );
    let api = Arc::new(ReturnsApi::new(config));

    run(service_fn(move |req: Request| {
        let api = Arc::clone(&api);
        async move {
            // Portfolio quotes fan out on rayon; keep that off the runtime's worker thread
            let resp = tokio::task::spawn_blocking(move || api.handle(&req)).await?;
            Ok::<_, Error>(resp)
        }
    }))
    .await
}
