use chrono::Utc;

use crate::cli::FetchArgs;
use crate::firms::FirmsClient;
use crate::params::FeedRequest;
use crate::server::FiresResponse;

pub async fn exec(client: FirmsClient, args: FetchArgs) -> anyhow::Result<()> {
    let query = args.feed.to_query(args.date);
    let req = FeedRequest::from_query(query, client.default_source(), Utc::now().date_naive())?;

    let fires = client.fetch_fires(&req).await?;

    let envelope = FiresResponse::new(req, fires);
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}
