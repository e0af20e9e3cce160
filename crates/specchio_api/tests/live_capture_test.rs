//! Live capture test against real credentials.
//!
//! Gated behind the `api` feature: it consumes real API quota and needs
//! SPECCHIO_SOURCE_TOKEN and SPECCHIO_SOURCE_GUILD in the environment (or a
//! .env file).

use specchio_api::SourceClient;
use specchio_rate_limit::SpecchioConfig;

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore = "requires live credentials; enable the api feature")]
async fn test_live_capture() {
    dotenvy::dotenv().ok();

    let token = match std::env::var("SPECCHIO_SOURCE_TOKEN") {
        Ok(token) => token,
        Err(_) => {
            eprintln!("skipping: SPECCHIO_SOURCE_TOKEN unset");
            return;
        }
    };
    let guild_id: u64 = match std::env::var("SPECCHIO_SOURCE_GUILD") {
        Ok(id) => id.parse().expect("SPECCHIO_SOURCE_GUILD must be a guild id"),
        Err(_) => {
            eprintln!("skipping: SPECCHIO_SOURCE_GUILD unset");
            return;
        }
    };

    let config = SpecchioConfig::load().unwrap();
    let client = SourceClient::new(token, &config);

    let identity = client.current_user().await.unwrap();
    assert!(!identity.username().is_empty());

    let snapshot = client.capture(guild_id).await;
    assert!(snapshot.guild_record().is_some());
}
