// SPDX-License-Identifier: Apache-2.0

//! List organizations using the configured credentials.
//!
//! Run with: `BUGSNAG_API_TOKEN=... cargo run --example list_organizations -p bugsnag-core`

use bugsnag_core::{Client, ConfigStore, Overrides, Resolver};

#[tokio::main]
async fn main() -> bugsnag_core::Result<()> {
    let settings = ConfigStore::new()?.read()?;
    let profile = Resolver::with_default_stores(settings).resolve(&Overrides::default())?;
    println!("Using token from {}", profile.token_source);

    let client = Client::new(profile.client_config(false))?;
    let organizations = client.organizations().await?;

    println!("Found {} organizations:", organizations.len());
    for org in &organizations {
        println!("  - {} ({})", org.name, org.id);
    }

    Ok(())
}
