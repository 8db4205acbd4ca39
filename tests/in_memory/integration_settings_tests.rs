//! In-memory integration tests for configuring integrations from JSON.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;
use slotboard::integration::{
    adapters::memory::InMemoryIntegrationRepository,
    domain::{IntegrationProvider, IntegrationSettings},
    services::IntegrationService,
};
use slotboard::tenant::TenantId;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn settings_documents_configure_integrations() -> Result<(), eyre::Report> {
    let service = IntegrationService::new(
        Arc::new(InMemoryIntegrationRepository::new()),
        Arc::new(DefaultClock),
    );
    let tenant_id = TenantId::new();
    let documents = [
        json!({"provider": "whatsapp", "phone_number_id": "1098765", "business_account_id": "studio"}),
        json!({"provider": "webhook", "endpoint_url": "https://hooks.example.com/in", "events": ["card_moved", "payment_recorded"]}),
    ];

    for document in documents {
        let settings: IntegrationSettings = serde_json::from_value(document)?;
        service.configure(tenant_id, settings).await?;
    }
    service
        .enable(tenant_id, IntegrationProvider::Whatsapp)
        .await?;

    let listed = service.list_for_tenant(tenant_id).await?;
    let summary: Vec<_> = listed
        .iter()
        .map(|integration| (integration.provider(), integration.is_enabled()))
        .collect();
    eyre::ensure!(
        summary
            == vec![
                (IntegrationProvider::Whatsapp, true),
                (IntegrationProvider::Webhook, false),
            ],
        "unexpected integrations {summary:?}"
    );

    let stored = serde_json::to_value(
        listed
            .first()
            .map(|integration| integration.settings())
            .ok_or_else(|| eyre::eyre!("missing integration"))?,
    )?;
    eyre::ensure!(
        stored.get("provider") == Some(&json!("whatsapp")),
        "settings lost their tag: {stored}"
    );
    Ok(())
}
