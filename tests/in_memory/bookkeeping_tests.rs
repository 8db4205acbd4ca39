//! In-memory integration tests linking appointments to ledger entries.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use slotboard::appointment::{
    adapters::memory::InMemoryAppointmentRepository,
    services::{AppointmentService, CreateAppointmentRequest},
};
use slotboard::config::SlotboardConfig;
use slotboard::ledger::{
    adapters::memory::InMemoryLedgerRepository,
    domain::{DatePeriod, EntryKind, EntryStatus},
    services::{LedgerService, RecordEntryRequest},
};
use slotboard::tenant::TenantId;

struct Desk {
    appointments: AppointmentService<InMemoryAppointmentRepository, DefaultClock>,
    ledger: LedgerService<InMemoryLedgerRepository, DefaultClock>,
}

#[fixture]
fn desk() -> Desk {
    let config = SlotboardConfig::default();
    Desk {
        appointments: AppointmentService::new(
            Arc::new(InMemoryAppointmentRepository::new()),
            Arc::new(DefaultClock),
            config.appointments,
        ),
        ledger: LedgerService::new(
            Arc::new(InMemoryLedgerRepository::new()),
            Arc::new(DefaultClock),
        ),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_appointment_is_billed_and_settled(desk: Desk) -> Result<(), eyre::Report> {
    let tenant_id = TenantId::new();
    let starts_at = Utc
        .with_ymd_and_hms(2026, 9, 7, 14, 0, 0)
        .single()
        .ok_or_else(|| eyre::eyre!("invalid start"))?;
    let booked = desk
        .appointments
        .create(CreateAppointmentRequest::new(
            tenant_id, "Ines", "Colour", starts_at, 120,
        ))
        .await?;
    desk.appointments
        .change_status(booked.id(), "in_progress")
        .await?;
    let completed = desk
        .appointments
        .change_status(booked.id(), "completed")
        .await?;
    eyre::ensure!(completed.status().is_terminal(), "appointment still open");

    let due_on = starts_at.date_naive();
    let invoice = desk
        .ledger
        .record_entry(
            RecordEntryRequest::new(tenant_id, EntryKind::Income, 12_000, "services", due_on)
                .for_appointment(booked.id()),
        )
        .await?;
    let later = due_on + Duration::days(3);
    eyre::ensure!(
        invoice.status_on(later) == EntryStatus::Overdue,
        "unpaid invoice should be overdue"
    );

    let period = DatePeriod::new(due_on, later)?;
    let before = desk.ledger.summary(tenant_id, period, later).await?;
    eyre::ensure!(before.overdue_receivables == 1, "summary {before:?}");

    desk.ledger.mark_paid(invoice.id()).await?;
    let after = desk.ledger.summary(tenant_id, period, later).await?;
    eyre::ensure!(after.paid_income == 12_000, "summary {after:?}");
    eyre::ensure!(after.overdue_receivables == 0, "summary {after:?}");
    eyre::ensure!(after.net == 12_000, "summary {after:?}");
    Ok(())
}
