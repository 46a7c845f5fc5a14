//! Repository traits (§4.1): the seam between domain/application logic and
//! the persistence store. One trait per aggregate, gathered behind a single
//! `RepositoryProvider` so callers hold one `Arc<dyn RepositoryProvider>`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use super::card::Card;
use super::charge_point::ChargePoint;
use super::community_settings::CommunitySettings;
use super::id_tag::IdTag;
use super::meter_sample::MeterSample;
use super::payment::Payment;
use super::realtime_deduction::RealtimeDeduction;
use super::status_log::StatusLog;
use super::stop_record::StopRecord;
use super::tariff::TariffSegment;
use super::transaction::Transaction;
use super::whitelist::WhitelistEntry;
use crate::shared::DomainResult;

#[async_trait]
pub trait ChargePointRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ChargePoint>>;
    async fn find_all(&self) -> DomainResult<Vec<ChargePoint>>;
    async fn upsert(&self, cp: ChargePoint) -> DomainResult<ChargePoint>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
    async fn set_max_current(&self, id: &str, max_current_a: f64) -> DomainResult<()>;
}

#[async_trait]
pub trait CardRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Card>>;
    async fn find_all(&self) -> DomainResult<Vec<Card>>;
    async fn credit(&self, id: &str, amount: Decimal) -> DomainResult<Card>;
    /// Debits `amount` from the card's balance, clamping at zero, inside a
    /// transaction that also reads/writes the RealtimeDeduction cursor for
    /// `transaction_id` (the write-barrier described in §5). Returns the
    /// amount actually applied and the card's new balance.
    async fn debit_with_cursor(
        &self,
        card_id: &str,
        transaction_id: i64,
        new_cursor_kwh: Decimal,
        new_cursor_amount: Decimal,
    ) -> DomainResult<(Decimal, Decimal)>;
}

#[async_trait]
pub trait IdTagRepository: Send + Sync {
    async fn find_by_id(&self, id_tag: &str) -> DomainResult<Option<IdTag>>;
    async fn upsert(&self, tag: IdTag) -> DomainResult<IdTag>;
    async fn whitelist_for(&self, id_tag: &str) -> DomainResult<Vec<WhitelistEntry>>;
    async fn add_whitelist_entry(&self, entry: WhitelistEntry) -> DomainResult<()>;
}

#[async_trait]
pub trait TariffRepository: Send + Sync {
    async fn segments_for_date(&self, date: NaiveDate) -> DomainResult<Vec<TariffSegment>>;
    async fn all_segments(&self) -> DomainResult<Vec<TariffSegment>>;
    async fn add_segment(&self, segment: TariffSegment) -> DomainResult<()>;
    async fn delete_segments_for_date(&self, date: NaiveDate) -> DomainResult<()>;
    async fn default_price(&self) -> DomainResult<Decimal>;
}

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Transaction>>;
    async fn find_active_for_connector(
        &self,
        charge_point_id: &str,
        connector_id: i32,
    ) -> DomainResult<Option<Transaction>>;
    async fn find_active_for_charge_point(
        &self,
        charge_point_id: &str,
    ) -> DomainResult<Option<Transaction>>;
    async fn find_all_active(&self) -> DomainResult<Vec<Transaction>>;
    async fn find_last_finished(&self, charge_point_id: &str) -> DomainResult<Option<Transaction>>;
    async fn insert(&self, tx: Transaction) -> DomainResult<Transaction>;

    /// Atomically closes a transaction: writes the StopRecord, updates the
    /// Transaction's stop fields, inserts the Payment, debits any residual
    /// cost from the Card, and deletes the RealtimeDeduction cursor (§4.6
    /// stop path, one DB transaction per §4.1/§5).
    async fn close_transaction(
        &self,
        transaction_id: i64,
        meter_stop: i64,
        stop_timestamp: DateTime<Utc>,
        reason: Option<String>,
        final_cost: Decimal,
        card_id: &str,
    ) -> DomainResult<Payment>;

    async fn insert_meter_sample(&self, sample: MeterSample) -> DomainResult<()>;
    async fn meter_samples_for(&self, transaction_id: i64) -> DomainResult<Vec<MeterSample>>;

    async fn get_realtime_deduction(
        &self,
        transaction_id: i64,
    ) -> DomainResult<Option<RealtimeDeduction>>;

    async fn payment_for(&self, transaction_id: i64) -> DomainResult<Option<Payment>>;
}

#[async_trait]
pub trait CommunitySettingsRepository: Send + Sync {
    async fn get(&self) -> DomainResult<CommunitySettings>;
    async fn update(&self, settings: CommunitySettings) -> DomainResult<()>;
}

#[async_trait]
pub trait StatusLogRepository: Send + Sync {
    async fn append(&self, log: StatusLog) -> DomainResult<()>;
}

pub trait RepositoryProvider: Send + Sync {
    fn charge_points(&self) -> &dyn ChargePointRepository;
    fn cards(&self) -> &dyn CardRepository;
    fn id_tags(&self) -> &dyn IdTagRepository;
    fn tariffs(&self) -> &dyn TariffRepository;
    fn transactions(&self) -> &dyn TransactionRepository;
    fn community_settings(&self) -> &dyn CommunitySettingsRepository;
    fn status_logs(&self) -> &dyn StatusLogRepository;
}
