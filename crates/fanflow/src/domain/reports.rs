use fanflow_core::{
    RewardLedger, Vendor, VendorType, WaitMinutes, REPORT_REWARD_POINTS,
};
use itertools::Itertools;
use log::debug;
use serde::Serialize;
use time::OffsetDateTime;

/// Result of an accepted wait-time report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportReceipt {
    pub vendor: Vendor,
    pub points: u32,
    pub action: String,
}

/// In-memory vendor collection plus the rewards ledger it feeds
#[derive(Debug, Clone, Serialize)]
pub struct LineReportStore {
    vendors: Vec<Vendor>,
    #[serde(rename = "rewards")]
    ledger: RewardLedger,
}

impl LineReportStore {
    pub fn new(vendors: Vec<Vendor>, ledger: RewardLedger) -> Self {
        Self { vendors, ledger }
    }

    /// Records a fan's report and credits the ledger.
    ///
    /// An unknown vendor id matches nothing and leaves the store untouched.
    pub fn submit(
        &mut self,
        vendor_id: &str,
        minutes: WaitMinutes,
        at: OffsetDateTime,
    ) -> Option<ReportReceipt> {
        let Some(vendor) = self.vendors.iter_mut().find(|v| v.id == vendor_id) else {
            debug!("ignoring report for unknown vendor {}", vendor_id);
            return None;
        };

        vendor.record_report(minutes, at);
        let action = format!("Reported {}m at {}", minutes, vendor.name);
        self.ledger.credit(REPORT_REWARD_POINTS, action.clone(), at);

        Some(ReportReceipt {
            vendor: vendor.clone(),
            points: REPORT_REWARD_POINTS,
            action,
        })
    }

    pub fn vendors(&self) -> &[Vendor] {
        &self.vendors
    }

    pub fn vendor(&self, vendor_id: &str) -> Option<&Vendor> {
        self.vendors.iter().find(|v| v.id == vendor_id)
    }

    pub fn ledger(&self) -> &RewardLedger {
        &self.ledger
    }

    /// Longest lines first
    pub fn busiest(&self, limit: usize) -> Vec<Vendor> {
        self.vendors
            .iter()
            .sorted_by(|a, b| b.current_wait_minutes.cmp(&a.current_wait_minutes))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Vendors in seating order, closest first
    pub fn nearby(&self, limit: usize) -> Vec<Vendor> {
        self.vendors.iter().take(limit).cloned().collect()
    }

    pub fn shortest_wait(&self, vendor_type: VendorType) -> Option<&Vendor> {
        self.vendors
            .iter()
            .filter(|v| v.vendor_type == vendor_type)
            .min_by_key(|v| v.current_wait_minutes)
    }
}
