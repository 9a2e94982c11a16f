//! Strategy scan endpoints.

use serde::Serialize;

use crate::client::OptionGreekClient;
use crate::error::Result;
use crate::types::strategies::VatScan;

#[derive(Serialize)]
struct VatQuery<'a> {
    symbol: &'a str,
}

impl OptionGreekClient {
    /// Value Adjustment Theory scan: premium dislocations between strikes
    /// equidistant from ATM.
    ///
    /// **Endpoint:** `GET /api/v1/strategies/vat/scan?symbol=`
    pub async fn vat_scan(&self, symbol: &str) -> Result<VatScan> {
        self.get_query_checked("/strategies/vat/scan", &VatQuery { symbol })
            .await
    }
}
