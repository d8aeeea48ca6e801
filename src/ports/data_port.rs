//! Data access port trait.

use crate::domain::error::MastraderError;
use crate::domain::ohlcv::BarSeries;

pub trait DataPort {
    /// Full bar history for `symbol`, oldest first.
    fn fetch_bars(&self, symbol: &str) -> Result<BarSeries, MastraderError>;

    fn list_symbols(&self) -> Result<Vec<String>, MastraderError>;
}
