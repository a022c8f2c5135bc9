//! Domain value objects shared across the engine, sources and routes.

pub mod params;
pub mod quote;
pub mod snapshot;
pub mod storage;

pub use params::{ArbitrageParameters, ParamsError};
pub use quote::{Instrument, PricePoint, PriceQuote, PriceSeries, PriceUnit, QuoteValue};
pub use snapshot::{
    DashboardSnapshot, NewsItem, NewsSentiment, Sentiment, SignalOutcome, StorageOutlook,
    YoyOutcome,
};
pub use storage::{Cadence, Region, StorageReading, StorageUnit};
