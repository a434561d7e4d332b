pub mod binance;
pub mod binance_ws;

pub use binance::KlineHistoryClient;
pub use binance_ws::TradeStream;
