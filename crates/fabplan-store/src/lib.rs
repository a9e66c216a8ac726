//! # Fabplan Store
//!
//! 庫存帳務與資料存取實作：
//! 交易底帳（帳是真相、快照是快取）與記憶體內倉儲。

pub mod ledger;
pub mod memory;

// Re-export 主要類型
pub use ledger::InventoryLedger;
pub use memory::MemoryStore;
