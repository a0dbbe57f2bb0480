pub mod portraits;

pub use portraits::PortraitTable;
