//! Database Models

// Serde helpers
pub mod serde_helpers;

// Location
pub mod area;
pub mod dining_table;

// Reservations
pub mod event_block;
pub mod reservation;
pub mod table_combination;

// Back office
pub mod marketing_content;
pub mod payment;
pub mod reconciliation;
pub mod staff;

// Re-exports
pub use area::{Area, AreaCreate, AreaId, AreaUpdate};
pub use dining_table::{DiningTable, DiningTableCreate, DiningTableUpdate};
pub use event_block::{EventBlock, EventBlockCreate, EventBlockUpdate};
pub use marketing_content::{
    ContentStatus, MarketingChannel, MarketingContent, MarketingContentCreate,
    MarketingContentUpdate,
};
pub use payment::{
    PaymentCreate, PaymentFilter, PaymentMethod, PaymentStatus, PaymentTransaction, RefundRequest,
};
pub use reconciliation::{
    MethodBreakdown, MonthlyReconciliation, ReconciliationGenerate, ReconciliationStatus,
};
pub use reservation::{
    GuestContact, Reservation, ReservationCreate, ReservationId, ReservationStatus,
    ReservationUpdate,
};
pub use staff::{EncryptedHr, StaffCreate, StaffHr, StaffId, StaffMember, StaffResponse, StaffUpdate};
pub use table_combination::{TableCombination, TableCombinationCreate};
