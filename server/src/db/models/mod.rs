//! Row structs and domain enums
//!
//! One file per table, plus the shared enums. Everything derives
//! `sqlx::FromRow` so repositories can use runtime-checked `query_as`.

pub mod cash_token;
pub mod enums;
pub mod event;
pub mod payment_order;
pub mod registration;
pub mod staff;
pub mod team;
pub mod user;

pub use cash_token::CashToken;
pub use enums::{EventType, OrderStatus, PaymentMode, PaymentStatus, StaffRole};
pub use event::{Event, EventCreate};
pub use payment_order::PaymentOrder;
pub use registration::{RegisteredEvent, Registration};
pub use staff::{Staff, StaffCreate};
pub use team::Team;
pub use user::{User, UserCreate};
