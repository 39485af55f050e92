pub mod cart;
pub mod orchestrator;

pub use cart::{BulkRegisterRequest, CartItem, TeammateInput};
pub use orchestrator::{register_cart, ItemOutcome, ParticipantOutcome, RegistrationOutcome};
