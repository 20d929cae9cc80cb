//! Domain types for Cloak.

mod address;
mod announcement;
mod history;
mod keys;
mod payload;
mod transaction;

pub use address::EthAddress;
pub use announcement::AnnouncementRecord;
pub use history::SentPayment;
pub use keys::{CompressedPublicKey, PublishedKeys};
pub use payload::EncryptedPayload;
pub use transaction::{quantity_to_be_bytes, quantity_to_u64, AccessListEntry, TransactionData};
