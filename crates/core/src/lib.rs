//! `osbill-core`: domain foundation for the cloud-billing crates.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the domain error, record validation and the aggregate/event traits.

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod event;
pub mod id;
pub mod validation;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use event::Event;
pub use id::{
    AttachmentId, CategoryId, CreditId, CreditTypeId, CustomerGroupId, GrantId, GrantTypeId,
    InvoiceId, PartnerId, ProductId, ProjectId, ReferralCodeId, ResellerId, ResellerTierId,
    SaleOrderId, SupportSubscriptionId, SupportSubscriptionTypeId, TermDiscountId, TrialId,
    VolumeDiscountRangeId, VoucherCodeId,
};
pub use validation::{Constraint, Validate};
pub use value_object::{Validity, ValueObject};
