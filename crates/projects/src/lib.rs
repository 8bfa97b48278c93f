//! OpenStack projects and the partners that own them.
//!
//! Pure domain logic: records, their write-time constraints and the project
//! hierarchy (inherited contacts, invoice-grouping roots).

pub mod directory;
pub mod partner;
pub mod project;

pub use directory::ProjectDirectory;
pub use partner::{CustomerGroup, Partner, PartnerProfile, PartnerRef};
pub use project::{
    BillingType, ContactType, PaymentMethod, Project, ProjectContact, ProjectRef,
};
