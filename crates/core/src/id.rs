//! Strongly-typed identifiers used across the billing domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $t:ident, $name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $t(Uuid);

        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $t {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$t> for Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = Uuid::from_str(s)
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(uuid))
            }
        }
    };
}

uuid_id!(
    /// Identifier of a partner (customer, reseller, contact person).
    PartnerId,
    "PartnerId"
);
uuid_id!(
    /// Identifier of an OpenStack project record (not the OpenStack-side id).
    ProjectId,
    "ProjectId"
);
uuid_id!(ProductId, "ProductId");
uuid_id!(CategoryId, "CategoryId");
uuid_id!(CustomerGroupId, "CustomerGroupId");
uuid_id!(CreditId, "CreditId");
uuid_id!(CreditTypeId, "CreditTypeId");
uuid_id!(GrantId, "GrantId");
uuid_id!(GrantTypeId, "GrantTypeId");
uuid_id!(TermDiscountId, "TermDiscountId");
uuid_id!(VolumeDiscountRangeId, "VolumeDiscountRangeId");
uuid_id!(ResellerId, "ResellerId");
uuid_id!(ResellerTierId, "ResellerTierId");
uuid_id!(VoucherCodeId, "VoucherCodeId");
uuid_id!(ReferralCodeId, "ReferralCodeId");
uuid_id!(TrialId, "TrialId");
uuid_id!(SupportSubscriptionId, "SupportSubscriptionId");
uuid_id!(SupportSubscriptionTypeId, "SupportSubscriptionTypeId");
uuid_id!(SaleOrderId, "SaleOrderId");
uuid_id!(InvoiceId, "InvoiceId");
uuid_id!(
    /// Identifier returned by the attachment store for a persisted blob.
    AttachmentId,
    "AttachmentId"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_display_and_from_str() {
        let id = ProjectId::new();
        let parsed: ProjectId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn invalid_id_names_the_type() {
        let err = "not-a-uuid".parse::<CreditId>().unwrap_err();
        match err {
            DomainError::InvalidId(msg) if msg.starts_with("CreditId") => {}
            other => panic!("Expected InvalidId for CreditId, got {other:?}"),
        }
    }
}
