//! Cart Records

use crate::{domain::products::records::ProductUuid, uuids::TypedUuid};

/// Cart Line UUID
pub type CartLineUuid = TypedUuid<CartLineRecord>;

/// Cart Line Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineRecord {
    pub uuid: CartLineUuid,
    pub product_uuid: ProductUuid,
    /// Line price in minor currency units (pence/cents).
    pub price: u64,
}
