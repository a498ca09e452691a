//! Product Records

use crate::uuids::TypedUuid;

/// Marker for identifiers of externally owned catalog products.
#[derive(Debug)]
pub struct ProductRecord;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;
