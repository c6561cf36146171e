//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Locations, bucket categories and planned remote operations are compared by
/// their attribute values: two `SharedPool` locations are the same location,
/// and two `Equip` steps for the same item and character are the same step.
///
/// The trait requires:
/// - **Clone**: values are passed around freely between planner and executor
/// - **PartialEq**: comparison is by attributes
/// - **Debug**: values show up in logs and test failures
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
