//! GATT object model: the HID service tree, its discovery surface and the
//! notify/report path.

pub mod attribute_table;
pub mod emitter;
pub mod notify;
pub mod object_manager;
pub mod path;
pub mod properties;
pub mod tree;
pub mod uuid;

pub use attribute_table::AttributeTable;
pub use emitter::ReportSink;
pub use notify::Subscription;
pub use object_manager::{ManagedObject, ManagedObjects};
pub use path::ObjectPath;
pub use properties::{CharFlags, Interface, NodeProperties, PropertyValue};
pub use tree::{CharId, CharKind, DescId, DescKind, GattApplication, NodeId, ReadOptions, Value};
pub use uuid::GattUuid;
