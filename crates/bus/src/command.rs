/// A write-intent message (command abstraction).
///
/// Commands represent **intent** - a request to change catalog state (delete a
/// product, toggle its status, reorder a category...). They are **transient**:
/// built per request, handed to the [`CommandBus`](crate::CommandBus) once, and
/// discarded.
///
/// ## Command vs Query
///
/// - **Command**: Intent to change something (e.g., "Delete product 42")
/// - **Query**: Request to read a projection (e.g., "Product 42 for editing")
///
/// A command may still return a value through `Output` (e.g. the id of a
/// newly created product), but its purpose is the side effect.
///
/// ## Design Constraints
///
/// Commands must be:
/// - **Debug**: dispatches are logged
/// - **Send**: handlers may run on any worker thread
/// - **'static**: commands own their data (they are keyed by `TypeId` in the bus)
pub trait Command: core::fmt::Debug + Send + 'static {
    type Output: Send + 'static;
}
